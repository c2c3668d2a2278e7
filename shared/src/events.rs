use std::vec::IntoIter;

use crate::{
    connection::{approval::ApprovalTicket, disconnect::DisconnectReason},
    error::NetworkError,
    messages::network_log::NetworkLogMessage,
    scene::switch_token::SceneSwitchToken,
    types::{ClientId, SceneIndex, Vec3},
};

/// The local client finished its initial sync and is fully connected
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectEvent {
    pub client_id: ClientId,
}

/// The transport should close this connection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisconnectEvent {
    pub client_id: ClientId,
    pub reason: DisconnectReason,
}

/// The application must answer with `NetworkContext::resolve_approval`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApprovalRequestEvent {
    pub ticket: ApprovalTicket,
    pub client_id: ClientId,
    pub payload: Vec<u8>,
}

/// A client was admitted. The application builds and sends its
/// ConnectionApproved snapshot from this.
#[derive(Clone, Debug, PartialEq)]
pub struct ApprovedEvent {
    pub client_id: ClientId,
    pub create_player_object: bool,
    pub player_prefab_hash: Option<u64>,
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scene: Option<(SceneIndex, SceneSwitchToken)>,
}

/// The server asked this client to load a scene. Call
/// `NetworkContext::on_scene_load_complete` once it is loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneLoadRequestEvent {
    pub scene_index: SceneIndex,
    pub token: SceneSwitchToken,
}

/// Send ClientSwitchSceneCompleted with this token to the server
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchCompletedEvent {
    pub token: SceneSwitchToken,
}

/// A client acknowledged its outstanding scene switch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSceneLoadedEvent {
    pub client_id: ClientId,
    pub token: SceneSwitchToken,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedMessageEvent {
    pub sender_id: ClientId,
    pub hash: u64,
    pub payload: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnnamedMessageEvent {
    pub sender_id: ClientId,
    pub payload: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkLogEvent {
    pub sender_id: ClientId,
    pub log: NetworkLogMessage,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ErrorEvent {
    pub sender_id: ClientId,
    pub error: NetworkError,
}

/// Outputs of the protocol core, drained by the application
#[derive(Default)]
pub struct NetworkEvents {
    connections: Vec<ConnectEvent>,
    disconnections: Vec<DisconnectEvent>,
    approval_requests: Vec<ApprovalRequestEvent>,
    approvals: Vec<ApprovedEvent>,
    scene_load_requests: Vec<SceneLoadRequestEvent>,
    switch_completions: Vec<SwitchCompletedEvent>,
    client_scene_loads: Vec<ClientSceneLoadedEvent>,
    named_messages: Vec<NamedMessageEvent>,
    unnamed_messages: Vec<UnnamedMessageEvent>,
    network_logs: Vec<NetworkLogEvent>,
    errors: Vec<ErrorEvent>,
    empty: bool,
}

impl NetworkEvents {
    pub fn new() -> Self {
        Self {
            empty: true,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: NetworkEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: NetworkEvent>(&self) -> bool {
        V::has(self)
    }

    pub(crate) fn push_connection(&mut self, event: ConnectEvent) {
        self.connections.push(event);
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, event: DisconnectEvent) {
        self.disconnections.push(event);
        self.empty = false;
    }

    pub(crate) fn push_approval_request(&mut self, event: ApprovalRequestEvent) {
        self.approval_requests.push(event);
        self.empty = false;
    }

    pub(crate) fn push_approval(&mut self, event: ApprovedEvent) {
        self.approvals.push(event);
        self.empty = false;
    }

    pub(crate) fn push_scene_load_request(&mut self, event: SceneLoadRequestEvent) {
        self.scene_load_requests.push(event);
        self.empty = false;
    }

    pub(crate) fn push_switch_completed(&mut self, event: SwitchCompletedEvent) {
        self.switch_completions.push(event);
        self.empty = false;
    }

    pub(crate) fn push_client_scene_loaded(&mut self, event: ClientSceneLoadedEvent) {
        self.client_scene_loads.push(event);
        self.empty = false;
    }

    pub(crate) fn push_named_message(&mut self, event: NamedMessageEvent) {
        self.named_messages.push(event);
        self.empty = false;
    }

    pub(crate) fn push_unnamed_message(&mut self, event: UnnamedMessageEvent) {
        self.unnamed_messages.push(event);
        self.empty = false;
    }

    pub(crate) fn push_network_log(&mut self, event: NetworkLogEvent) {
        self.network_logs.push(event);
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, event: ErrorEvent) {
        self.errors.push(event);
        self.empty = false;
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

// Event Trait
pub trait NetworkEvent {
    type Iter;

    fn iter(events: &mut NetworkEvents) -> Self::Iter;

    fn has(events: &NetworkEvents) -> bool;
}

macro_rules! impl_network_event {
    ($event:ty, $field:ident) => {
        impl NetworkEvent for $event {
            type Iter = IntoIter<$event>;

            fn iter(events: &mut NetworkEvents) -> Self::Iter {
                let list = std::mem::take(&mut events.$field);
                IntoIterator::into_iter(list)
            }

            fn has(events: &NetworkEvents) -> bool {
                !events.$field.is_empty()
            }
        }
    };
}

impl_network_event!(ConnectEvent, connections);
impl_network_event!(DisconnectEvent, disconnections);
impl_network_event!(ApprovalRequestEvent, approval_requests);
impl_network_event!(ApprovedEvent, approvals);
impl_network_event!(SceneLoadRequestEvent, scene_load_requests);
impl_network_event!(SwitchCompletedEvent, switch_completions);
impl_network_event!(ClientSceneLoadedEvent, client_scene_loads);
impl_network_event!(NamedMessageEvent, named_messages);
impl_network_event!(UnnamedMessageEvent, unnamed_messages);
impl_network_event!(NetworkLogEvent, network_logs);
impl_network_event!(ErrorEvent, errors);
