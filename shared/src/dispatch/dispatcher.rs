use std::collections::HashMap;

use log::{debug, warn};

use crate::{
    connection::{clock, handshake},
    dispatch::{
        context::NetworkContext,
        outcome::{DispatchOutcome, DropReason},
    },
    error::NetworkError,
    events::ErrorEvent,
    messages::{custom, message_kind::MessageKind},
    rpc::rpc_queue,
    scene::scene_switch,
    types::{ClientId, HostType, NetworkChannel, SERVER_CLIENT_ID},
    world::{lifecycle, ownership, replica_world::ReplicaWorld, variable_sync},
};

/// One message as delivered by the transport
#[derive(Clone, Copy, Debug)]
pub struct InboundMessage<'a> {
    pub sender_id: ClientId,
    /// Wire byte of the message kind, not yet validated
    pub kind: u8,
    pub channel: NetworkChannel,
    pub payload: &'a [u8],
    /// Local time in seconds
    pub receive_time: f32,
}

impl<'a> InboundMessage<'a> {
    pub fn new(sender_id: ClientId, kind: MessageKind, payload: &'a [u8], receive_time: f32) -> Self {
        Self {
            sender_id,
            kind: kind.to_u8(),
            channel: NetworkChannel::Internal,
            payload,
            receive_time,
        }
    }

    pub fn on_channel(mut self, channel: NetworkChannel) -> Self {
        self.channel = channel;
        self
    }
}

/// Which side of the connection a message kind may be handled on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleFilter {
    ServerOnly,
    ClientOnly,
    Any,
}

impl RoleFilter {
    pub fn accepts(&self, host_type: HostType) -> bool {
        match self {
            RoleFilter::ServerOnly => host_type == HostType::Server,
            RoleFilter::ClientOnly => host_type == HostType::Client,
            RoleFilter::Any => true,
        }
    }
}

pub type MessageHandler<W> =
    fn(&mut NetworkContext, &mut W, &InboundMessage) -> Result<DispatchOutcome, NetworkError>;

pub struct Route<W> {
    pub filter: RoleFilter,
    pub handler: MessageHandler<W>,
}

impl<W> Clone for Route<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for Route<W> {}

/// Routes each inbound message to exactly one handler by its kind
pub struct MessageDispatcher<W: ReplicaWorld> {
    routes: HashMap<MessageKind, Route<W>>,
}

impl<W: ReplicaWorld> Default for MessageDispatcher<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: ReplicaWorld> MessageDispatcher<W> {
    /// A dispatcher with a handler for every protocol message kind
    pub fn new() -> Self {
        use MessageKind::*;
        use RoleFilter::*;

        let mut dispatcher = Self::empty();
        dispatcher.register(ConnectionRequest, ServerOnly, handshake::on_connection_request::<W>);
        dispatcher.register(ConnectionApproved, ClientOnly, handshake::on_connection_approved::<W>);
        dispatcher.register(AddObject, ClientOnly, lifecycle::on_add_object::<W>);
        dispatcher.register(AddObjects, ClientOnly, lifecycle::on_add_objects::<W>);
        dispatcher.register(DestroyObject, ClientOnly, lifecycle::on_destroy_object::<W>);
        dispatcher.register(DestroyObjects, ClientOnly, lifecycle::on_destroy_objects::<W>);
        dispatcher.register(SwitchScene, ClientOnly, scene_switch::on_switch_scene::<W>);
        dispatcher.register(
            ClientSwitchSceneCompleted,
            ServerOnly,
            scene_switch::on_client_switch_scene_completed::<W>,
        );
        dispatcher.register(ChangeOwner, ClientOnly, ownership::on_change_owner::<W>);
        dispatcher.register(TimeSync, ClientOnly, clock::on_time_sync::<W>);
        dispatcher.register(NetworkVariableDelta, Any, variable_sync::on_variable_delta::<W>);
        dispatcher.register(NetworkVariableUpdate, Any, variable_sync::on_variable_update::<W>);
        dispatcher.register(UnnamedMessage, Any, custom::on_unnamed_message::<W>);
        dispatcher.register(NamedMessage, Any, custom::on_named_message::<W>);
        dispatcher.register(NetworkLog, ServerOnly, custom::on_network_log::<W>);
        dispatcher.register(ServerRpc, ServerOnly, rpc_queue::on_server_rpc::<W>);
        dispatcher.register(ClientRpc, ClientOnly, rpc_queue::on_client_rpc::<W>);
        dispatcher
    }

    /// A dispatcher with no routes
    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Install a handler, returning the route it replaced
    pub fn register(
        &mut self,
        kind: MessageKind,
        filter: RoleFilter,
        handler: MessageHandler<W>,
    ) -> Option<Route<W>> {
        self.routes.insert(kind, Route { filter, handler })
    }

    pub fn remove(&mut self, kind: MessageKind) -> Option<Route<W>> {
        self.routes.remove(&kind)
    }

    pub fn route(&self, kind: MessageKind) -> Option<&Route<W>> {
        self.routes.get(&kind)
    }

    /// Handle one inbound message. Drops are reported as outcomes, decode
    /// failures and desyncs as errors.
    pub fn dispatch(
        &self,
        context: &mut NetworkContext,
        world: &mut W,
        message: &InboundMessage,
    ) -> Result<DispatchOutcome, NetworkError> {
        context.buffer.evict_expired(message.receive_time);

        let Some(kind) = MessageKind::from_u8(message.kind) else {
            warn!(
                "Dropping message of unknown kind {} from {}",
                message.kind, message.sender_id
            );
            return Ok(DispatchOutcome::Dropped(DropReason::UnknownKind(message.kind)));
        };

        if context.is_server() && message.sender_id == SERVER_CLIENT_ID {
            debug!("Dropping {:?} sent by the server to itself", kind);
            return Ok(DispatchOutcome::Dropped(DropReason::SelfLoop));
        }

        let Some(route) = self.routes.get(&kind) else {
            warn!("No handler registered for {:?}", kind);
            return Ok(DispatchOutcome::Dropped(DropReason::Unrouted(kind)));
        };

        if !route.filter.accepts(context.host_type()) {
            warn!(
                "Dropping {:?} from {}: not accepted on the {:?} side",
                kind,
                message.sender_id,
                context.host_type()
            );
            return Ok(DispatchOutcome::Dropped(DropReason::WrongRole(kind)));
        }

        debug!(
            "Dispatching {:?} from {} ({} bytes)",
            kind,
            message.sender_id,
            message.payload.len()
        );
        (route.handler)(context, world, message)
    }

    /// Like [`MessageDispatcher::dispatch`], but errors are pushed to the
    /// context's events as [`ErrorEvent`]s instead of being returned
    pub fn receive(
        &self,
        context: &mut NetworkContext,
        world: &mut W,
        message: &InboundMessage,
    ) -> Option<DispatchOutcome> {
        match self.dispatch(context, world, message) {
            Ok(outcome) => Some(outcome),
            Err(error) => {
                warn!("Message from {} failed: {}", message.sender_id, error);
                context.events.push_error(ErrorEvent {
                    sender_id: message.sender_id,
                    error,
                });
                None
            }
        }
    }
}
