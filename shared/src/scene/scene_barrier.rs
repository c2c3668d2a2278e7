use std::collections::HashMap;

use log::{info, warn};

use crate::{
    connection::continuation::{ContinuationKind, SceneLoadContinuation},
    scene::switch_token::SceneSwitchToken,
    types::{ClientId, SceneIndex},
};

/// How the server classified an incoming switch acknowledgement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchAck {
    /// The client finished the switch it was last told about
    Completed,
    /// The token belongs to an older switch than the one outstanding
    Stale,
    /// Nothing was outstanding for this client
    Unexpected,
}

/// Pairs scene switch commands with their acknowledgements.
///
/// The server side tracks which token each client still owes. The client
/// side holds the continuation waiting for a scene load, plus an initial
/// sync that a scene switch overtook.
#[derive(Default)]
pub struct SceneSyncBarrier {
    // server
    current_switch: Option<(SceneIndex, SceneSwitchToken)>,
    awaiting: HashMap<ClientId, SceneSwitchToken>,

    // client
    pending: Option<SceneLoadContinuation>,
    deferred_initial_sync: Option<SceneLoadContinuation>,
    objects_pending_in_transient_area: bool,
}

impl SceneSyncBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    // Server

    /// Start a switch for every listed client. Any switch they still owed
    /// an acknowledgement for is superseded.
    pub fn issue_switch(&mut self, scene_index: SceneIndex, clients: &[ClientId]) -> SceneSwitchToken {
        let token = SceneSwitchToken::generate();
        self.current_switch = Some((scene_index, token));
        for client_id in clients {
            self.awaiting.insert(*client_id, token);
        }
        info!(
            "Switching to scene {} with {} client(s) to acknowledge",
            scene_index,
            clients.len()
        );
        token
    }

    /// One-shot switch scoped to a single joining client
    pub fn issue_for_client(&mut self, client_id: ClientId) -> SceneSwitchToken {
        let token = SceneSwitchToken::generate();
        self.awaiting.insert(client_id, token);
        token
    }

    pub fn on_switch_completed(&mut self, client_id: ClientId, token: SceneSwitchToken) -> SwitchAck {
        match self.awaiting.get(&client_id) {
            Some(expected) if *expected == token => {
                self.awaiting.remove(&client_id);
                SwitchAck::Completed
            }
            Some(expected) => {
                warn!(
                    "Client {} acknowledged {:?} but {:?} is outstanding",
                    client_id, token, expected
                );
                SwitchAck::Stale
            }
            None => {
                warn!(
                    "Client {} acknowledged {:?} with no switch outstanding",
                    client_id, token
                );
                SwitchAck::Unexpected
            }
        }
    }

    pub fn is_awaiting(&self, client_id: ClientId) -> bool {
        self.awaiting.contains_key(&client_id)
    }

    pub fn awaiting_token(&self, client_id: ClientId) -> Option<SceneSwitchToken> {
        self.awaiting.get(&client_id).copied()
    }

    pub fn current_switch(&self) -> Option<(SceneIndex, SceneSwitchToken)> {
        self.current_switch
    }

    pub fn forget_client(&mut self, client_id: ClientId) {
        self.awaiting.remove(&client_id);
    }

    // Client

    /// Hold `continuation` until the scene load completes. A pending scene
    /// switch is superseded by a newer one; a pending initial sync is kept
    /// and runs first. Returns the continuation that was discarded, if any.
    pub fn suspend(&mut self, continuation: SceneLoadContinuation) -> Option<SceneLoadContinuation> {
        self.objects_pending_in_transient_area = true;
        let replaced = self.pending.replace(continuation);
        match replaced {
            Some(previous)
                if previous.kind() == ContinuationKind::InitialSync
                    && self.deferred_initial_sync.is_none() =>
            {
                info!(
                    "Scene switch arrived during initial sync for scene {}, chaining it",
                    previous.scene_index()
                );
                self.deferred_initial_sync = Some(previous);
                None
            }
            Some(previous) => {
                warn!(
                    "Scene load for scene {} superseded before it completed",
                    previous.scene_index()
                );
                Some(previous)
            }
            None => None,
        }
    }

    /// Everything waiting on the scene load, in the order it must run. Empty
    /// if nothing was suspended.
    pub fn take_pending(&mut self) -> Vec<SceneLoadContinuation> {
        self.deferred_initial_sync
            .take()
            .into_iter()
            .chain(self.pending.take())
            .collect()
    }

    /// Whether spawned objects are parked while a scene load is in progress
    pub fn objects_pending_in_transient_area(&self) -> bool {
        self.objects_pending_in_transient_area
    }

    pub(crate) fn release_transient_objects(&mut self) {
        self.objects_pending_in_transient_area = false;
    }
}
