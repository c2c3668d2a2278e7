use std::collections::HashMap;

use log::info;

use crate::{
    config::NetworkConfig,
    connection::{
        approval::{ApprovalDecision, ApprovalTable, ApprovalTicket},
        clock::NetworkClock,
        disconnect::DisconnectReason,
        error::HandshakeError,
        handshake,
        lifetime::ConnectionLifetime,
    },
    error::NetworkError,
    events::{ApprovedEvent, DisconnectEvent, NetworkEvents},
    rpc::rpc_queue::RpcIngestQueue,
    scene::{error::SceneSyncError, scene_barrier::SceneSyncBarrier, switch_token::SceneSwitchToken},
    types::{ClientId, HostType, SceneIndex, SERVER_CLIENT_ID},
    world::{
        client_registry::{ClientRecord, ClientRegistry},
        lifecycle,
        message_buffer::MessageBuffer,
        object_descriptor::IdentityMode,
        object_registry::ObjectRegistry,
        replica_world::ReplicaWorld,
    },
};

/// All protocol state of one endpoint. Handlers receive it together with
/// the injected world; nothing else is shared between them.
pub struct NetworkContext {
    config: NetworkConfig,
    host_type: HostType,
    local_client_id: ClientId,
    active_scene_index: SceneIndex,
    is_connected: bool,
    pub(crate) objects: ObjectRegistry,
    pub(crate) clients: ClientRegistry,
    pub(crate) buffer: MessageBuffer,
    pub(crate) scenes: SceneSyncBarrier,
    pub(crate) approvals: ApprovalTable,
    pub(crate) clock: NetworkClock,
    pub(crate) rpc_queue: RpcIngestQueue,
    pub(crate) events: NetworkEvents,
    client_lifetimes: HashMap<ClientId, ConnectionLifetime>,
    local_lifetime: ConnectionLifetime,
}

impl NetworkContext {
    pub fn server(config: NetworkConfig) -> Self {
        let mut context = Self::new(config, HostType::Server);
        context.local_client_id = SERVER_CLIENT_ID;
        context.is_connected = true;
        context
    }

    pub fn client(config: NetworkConfig) -> Self {
        Self::new(config, HostType::Client)
    }

    fn new(config: NetworkConfig, host_type: HostType) -> Self {
        Self {
            active_scene_index: config.active_scene_index,
            clock: NetworkClock::new(config.time_sync_smoothing),
            rpc_queue: RpcIngestQueue::new(config.rpc),
            config,
            host_type,
            local_client_id: SERVER_CLIENT_ID,
            is_connected: false,
            objects: ObjectRegistry::new(),
            clients: ClientRegistry::new(),
            buffer: MessageBuffer::new(),
            scenes: SceneSyncBarrier::new(),
            approvals: ApprovalTable::default(),
            events: NetworkEvents::new(),
            client_lifetimes: HashMap::new(),
            local_lifetime: ConnectionLifetime::new(),
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    pub fn is_server(&self) -> bool {
        self.host_type.is_authoritative()
    }

    pub fn local_client_id(&self) -> ClientId {
        self.local_client_id
    }

    pub fn active_scene_index(&self) -> SceneIndex {
        self.active_scene_index
    }

    /// On a client, true once the initial sync has completed
    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub fn buffer(&self) -> &MessageBuffer {
        &self.buffer
    }

    pub fn scenes(&self) -> &SceneSyncBarrier {
        &self.scenes
    }

    pub fn clock(&self) -> &NetworkClock {
        &self.clock
    }

    pub fn rpc_queue(&mut self) -> &mut RpcIngestQueue {
        &mut self.rpc_queue
    }

    pub fn events(&mut self) -> &mut NetworkEvents {
        &mut self.events
    }

    pub fn pending_approvals(&self) -> usize {
        self.approvals.len()
    }

    pub(crate) fn identity_mode(&self) -> IdentityMode {
        IdentityMode::new(
            self.config.enable_scene_management,
            self.config.force_prefab_sync,
        )
    }

    fn require_role(&self, host_type: HostType, operation: &'static str) -> Result<(), NetworkError> {
        if self.host_type == host_type {
            Ok(())
        } else {
            Err(HandshakeError::WrongRole { operation }.into())
        }
    }

    // Server

    pub(crate) fn open_client_lifetime(&mut self, client_id: ClientId) -> &ConnectionLifetime {
        self.client_lifetimes.entry(client_id).or_default()
    }

    /// Answer an approval request. A denial asks the transport to drop the
    /// client; an approval registers it and asks the application to send
    /// the initial snapshot.
    pub fn resolve_approval(
        &mut self,
        ticket: ApprovalTicket,
        decision: ApprovalDecision,
        now: f32,
    ) -> Result<(), NetworkError> {
        self.require_role(HostType::Server, "resolve_approval")?;

        let pending = self
            .approvals
            .take(ticket)
            .ok_or(HandshakeError::UnknownApprovalTicket { ticket: ticket.0 })?;
        let client_id = pending.client_id;
        if !pending.lifetime.is_live() {
            return Err(NetworkError::ContinuationCancelled {
                continuation: "approval",
                client_id,
            });
        }

        if !decision.approved {
            info!("Connection from client {} was denied", client_id);
            self.client_lifetimes.remove(&client_id);
            self.events.push_disconnection(DisconnectEvent {
                client_id,
                reason: DisconnectReason::ApprovalDenied,
            });
            return Ok(());
        }

        self.clients.register(ClientRecord::new(client_id, now))?;
        let scene = if self.config.enable_scene_management {
            let token = self.scenes.issue_for_client(client_id);
            Some((self.active_scene_index, token))
        } else {
            None
        };

        info!("Client {} approved", client_id);
        self.events.push_approval(ApprovedEvent {
            client_id,
            create_player_object: decision.create_player_object,
            player_prefab_hash: decision.player_prefab_hash,
            position: decision.position,
            rotation: decision.rotation,
            scene,
        });
        Ok(())
    }

    /// Begin a scene switch for every connected client. The returned token
    /// goes into each SwitchScene message.
    pub fn switch_scene(&mut self, scene_index: SceneIndex) -> Result<SceneSwitchToken, NetworkError> {
        self.require_role(HostType::Server, "switch_scene")?;
        if !self.config.enable_scene_management {
            return Err(SceneSyncError::SceneManagementDisabled.into());
        }
        let registered = self.config.registered_scenes.len();
        if registered > 0 && scene_index as usize >= registered {
            return Err(SceneSyncError::UnknownScene {
                scene_index,
                registered,
            }
            .into());
        }

        let clients = self.clients.client_ids();
        for client_id in &clients {
            self.clients.set_scene_load_complete(*client_id, false)?;
        }
        self.active_scene_index = scene_index;
        Ok(self.scenes.issue_switch(scene_index, &clients))
    }

    /// Forget a client whose connection closed. Its player object is
    /// destroyed and everything else it owned falls back to the server.
    pub fn on_client_disconnected<W: ReplicaWorld>(
        &mut self,
        world: &mut W,
        client_id: ClientId,
    ) -> Result<(), NetworkError> {
        self.require_role(HostType::Server, "on_client_disconnected")?;

        if let Some(lifetime) = self.client_lifetimes.remove(&client_id) {
            lifetime.cancel();
        }
        self.scenes.forget_client(client_id);

        let Ok(record) = self.clients.remove(client_id) else {
            return Ok(());
        };
        if let Some(player_object) = record.player_object {
            if self.objects.contains(player_object) {
                lifecycle::despawn(self, world, player_object)?;
            }
        }
        for object_id in self.objects.owned_by(client_id) {
            self.objects.set_owner(object_id, SERVER_CLIENT_ID)?;
            world.on_ownership_gained(object_id);
        }

        info!("Client {} disconnected", client_id);
        Ok(())
    }

    // Client

    pub(crate) fn begin_local_connection(&mut self, local_client_id: ClientId) {
        self.local_client_id = local_client_id;
        if self.local_lifetime.is_cancelled() {
            self.local_lifetime = ConnectionLifetime::new();
        }
    }

    pub(crate) fn local_lifetime(&self) -> &ConnectionLifetime {
        &self.local_lifetime
    }

    pub(crate) fn mark_connected(&mut self) {
        self.is_connected = true;
    }

    pub(crate) fn set_active_scene(&mut self, scene_index: SceneIndex) {
        self.active_scene_index = scene_index;
    }

    /// Resume whatever was waiting for the requested scene to load. `now`
    /// expires buffered messages before any of them can be replayed.
    pub fn on_scene_load_complete<W: ReplicaWorld>(
        &mut self,
        world: &mut W,
        now: f32,
    ) -> Result<(), NetworkError> {
        self.require_role(HostType::Client, "on_scene_load_complete")?;
        self.buffer.evict_expired(now);
        handshake::resume_after_scene_load(self, world)
    }

    /// Tear down local replication state after the connection to the
    /// server closed. Suspended work is cancelled, not run.
    pub fn on_local_disconnect<W: ReplicaWorld>(&mut self, world: &mut W) -> Result<(), NetworkError> {
        self.require_role(HostType::Client, "on_local_disconnect")?;

        self.local_lifetime.cancel();
        for object_id in self.objects.ids() {
            world.despawn_object(object_id);
        }
        self.objects.clear();
        self.buffer.clear();
        self.clients.clear();
        self.rpc_queue.clear();
        self.clock.reset();
        self.is_connected = false;

        info!("Disconnected from server");
        Ok(())
    }
}
