use tessera_shared::{
    ClientId, DispatchOutcome, IdentityMode, InboundMessage, MessageDispatcher, MessageKind,
    NetworkConfig, NetworkContext, NetworkError, NetworkEvent, ObjectSpawn, SceneSwitchToken,
};

use crate::{helpers::payloads, test_world::TestWorld};

/// One endpoint: protocol state, the recording world and a default dispatcher
pub struct TestPeer {
    pub context: NetworkContext,
    pub world: TestWorld,
    pub dispatcher: MessageDispatcher<TestWorld>,
}

impl TestPeer {
    pub fn server(config: NetworkConfig) -> Self {
        Self::new(NetworkContext::server(config))
    }

    pub fn client(config: NetworkConfig) -> Self {
        Self::new(NetworkContext::client(config))
    }

    fn new(context: NetworkContext) -> Self {
        Self {
            context,
            world: TestWorld::new(),
            dispatcher: MessageDispatcher::new(),
        }
    }

    pub fn receive(
        &mut self,
        sender_id: ClientId,
        kind: MessageKind,
        payload: &[u8],
        receive_time: f32,
    ) -> Result<DispatchOutcome, NetworkError> {
        let message = InboundMessage::new(sender_id, kind, payload, receive_time);
        self.dispatcher
            .dispatch(&mut self.context, &mut self.world, &message)
    }

    /// Deliver a message with a raw kind byte
    pub fn receive_raw(
        &mut self,
        sender_id: ClientId,
        kind: u8,
        payload: &[u8],
        receive_time: f32,
    ) -> Result<DispatchOutcome, NetworkError> {
        let mut message = InboundMessage::new(sender_id, MessageKind::UnnamedMessage, payload, receive_time);
        message.kind = kind;
        self.dispatcher
            .dispatch(&mut self.context, &mut self.world, &message)
    }

    pub fn identity_mode(&self) -> IdentityMode {
        let config = self.context.config();
        IdentityMode::new(config.enable_scene_management, config.force_prefab_sync)
    }

    /// Complete the client side of the handshake without a scene switch
    pub fn connect_as(&mut self, local_client_id: ClientId, spawns: &[ObjectSpawn]) -> DispatchOutcome {
        let scene = if self.context.config().enable_scene_management {
            Some((
                self.context.active_scene_index(),
                SceneSwitchToken::from_u128(1),
            ))
        } else {
            None
        };
        let payload =
            payloads::connection_approved(local_client_id, scene, 0.0, spawns, self.identity_mode());
        self.receive(0, MessageKind::ConnectionApproved, &payload, 0.0)
            .expect("handshake must succeed")
    }

    pub fn drain<E: NetworkEvent<Iter = std::vec::IntoIter<E>>>(&mut self) -> Vec<E> {
        self.context.events().read::<E>().collect()
    }
}
