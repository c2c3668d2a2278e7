use crate::{
    rpc::rpc_queue::RpcQueueConfig,
    types::{SceneIndex, Vec3},
    world::message_buffer::BufferingPolicy,
};

/// Protocol settings shared by both ends of a connection. Everything that
/// changes how bytes are laid out on the wire feeds into [`NetworkConfig::config_hash`].
#[derive(Clone, Debug)]
pub struct NetworkConfig {
    /// Bumped whenever the wire format changes incompatibly
    pub protocol_version: u16,
    /// Whether the server drives scene loading on clients
    pub enable_scene_management: bool,
    /// Always instantiate from prefab hashes, even for objects already in the scene
    pub force_prefab_sync: bool,
    /// Whether a ConnectionRequest carries a payload that the application must approve
    pub connection_approval: bool,
    /// Whether replicated variable deltas/updates are processed at all
    pub enable_network_variable: bool,
    /// Whether variable messages for unknown objects are held until the object spawns
    pub enable_message_buffering: bool,
    /// Bounds for messages held by the buffer
    pub buffering: BufferingPolicy,
    /// Server default used when approval is not configured
    pub create_player_object: bool,
    /// Server default player prefab, `None` means the registered default
    pub player_prefab_hash: Option<u64>,
    /// Scene names, in registration order. A scene index is a position in this list.
    pub registered_scenes: Vec<String>,
    /// The scene the local instance currently has loaded
    pub active_scene_index: SceneIndex,
    /// Bounds for the inbound RPC queue
    pub rpc: RpcQueueConfig,
    /// Fraction of the remaining clock error corrected on each non-initial time sync
    pub time_sync_smoothing: f32,
    /// Server default spawn position when approval does not provide one
    pub default_spawn_position: Option<Vec3>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            protocol_version: 0,
            enable_scene_management: true,
            force_prefab_sync: false,
            connection_approval: false,
            enable_network_variable: true,
            enable_message_buffering: true,
            buffering: BufferingPolicy::default(),
            create_player_object: true,
            player_prefab_hash: None,
            registered_scenes: Vec::new(),
            active_scene_index: 0,
            rpc: RpcQueueConfig::default(),
            time_sync_smoothing: 0.1,
            default_spawn_position: None,
        }
    }
}

impl NetworkConfig {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn protocol_version(&mut self, version: u16) -> &mut Self {
        self.protocol_version = version;
        self
    }

    pub fn scene_management(&mut self, enabled: bool) -> &mut Self {
        self.enable_scene_management = enabled;
        self
    }

    pub fn force_prefab_sync(&mut self, forced: bool) -> &mut Self {
        self.force_prefab_sync = forced;
        self
    }

    pub fn connection_approval(&mut self, enabled: bool) -> &mut Self {
        self.connection_approval = enabled;
        self
    }

    pub fn network_variables(&mut self, enabled: bool) -> &mut Self {
        self.enable_network_variable = enabled;
        self
    }

    pub fn message_buffering(&mut self, enabled: bool) -> &mut Self {
        self.enable_message_buffering = enabled;
        self
    }

    pub fn buffering_policy(&mut self, policy: BufferingPolicy) -> &mut Self {
        self.buffering = policy;
        self
    }

    pub fn player_object(&mut self, create: bool, prefab_hash: Option<u64>) -> &mut Self {
        self.create_player_object = create;
        self.player_prefab_hash = prefab_hash;
        self
    }

    pub fn add_scene(&mut self, name: &str) -> &mut Self {
        self.registered_scenes.push(name.to_string());
        self
    }

    pub fn active_scene(&mut self, scene_index: SceneIndex) -> &mut Self {
        self.active_scene_index = scene_index;
        self
    }

    pub fn rpc_queue(&mut self, config: RpcQueueConfig) -> &mut Self {
        self.rpc = config;
        self
    }

    pub fn build(&mut self) -> Self {
        self.clone()
    }

    /// Fingerprint of every negotiated setting. Both sides must produce the
    /// same value or the connection is refused.
    pub fn config_hash(&self) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.protocol_version.to_le_bytes());
        hasher.update(&[
            u8::from(self.enable_scene_management),
            u8::from(self.force_prefab_sync),
            u8::from(self.connection_approval),
            u8::from(self.enable_network_variable),
        ]);
        hasher.update(&(self.registered_scenes.len() as u64).to_le_bytes());
        for scene in &self.registered_scenes {
            hasher.update(&(scene.len() as u64).to_le_bytes());
            hasher.update(scene.as_bytes());
        }

        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }

    /// Compare a fingerprint received from a peer against the local one
    pub fn compare_config(&self, hash: u64) -> bool {
        self.config_hash() == hash
    }
}
