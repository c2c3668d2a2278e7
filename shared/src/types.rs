/// Network-wide identifier of a replicated object while it is spawned
pub type ObjectId = u64;
/// Connection identity of a peer
pub type ClientId = u64;
/// Position of a behaviour (sub-component) inside a replicated object
pub type BehaviourIndex = u16;
/// Index of a scene in the registered scene list
pub type SceneIndex = u32;

/// Reserved identity of the authoritative side
pub const SERVER_CLIENT_ID: ClientId = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Server,
    Client,
}

impl HostType {
    /// The server is the authoritative side of every connection
    pub fn is_authoritative(self) -> bool {
        self == HostType::Server
    }
}

/// Transport channel a message was delivered on. Only carried through so a
/// replayed message can be attributed to the channel it arrived on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum NetworkChannel {
    #[default]
    Internal,
    TimeSync,
    ReliableRpc,
    UnreliableRpc,
    SyncChannel,
    DefaultMessage,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}
