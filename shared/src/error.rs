use thiserror::Error;

use tessera_serde::SerdeErr;

use crate::{
    connection::error::HandshakeError,
    rpc::error::RpcQueueError,
    scene::error::SceneSyncError,
    types::{ClientId, ObjectId},
    world::error::{RegistryError, WorldError},
};

/// Everything that can go wrong while handling an inbound message or
/// resuming a suspended handshake step
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NetworkError {
    /// The payload ended early or held a value that does not decode
    #[error("Malformed message payload")]
    Decode(#[from] SerdeErr),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Handshake(#[from] HandshakeError),

    #[error(transparent)]
    SceneSync(#[from] SceneSyncError),

    #[error(transparent)]
    RpcQueue(#[from] RpcQueueError),

    /// The server changed the owner of an object this instance never spawned.
    /// The local object table no longer matches the server's.
    #[error("Ownership change for unknown object {object_id} (new owner {new_owner_id})")]
    OwnershipDesync {
        object_id: ObjectId,
        new_owner_id: ClientId,
    },

    /// A suspended step was resumed after its connection was torn down
    #[error("Cannot resume {continuation} for client {client_id}: connection was closed")]
    ContinuationCancelled {
        continuation: &'static str,
        client_id: ClientId,
    },
}
