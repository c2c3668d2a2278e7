use thiserror::Error;

use tessera_serde::SerdeErr;

use crate::types::{ClientId, ObjectId};

/// Errors reported by the injected world when it is asked to materialize
/// or mutate replicated state
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorldError {
    /// The world refused the operation, e.g. an unknown prefab hash
    #[error("World rejected the operation: {reason}")]
    Rejected { reason: String },

    /// A field deserializer could not read the replicated payload
    #[error("World could not decode replicated state")]
    Decode(#[from] SerdeErr),
}

impl WorldError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        WorldError::Rejected {
            reason: reason.into(),
        }
    }
}

/// Violations of the object and client table invariants
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Every spawned object id is unique for as long as it is spawned
    #[error("Object {object_id} is already spawned")]
    ObjectAlreadySpawned { object_id: ObjectId },

    #[error("Object {object_id} is not spawned")]
    ObjectNotFound { object_id: ObjectId },

    #[error("Client {client_id} is already registered")]
    ClientAlreadyRegistered { client_id: ClientId },

    #[error("Client {client_id} is not registered")]
    ClientNotFound { client_id: ClientId },
}
