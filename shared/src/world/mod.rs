pub mod client_registry;
pub mod error;
pub mod lifecycle;
pub mod message_buffer;
pub mod object_descriptor;
pub mod object_registry;
pub mod ownership;
pub mod replica_world;
pub mod variable_sync;
