pub mod custom;
pub mod message_kind;
pub mod network_log;
pub mod wire;
