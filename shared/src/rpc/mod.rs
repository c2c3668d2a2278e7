pub mod error;
pub mod rpc_queue;
