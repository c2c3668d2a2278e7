use thiserror::Error;

use crate::messages::message_kind::MessageKind;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RpcQueueError {
    /// Only ServerRpc and ClientRpc are queued for invocation
    #[error("{kind:?} is not an RPC message kind")]
    NotRpcKind { kind: MessageKind },

    /// The current frame already holds as many items as it may
    #[error("Inbound RPC frame {frame} is full ({capacity} items)")]
    FrameFull { frame: u64, capacity: usize },
}
