use thiserror::Error;

use crate::types::ClientId;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum HandshakeError {
    /// No approval is waiting under this ticket. It was never issued or was already resolved.
    #[error("No pending approval for ticket {ticket}")]
    UnknownApprovalTicket { ticket: u64 },

    /// A server-only or client-only step was invoked on the other role
    #[error("{operation} is not available on this side of the connection")]
    WrongRole { operation: &'static str },

    /// A ConnectionRequest arrived from a client that is already connected
    #[error("Client {client_id} is already connected")]
    AlreadyConnected { client_id: ClientId },
}
