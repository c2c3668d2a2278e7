/// Why the protocol asks the transport to close a connection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisconnectReason {
    /// The peer was built with an incompatible protocol configuration
    ConfigMismatch,
    /// The application refused the connection request
    ApprovalDenied,
}
