use crate::{
    connection::disconnect::DisconnectReason,
    messages::message_kind::MessageKind,
    types::{BehaviourIndex, ObjectId},
};

/// What became of one inbound message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Applied to local state
    Handled,
    /// Held until the object it targets is spawned
    Buffered,
    /// Ignored. Nothing changed and the connection stays up.
    Dropped(DropReason),
    /// The connection must be closed
    Rejected(DisconnectReason),
    /// Processing continues once an external event fires
    Suspended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    UnknownKind(u8),
    /// No handler is registered for a known kind
    Unrouted(MessageKind),
    /// The kind is not accepted by the local role
    WrongRole(MessageKind),
    /// The authoritative side received a message from itself
    SelfLoop,
    /// Network variables are disabled in the configuration
    FeatureDisabled,
    UnknownObject(ObjectId),
    InvalidBehaviour {
        object_id: ObjectId,
        behaviour_index: BehaviourIndex,
    },
    /// A switch acknowledgement that does not match what is outstanding
    StaleSwitchToken,
}
