use tessera_serde::{ByteReader, Serde};

use crate::{
    dispatch::{context::NetworkContext, dispatcher::InboundMessage, outcome::DispatchOutcome},
    error::NetworkError,
    events::{NamedMessageEvent, NetworkLogEvent, UnnamedMessageEvent},
    messages::network_log::NetworkLogMessage,
    world::replica_world::ReplicaWorld,
};

/// NamedMessage: a 64-bit name hash, then an application payload
pub fn on_named_message<W: ReplicaWorld>(
    context: &mut NetworkContext,
    _world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    let mut reader = ByteReader::new(message.payload);
    let hash = u64::de(&mut reader)?;
    context.events.push_named_message(NamedMessageEvent {
        sender_id: message.sender_id,
        hash,
        payload: reader.remaining().to_vec(),
    });
    Ok(DispatchOutcome::Handled)
}

/// UnnamedMessage: the whole payload belongs to the application
pub fn on_unnamed_message<W: ReplicaWorld>(
    context: &mut NetworkContext,
    _world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    context.events.push_unnamed_message(UnnamedMessageEvent {
        sender_id: message.sender_id,
        payload: message.payload.to_vec(),
    });
    Ok(DispatchOutcome::Handled)
}

/// NetworkLog (server): re-emitted on the local logger at the sent level
pub fn on_network_log<W: ReplicaWorld>(
    context: &mut NetworkContext,
    _world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    let mut reader = ByteReader::new(message.payload);
    let log = NetworkLogMessage::de(&mut reader)?;
    log.log_locally(message.sender_id);
    context.events.push_network_log(NetworkLogEvent {
        sender_id: message.sender_id,
        log,
    });
    Ok(DispatchOutcome::Handled)
}
