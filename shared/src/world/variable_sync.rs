use log::{info, warn};

use tessera_serde::{ByteReader, Serde};

use crate::{
    dispatch::{
        context::NetworkContext,
        dispatcher::InboundMessage,
        outcome::{DispatchOutcome, DropReason},
    },
    error::NetworkError,
    messages::{message_kind::MessageKind, wire::VariableMessageHeader},
    types::{ClientId, NetworkChannel},
    world::{message_buffer::BufferedMessage, replica_world::ReplicaWorld},
};

/// NetworkVariableDelta
pub fn on_variable_delta<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    on_variable_message(context, world, message, MessageKind::NetworkVariableDelta)
}

/// NetworkVariableUpdate
pub fn on_variable_update<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    on_variable_message(context, world, message, MessageKind::NetworkVariableUpdate)
}

fn on_variable_message<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    message: &InboundMessage,
    kind: MessageKind,
) -> Result<DispatchOutcome, NetworkError> {
    if !context.config().enable_network_variable {
        warn!("{:?} received while network variables are disabled", kind);
        return Ok(DispatchOutcome::Dropped(DropReason::FeatureDisabled));
    }

    let variable = VariableMessage {
        kind,
        sender_id: message.sender_id,
        channel: message.channel,
        payload: message.payload,
        receive_time: message.receive_time,
    };
    apply(context, world, variable, true)
}

/// Apply a message that waited in the buffer. Its object was just spawned,
/// so it is never buffered a second time.
pub(crate) fn replay<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    buffered: BufferedMessage,
) -> Result<DispatchOutcome, NetworkError> {
    let variable = VariableMessage {
        kind: buffered.kind,
        sender_id: buffered.sender_id,
        channel: buffered.channel,
        payload: &buffered.payload,
        receive_time: buffered.received_at,
    };
    apply(context, world, variable, false)
}

struct VariableMessage<'a> {
    kind: MessageKind,
    sender_id: ClientId,
    channel: NetworkChannel,
    payload: &'a [u8],
    receive_time: f32,
}

fn apply<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    message: VariableMessage,
    allow_buffering: bool,
) -> Result<DispatchOutcome, NetworkError> {
    let mut reader = ByteReader::new(message.payload);
    let header = VariableMessageHeader::de(&mut reader)?;
    let object_id = header.object_id;
    let behaviour_index = header.behaviour_index;

    if let Some(object) = context.objects.get(object_id) {
        if !object.has_behaviour(behaviour_index) {
            warn!(
                "{:?} for object {} targets behaviour {} but it has {}",
                message.kind, object_id, behaviour_index, object.behaviour_count
            );
            return Ok(DispatchOutcome::Dropped(DropReason::InvalidBehaviour {
                object_id,
                behaviour_index,
            }));
        }

        match message.kind {
            MessageKind::NetworkVariableUpdate => world.apply_variable_update(
                object_id,
                behaviour_index,
                message.sender_id,
                &mut reader,
            )?,
            _ => world.apply_variable_delta(
                object_id,
                behaviour_index,
                message.sender_id,
                &mut reader,
            )?,
        }
        return Ok(DispatchOutcome::Handled);
    }

    if context.is_server() || !context.config().enable_message_buffering || !allow_buffering {
        warn!(
            "{:?} for unknown object {} dropped",
            message.kind, object_id
        );
        return Ok(DispatchOutcome::Dropped(DropReason::UnknownObject(object_id)));
    }

    info!(
        "{:?} for object {} arrived before its spawn, buffering",
        message.kind, object_id
    );
    let buffered = BufferedMessage::new(
        object_id,
        message.sender_id,
        message.kind,
        message.channel,
        message.payload,
        message.receive_time,
    );
    let policy = context.config().buffering;
    context.buffer.enqueue(object_id, buffered, &policy);
    Ok(DispatchOutcome::Buffered)
}
