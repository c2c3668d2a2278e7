use log::{debug, error};

use tessera_serde::{ByteReader, Serde};

use crate::{
    dispatch::{context::NetworkContext, dispatcher::InboundMessage, outcome::DispatchOutcome},
    error::NetworkError,
    messages::wire::ChangeOwnerMessage,
    types::{ClientId, ObjectId},
    world::replica_world::ReplicaWorld,
};

/// ChangeOwner
pub fn on_change_owner<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    let mut reader = ByteReader::new(message.payload);
    let change = ChangeOwnerMessage::de(&mut reader)?;
    change_owner(context, world, change.object_id, change.new_owner_id)?;
    Ok(DispatchOutcome::Handled)
}

/// Move ownership of a spawned object. The local side hears "lost" before
/// the owner is stored and "gained" after, and a transfer to the current
/// owner notifies nobody.
pub fn change_owner<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    object_id: ObjectId,
    new_owner_id: ClientId,
) -> Result<(), NetworkError> {
    let Some(previous_owner_id) = context.objects.get(object_id).map(|object| object.owner_id()) else {
        error!(
            "Ownership change to {} for object {} which was never spawned",
            new_owner_id, object_id
        );
        return Err(NetworkError::OwnershipDesync {
            object_id,
            new_owner_id,
        });
    };

    if previous_owner_id == new_owner_id {
        debug!("Object {} already owned by {}", object_id, new_owner_id);
        return Ok(());
    }

    let local_client_id = context.local_client_id();
    if previous_owner_id == local_client_id {
        world.on_ownership_lost(object_id);
    }
    context.objects.set_owner(object_id, new_owner_id)?;
    if new_owner_id == local_client_id {
        world.on_ownership_gained(object_id);
    }

    debug!(
        "Object {} changed owner {} -> {}",
        object_id, previous_owner_id, new_owner_id
    );
    Ok(())
}
