use log::{debug, info, warn};

use tessera_serde::{ByteReader, Serde};

use crate::{
    dispatch::{
        context::NetworkContext,
        dispatcher::InboundMessage,
        outcome::{DispatchOutcome, DropReason},
    },
    error::NetworkError,
    events::ErrorEvent,
    types::ObjectId,
    world::{
        error::RegistryError,
        object_descriptor::{IdentityMode, ObjectSpawn},
        object_registry::SpawnedObject,
        replica_world::ReplicaWorld,
        variable_sync,
    },
};

/// AddObject
pub fn on_add_object<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    let mut reader = ByteReader::new(message.payload);
    let spawn = ObjectSpawn::read(&mut reader, context.identity_mode())?;
    spawn_object(context, world, spawn)?;
    Ok(DispatchOutcome::Handled)
}

/// AddObjects: a u16 count followed by that many AddObject bodies
pub fn on_add_objects<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    let mut reader = ByteReader::new(message.payload);
    let count = u16::de(&mut reader)?;
    let mode = context.identity_mode();
    for _ in 0..count {
        let spawn = ObjectSpawn::read(&mut reader, mode)?;
        spawn_object(context, world, spawn)?;
    }
    Ok(DispatchOutcome::Handled)
}

/// DestroyObject
pub fn on_destroy_object<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    let mut reader = ByteReader::new(message.payload);
    let object_id = ObjectId::de(&mut reader)?;
    destroy_object(context, world, object_id)
}

/// DestroyObjects: a u16 count followed by that many object ids
pub fn on_destroy_objects<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    let mut reader = ByteReader::new(message.payload);
    let count = u16::de(&mut reader)?;
    for _ in 0..count {
        let object_id = ObjectId::de(&mut reader)?;
        destroy_object(context, world, object_id)?;
    }
    Ok(DispatchOutcome::Handled)
}

fn destroy_object<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    object_id: ObjectId,
) -> Result<DispatchOutcome, NetworkError> {
    if !context.objects.contains(object_id) {
        warn!("Destroy requested for unknown object {}", object_id);
        return Ok(DispatchOutcome::Dropped(DropReason::UnknownObject(object_id)));
    }
    despawn(context, world, object_id)?;
    Ok(DispatchOutcome::Handled)
}

/// Remove a spawned object from the registry and the world
pub(crate) fn despawn<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    object_id: ObjectId,
) -> Result<(), NetworkError> {
    let object = context.objects.remove(object_id)?;
    if object.is_player_object {
        if let Some(record) = context.clients.get_mut(object.owner_id()) {
            if record.player_object == Some(object_id) {
                record.player_object = None;
            }
        }
    }
    world.despawn_object(object_id);
    debug!("Despawned object {}", object_id);
    Ok(())
}

/// Instantiate one object, register it, then replay whatever was buffered
/// for its id before anything else is processed
pub fn spawn_object<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    spawn: ObjectSpawn,
) -> Result<(), NetworkError> {
    let object_id = spawn.object_id;
    if context.objects.contains(object_id) {
        return Err(RegistryError::ObjectAlreadySpawned { object_id }.into());
    }

    let descriptor = &spawn.descriptor;
    let behaviour_count = world.spawn_object(object_id, descriptor, spawn.payload.as_deref())?;

    let mut object = SpawnedObject::new(
        object_id,
        descriptor.owner_id,
        descriptor.identity,
        behaviour_count,
    );
    object.is_player_object = descriptor.is_player_object;
    object.parent_id = descriptor.parent_id;
    context.objects.insert(object)?;

    if descriptor.is_player_object {
        if let Some(record) = context.clients.get_mut(descriptor.owner_id) {
            record.player_object = Some(object_id);
        }
    }
    debug!(
        "Spawned object {} owned by {} ({:?})",
        object_id, descriptor.owner_id, descriptor.identity
    );

    for message in context.buffer.consume(object_id) {
        let sender_id = message.sender_id;
        if let Err(error) = variable_sync::replay(context, world, message) {
            warn!(
                "Buffered message from {} for object {} failed: {}",
                sender_id, object_id, error
            );
            context.events.push_error(ErrorEvent { sender_id, error });
        }
    }
    Ok(())
}

/// Replace scene state with a full snapshot: clear what the previous scene
/// left behind, spawn the u32-counted object list, then discard scene
/// objects nothing claimed
pub(crate) fn apply_object_snapshot<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    reader: &mut ByteReader,
) -> Result<(), NetworkError> {
    let mode = context.identity_mode();
    clear_stale_scene_state(context, world, mode);

    let count = u32::de(reader)?;
    for _ in 0..count {
        let spawn = ObjectSpawn::read(reader, mode)?;
        spawn_object(context, world, spawn)?;
    }

    world.clean_diffed_scene_objects();
    info!("Applied snapshot of {} object(s)", count);
    Ok(())
}

fn clear_stale_scene_state<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    mode: IdentityMode,
) {
    context.objects.remove_scene_objects();

    match mode {
        IdentityMode::PrefabOnly => world.destroy_scene_objects(),
        IdentityMode::SoftSyncAware => world.begin_scene_object_sweep(),
    }
}
