use tessera_serde::ByteReader;

use crate::{
    types::{BehaviourIndex, ClientId, ObjectId},
    world::{error::WorldError, object_descriptor::ObjectDescriptor},
};

/// The in-engine side of replication. The protocol core decides what
/// happens to which object; an implementor owns the actual entities,
/// their transforms and their replicated fields.
pub trait ReplicaWorld {
    /// Materialize an object, either from a prefab or by adopting a scene
    /// object, attach it to its parent, and place it at the pose if one is given.
    /// Returns how many behaviours the object carries.
    fn spawn_object(
        &mut self,
        object_id: ObjectId,
        descriptor: &ObjectDescriptor,
        payload: Option<&[u8]>,
    ) -> Result<BehaviourIndex, WorldError>;

    fn despawn_object(&mut self, object_id: ObjectId);

    /// Destroy every object that belongs to the loaded scene. Used before
    /// a full resync when scene objects are instantiated from prefabs.
    fn destroy_scene_objects(&mut self);

    /// Start matching scene objects against incoming soft-sync identities
    fn begin_scene_object_sweep(&mut self);

    /// Destroy scene objects that no soft-sync identity claimed since
    /// [`ReplicaWorld::begin_scene_object_sweep`]
    fn clean_diffed_scene_objects(&mut self);

    fn on_ownership_lost(&mut self, object_id: ObjectId);

    fn on_ownership_gained(&mut self, object_id: ObjectId);

    /// Merge a delta into the fields of one behaviour
    fn apply_variable_delta(
        &mut self,
        object_id: ObjectId,
        behaviour_index: BehaviourIndex,
        sender_id: ClientId,
        reader: &mut ByteReader,
    ) -> Result<(), WorldError>;

    /// Replace the fields of one behaviour with a full snapshot
    fn apply_variable_update(
        &mut self,
        object_id: ObjectId,
        behaviour_index: BehaviourIndex,
        sender_id: ClientId,
        reader: &mut ByteReader,
    ) -> Result<(), WorldError>;
}
