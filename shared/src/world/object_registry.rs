use std::collections::HashMap;

use crate::{
    types::{ClientId, ObjectId},
    world::{error::RegistryError, object_descriptor::ObjectIdentity},
};

/// What the protocol core knows about one spawned object
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnedObject {
    pub object_id: ObjectId,
    owner_id: ClientId,
    pub is_player_object: bool,
    pub parent_id: Option<ObjectId>,
    pub identity: ObjectIdentity,
    /// Number of behaviours the world reported at spawn. Valid behaviour
    /// indices are `0..behaviour_count`.
    pub behaviour_count: u16,
}

impl SpawnedObject {
    pub fn new(
        object_id: ObjectId,
        owner_id: ClientId,
        identity: ObjectIdentity,
        behaviour_count: u16,
    ) -> Self {
        Self {
            object_id,
            owner_id,
            is_player_object: false,
            parent_id: None,
            identity,
            behaviour_count,
        }
    }

    pub fn owner_id(&self) -> ClientId {
        self.owner_id
    }

    pub fn has_behaviour(&self, behaviour_index: u16) -> bool {
        behaviour_index < self.behaviour_count
    }

    pub fn is_scene_object(&self) -> bool {
        self.identity.is_soft_sync()
    }
}

/// Table of spawned objects. Each id is present at most once and each entry
/// stores exactly one owner, so ownership can only change through
/// [`ObjectRegistry::set_owner`].
#[derive(Default)]
pub struct ObjectRegistry {
    objects: HashMap<ObjectId, SpawnedObject>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
        }
    }

    pub fn contains(&self, object_id: ObjectId) -> bool {
        self.objects.contains_key(&object_id)
    }

    pub fn get(&self, object_id: ObjectId) -> Option<&SpawnedObject> {
        self.objects.get(&object_id)
    }

    pub fn insert(&mut self, object: SpawnedObject) -> Result<(), RegistryError> {
        let object_id = object.object_id;
        if self.objects.contains_key(&object_id) {
            return Err(RegistryError::ObjectAlreadySpawned { object_id });
        }
        self.objects.insert(object_id, object);
        Ok(())
    }

    pub fn remove(&mut self, object_id: ObjectId) -> Result<SpawnedObject, RegistryError> {
        self.objects
            .remove(&object_id)
            .ok_or(RegistryError::ObjectNotFound { object_id })
    }

    /// Store a new owner, returning the previous one
    pub fn set_owner(
        &mut self,
        object_id: ObjectId,
        new_owner_id: ClientId,
    ) -> Result<ClientId, RegistryError> {
        let object = self
            .objects
            .get_mut(&object_id)
            .ok_or(RegistryError::ObjectNotFound { object_id })?;
        let previous = object.owner_id;
        object.owner_id = new_owner_id;
        Ok(previous)
    }

    pub fn owned_by(&self, owner_id: ClientId) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self
            .objects
            .values()
            .filter(|object| object.owner_id == owner_id)
            .map(|object| object.object_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Every spawned id, ascending
    pub fn ids(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self.objects.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Forget every adopted scene object. The world is told separately.
    pub fn remove_scene_objects(&mut self) {
        self.objects.retain(|_, object| !object.is_scene_object());
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
