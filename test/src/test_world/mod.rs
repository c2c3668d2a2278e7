//! Recording world for end-to-end tests. Every call the protocol core makes
//! is appended to `calls`, in order.

use std::collections::{HashMap, HashSet};

use tessera_shared::{
    BehaviourIndex, ByteReader, ClientId, ObjectDescriptor, ObjectId, ObjectIdentity,
    ReplicaWorld, WorldError,
};

#[derive(Clone, Debug, PartialEq)]
pub enum WorldCall {
    Spawn(ObjectId),
    Despawn(ObjectId),
    DestroySceneObjects,
    BeginSceneSweep,
    CleanDiffedSceneObjects,
    OwnershipLost(ObjectId),
    OwnershipGained(ObjectId),
    Delta {
        object_id: ObjectId,
        behaviour_index: BehaviourIndex,
        sender_id: ClientId,
        bytes: Vec<u8>,
    },
    Update {
        object_id: ObjectId,
        behaviour_index: BehaviourIndex,
        sender_id: ClientId,
        bytes: Vec<u8>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct TestObject {
    pub descriptor: ObjectDescriptor,
    pub payload: Option<Vec<u8>>,
}

pub struct TestWorld {
    pub calls: Vec<WorldCall>,
    pub objects: HashMap<ObjectId, TestObject>,
    /// Behaviours reported for every spawned object
    pub behaviour_count: BehaviourIndex,
    /// Prefab hashes the world refuses to instantiate
    pub rejected_prefabs: HashSet<u64>,
    /// Instance ids of objects placed in the loaded scene
    pub scene_objects: HashSet<u64>,
    /// Variable payloads the world fails to apply
    pub rejected_variable_payloads: HashSet<Vec<u8>>,
    claimed_scene_objects: HashSet<u64>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            objects: HashMap::new(),
            behaviour_count: 1,
            rejected_prefabs: HashSet::new(),
            scene_objects: HashSet::new(),
            rejected_variable_payloads: HashSet::new(),
            claimed_scene_objects: HashSet::new(),
        }
    }
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behaviours(behaviour_count: BehaviourIndex) -> Self {
        Self {
            behaviour_count,
            ..Self::default()
        }
    }

    pub fn has_object(&self, object_id: ObjectId) -> bool {
        self.objects.contains_key(&object_id)
    }

    pub fn spawned(&self) -> Vec<ObjectId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                WorldCall::Spawn(object_id) => Some(*object_id),
                _ => None,
            })
            .collect()
    }

    /// Delta and update payloads applied to `object_id`, in order
    pub fn variable_payloads(&self, object_id: ObjectId) -> Vec<Vec<u8>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                WorldCall::Delta {
                    object_id: id,
                    bytes,
                    ..
                }
                | WorldCall::Update {
                    object_id: id,
                    bytes,
                    ..
                } if *id == object_id => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &WorldCall) -> usize {
        self.calls.iter().filter(|recorded| *recorded == call).count()
    }
}

impl ReplicaWorld for TestWorld {
    fn spawn_object(
        &mut self,
        object_id: ObjectId,
        descriptor: &ObjectDescriptor,
        payload: Option<&[u8]>,
    ) -> Result<BehaviourIndex, WorldError> {
        match descriptor.identity {
            ObjectIdentity::PrefabHash(hash) if self.rejected_prefabs.contains(&hash) => {
                return Err(WorldError::rejected(format!("unknown prefab {}", hash)));
            }
            ObjectIdentity::SoftSync(instance_id) => {
                if !self.scene_objects.contains(&instance_id) {
                    return Err(WorldError::rejected(format!(
                        "no scene object {}",
                        instance_id
                    )));
                }
                self.claimed_scene_objects.insert(instance_id);
            }
            ObjectIdentity::PrefabHash(_) => {}
        }

        self.calls.push(WorldCall::Spawn(object_id));
        self.objects.insert(
            object_id,
            TestObject {
                descriptor: descriptor.clone(),
                payload: payload.map(|bytes| bytes.to_vec()),
            },
        );
        Ok(self.behaviour_count)
    }

    fn despawn_object(&mut self, object_id: ObjectId) {
        self.calls.push(WorldCall::Despawn(object_id));
        self.objects.remove(&object_id);
    }

    fn destroy_scene_objects(&mut self) {
        self.calls.push(WorldCall::DestroySceneObjects);
        self.scene_objects.clear();
    }

    fn begin_scene_object_sweep(&mut self) {
        self.calls.push(WorldCall::BeginSceneSweep);
        self.claimed_scene_objects.clear();
    }

    fn clean_diffed_scene_objects(&mut self) {
        self.calls.push(WorldCall::CleanDiffedSceneObjects);
        let claimed = std::mem::take(&mut self.claimed_scene_objects);
        self.scene_objects.retain(|instance_id| claimed.contains(instance_id));
    }

    fn on_ownership_lost(&mut self, object_id: ObjectId) {
        self.calls.push(WorldCall::OwnershipLost(object_id));
    }

    fn on_ownership_gained(&mut self, object_id: ObjectId) {
        self.calls.push(WorldCall::OwnershipGained(object_id));
    }

    fn apply_variable_delta(
        &mut self,
        object_id: ObjectId,
        behaviour_index: BehaviourIndex,
        sender_id: ClientId,
        reader: &mut ByteReader,
    ) -> Result<(), WorldError> {
        let bytes = reader.read_bytes(reader.remaining_len())?.to_vec();
        if self.rejected_variable_payloads.contains(&bytes) {
            return Err(WorldError::rejected(format!("bad variable payload {:?}", bytes)));
        }
        self.calls.push(WorldCall::Delta {
            object_id,
            behaviour_index,
            sender_id,
            bytes,
        });
        Ok(())
    }

    fn apply_variable_update(
        &mut self,
        object_id: ObjectId,
        behaviour_index: BehaviourIndex,
        sender_id: ClientId,
        reader: &mut ByteReader,
    ) -> Result<(), WorldError> {
        let bytes = reader.read_bytes(reader.remaining_len())?.to_vec();
        if self.rejected_variable_payloads.contains(&bytes) {
            return Err(WorldError::rejected(format!("bad variable payload {:?}", bytes)));
        }
        self.calls.push(WorldCall::Update {
            object_id,
            behaviour_index,
            sender_id,
            bytes,
        });
        Ok(())
    }
}
