use tessera_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::types::{ClientId, ObjectId, Vec3};

/// How a replicated object is materialized on the receiving side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectIdentity {
    /// Instantiate a fresh copy of the template with this hash
    PrefabHash(u64),
    /// Adopt the object that already exists in the loaded scene under this instance id
    SoftSync(u64),
}

impl ObjectIdentity {
    pub fn is_soft_sync(&self) -> bool {
        matches!(self, ObjectIdentity::SoftSync(_))
    }
}

/// Which identity encoding is on the wire. Decided by configuration, never
/// by the payload itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityMode {
    /// Scene management off, or prefab sync forced: a bare prefab hash
    PrefabOnly,
    /// A soft-sync flag, then either an instance id or a prefab hash
    SoftSyncAware,
}

impl IdentityMode {
    pub fn new(enable_scene_management: bool, force_prefab_sync: bool) -> Self {
        if !enable_scene_management || force_prefab_sync {
            IdentityMode::PrefabOnly
        } else {
            IdentityMode::SoftSyncAware
        }
    }
}

impl ObjectIdentity {
    pub fn read(reader: &mut ByteReader, mode: IdentityMode) -> Result<Self, SerdeErr> {
        match mode {
            IdentityMode::PrefabOnly => Ok(ObjectIdentity::PrefabHash(u64::de(reader)?)),
            IdentityMode::SoftSyncAware => {
                if bool::de(reader)? {
                    Ok(ObjectIdentity::SoftSync(u64::de(reader)?))
                } else {
                    Ok(ObjectIdentity::PrefabHash(u64::de(reader)?))
                }
            }
        }
    }

    /// A soft-sync identity has no encoding in prefab-only mode
    pub fn write(&self, writer: &mut dyn ByteWrite, mode: IdentityMode) -> Result<(), SerdeErr> {
        match (mode, self) {
            (IdentityMode::PrefabOnly, ObjectIdentity::PrefabHash(hash)) => {
                hash.ser(writer);
            }
            (IdentityMode::PrefabOnly, ObjectIdentity::SoftSync(_)) => {
                return Err(SerdeErr);
            }
            (IdentityMode::SoftSyncAware, ObjectIdentity::SoftSync(instance_id)) => {
                true.ser(writer);
                instance_id.ser(writer);
            }
            (IdentityMode::SoftSyncAware, ObjectIdentity::PrefabHash(hash)) => {
                false.ser(writer);
                hash.ser(writer);
            }
        }
        Ok(())
    }
}

/// Where a freshly spawned object is placed. Rotation is Euler angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPose {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl SpawnPose {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }
}

impl Serde for SpawnPose {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.position.x.ser(writer);
        self.position.y.ser(writer);
        self.position.z.ser(writer);
        self.rotation.x.ser(writer);
        self.rotation.y.ser(writer);
        self.rotation.z.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let position = Vec3::new(f32::de(reader)?, f32::de(reader)?, f32::de(reader)?);
        let rotation = Vec3::new(f32::de(reader)?, f32::de(reader)?, f32::de(reader)?);
        Ok(Self { position, rotation })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectDescriptor {
    pub is_player_object: bool,
    pub owner_id: ClientId,
    pub parent_id: Option<ObjectId>,
    pub identity: ObjectIdentity,
    pub spawn_pose: Option<SpawnPose>,
}

impl ObjectDescriptor {
    pub fn new(owner_id: ClientId, identity: ObjectIdentity) -> Self {
        Self {
            is_player_object: false,
            owner_id,
            parent_id: None,
            identity,
            spawn_pose: None,
        }
    }

    pub fn player(mut self) -> Self {
        self.is_player_object = true;
        self
    }

    pub fn with_parent(mut self, parent_id: ObjectId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_pose(mut self, pose: SpawnPose) -> Self {
        self.spawn_pose = Some(pose);
        self
    }
}

/// One AddObject body: the descriptor, the id it is spawned under, and the
/// optional trailing payload handed to the world at instantiation
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectSpawn {
    pub object_id: ObjectId,
    pub descriptor: ObjectDescriptor,
    pub payload: Option<Vec<u8>>,
}

impl ObjectSpawn {
    pub fn new(object_id: ObjectId, descriptor: ObjectDescriptor) -> Self {
        Self {
            object_id,
            descriptor,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: &[u8]) -> Self {
        self.payload = Some(payload.to_vec());
        self
    }

    pub fn read(reader: &mut ByteReader, mode: IdentityMode) -> Result<Self, SerdeErr> {
        let is_player_object = bool::de(reader)?;
        let object_id = ObjectId::de(reader)?;
        let owner_id = ClientId::de(reader)?;
        let parent_id = if bool::de(reader)? {
            Some(ObjectId::de(reader)?)
        } else {
            None
        };
        let identity = ObjectIdentity::read(reader, mode)?;
        let spawn_pose = Option::<SpawnPose>::de(reader)?;
        let payload = if bool::de(reader)? {
            let length = i32::de(reader)?;
            let length = usize::try_from(length).map_err(|_| SerdeErr)?;
            Some(reader.read_bytes(length)?.to_vec())
        } else {
            None
        };

        Ok(Self {
            object_id,
            descriptor: ObjectDescriptor {
                is_player_object,
                owner_id,
                parent_id,
                identity,
                spawn_pose,
            },
            payload,
        })
    }

    pub fn write(&self, writer: &mut dyn ByteWrite, mode: IdentityMode) -> Result<(), SerdeErr> {
        let descriptor = &self.descriptor;
        descriptor.is_player_object.ser(writer);
        self.object_id.ser(writer);
        descriptor.owner_id.ser(writer);
        descriptor.parent_id.ser(writer);
        descriptor.identity.write(writer, mode)?;
        descriptor.spawn_pose.ser(writer);
        match &self.payload {
            Some(payload) => {
                true.ser(writer);
                let length = i32::try_from(payload.len()).map_err(|_| SerdeErr)?;
                length.ser(writer);
                writer.write_bytes(payload);
            }
            None => false.ser(writer),
        }
        Ok(())
    }
}

/// Write the object-list block carried by ConnectionApproved and SwitchScene
pub fn write_object_list(
    writer: &mut dyn ByteWrite,
    spawns: &[ObjectSpawn],
    mode: IdentityMode,
) -> Result<(), SerdeErr> {
    let count = u32::try_from(spawns.len()).map_err(|_| SerdeErr)?;
    count.ser(writer);
    for spawn in spawns {
        spawn.write(writer, mode)?;
    }
    Ok(())
}
