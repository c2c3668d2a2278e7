//! Builders for inbound message bodies, written with the same writers the
//! server side uses

use tessera_serde::{ByteWrite, ByteWriter, Serde};
use tessera_shared::{
    write_object_list, BehaviourIndex, ChangeOwnerMessage, ClientId, ConnectionApprovedHeader,
    ConnectionRequest, IdentityMode, NetworkLogMessage, NetworkLogType, ObjectDescriptor,
    ObjectId, ObjectIdentity, ObjectSpawn, SceneIndex, SceneSwitchToken, SpawnPose,
    SwitchSceneHeader, VariableMessageHeader, Vec3,
};

/// A plain prefab object owned by `owner_id`
pub fn prefab(object_id: ObjectId, owner_id: ClientId, prefab_hash: u64) -> ObjectSpawn {
    ObjectSpawn::new(
        object_id,
        ObjectDescriptor::new(owner_id, ObjectIdentity::PrefabHash(prefab_hash)),
    )
}

/// A player object at `position` with no rotation
pub fn player(object_id: ObjectId, owner_id: ClientId, prefab_hash: u64, position: Vec3) -> ObjectSpawn {
    ObjectSpawn::new(
        object_id,
        ObjectDescriptor::new(owner_id, ObjectIdentity::PrefabHash(prefab_hash))
            .player()
            .with_pose(SpawnPose::new(position, Vec3::ZERO)),
    )
}

pub fn add_object(spawn: &ObjectSpawn, mode: IdentityMode) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    spawn.write(&mut writer, mode).expect("identity must be encodable");
    writer.to_bytes()
}

pub fn add_objects(spawns: &[ObjectSpawn], mode: IdentityMode) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    (spawns.len() as u16).ser(&mut writer);
    for spawn in spawns {
        spawn.write(&mut writer, mode).expect("identity must be encodable");
    }
    writer.to_bytes()
}

pub fn destroy_object(object_id: ObjectId) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    object_id.ser(&mut writer);
    writer.to_bytes()
}

pub fn destroy_objects(object_ids: &[ObjectId]) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    (object_ids.len() as u16).ser(&mut writer);
    for object_id in object_ids {
        object_id.ser(&mut writer);
    }
    writer.to_bytes()
}

/// Body of a NetworkVariableDelta or NetworkVariableUpdate
pub fn variable(object_id: ObjectId, behaviour_index: BehaviourIndex, field_bytes: &[u8]) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    VariableMessageHeader {
        object_id,
        behaviour_index,
    }
    .ser(&mut writer);
    writer.write_bytes(field_bytes);
    writer.to_bytes()
}

pub fn change_owner(object_id: ObjectId, new_owner_id: ClientId) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    ChangeOwnerMessage {
        object_id,
        new_owner_id,
    }
    .ser(&mut writer);
    writer.to_bytes()
}

pub fn connection_request(config_hash: u64, approval_payload: Option<&[u8]>) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    ConnectionRequest {
        config_hash,
        approval_payload: approval_payload.map(|payload| payload.to_vec()),
    }
    .write(&mut writer);
    writer.to_bytes()
}

pub fn connection_approved(
    local_client_id: ClientId,
    scene: Option<(SceneIndex, SceneSwitchToken)>,
    server_time: f32,
    spawns: &[ObjectSpawn],
    mode: IdentityMode,
) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    ConnectionApprovedHeader {
        local_client_id,
        scene,
        server_time,
    }
    .write(&mut writer);
    write_object_list(&mut writer, spawns, mode).expect("identity must be encodable");
    writer.to_bytes()
}

pub fn switch_scene(
    scene_index: SceneIndex,
    token: SceneSwitchToken,
    spawns: &[ObjectSpawn],
    mode: IdentityMode,
) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    SwitchSceneHeader { scene_index, token }.ser(&mut writer);
    write_object_list(&mut writer, spawns, mode).expect("identity must be encodable");
    writer.to_bytes()
}

pub fn switch_completed(token: SceneSwitchToken) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    token.ser(&mut writer);
    writer.to_bytes()
}

pub fn time_sync(net_time: f32) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    net_time.ser(&mut writer);
    writer.to_bytes()
}

pub fn named_message(hash: u64, body: &[u8]) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    hash.ser(&mut writer);
    writer.write_bytes(body);
    writer.to_bytes()
}

pub fn network_log(log_type: NetworkLogType, message: &str) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    NetworkLogMessage::new(log_type, message).ser(&mut writer);
    writer.to_bytes()
}
