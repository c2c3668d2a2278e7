// Fixed headers of the protocol messages. Object descriptors and the
// object-list block live with the world code that consumes them.

use tessera_serde::{read_byte_array, write_byte_array, ByteReader, ByteWrite, Serde, SerdeErr};

use crate::{
    scene::switch_token::SceneSwitchToken,
    types::{BehaviourIndex, ClientId, ObjectId, SceneIndex},
};

// ConnectionRequest

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub config_hash: u64,
    /// Only present on the wire when connection approval is configured
    pub approval_payload: Option<Vec<u8>>,
}

impl ConnectionRequest {
    pub fn write(&self, writer: &mut dyn ByteWrite) {
        self.config_hash.ser(writer);
        if let Some(payload) = &self.approval_payload {
            write_byte_array(writer, payload);
        }
    }

    /// The config hash is read first on its own so a mismatch can be
    /// rejected before anything else in the payload is touched
    pub fn read_config_hash(reader: &mut ByteReader) -> Result<u64, SerdeErr> {
        u64::de(reader)
    }

    pub fn read_approval_payload(reader: &mut ByteReader) -> Result<Vec<u8>, SerdeErr> {
        Ok(read_byte_array(reader)?.to_vec())
    }
}

// ConnectionApproved

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionApprovedHeader {
    pub local_client_id: ClientId,
    /// Only present on the wire when scene management is enabled
    pub scene: Option<(SceneIndex, SceneSwitchToken)>,
    pub server_time: f32,
}

impl ConnectionApprovedHeader {
    pub fn write(&self, writer: &mut dyn ByteWrite) {
        self.local_client_id.ser(writer);
        if let Some((scene_index, token)) = &self.scene {
            scene_index.ser(writer);
            token.ser(writer);
        }
        self.server_time.ser(writer);
    }

    pub fn read(reader: &mut ByteReader, scene_management: bool) -> Result<Self, SerdeErr> {
        let local_client_id = ClientId::de(reader)?;
        let scene = if scene_management {
            let scene_index = SceneIndex::de(reader)?;
            let token = SceneSwitchToken::de(reader)?;
            Some((scene_index, token))
        } else {
            None
        };
        let server_time = f32::de(reader)?;

        Ok(Self {
            local_client_id,
            scene,
            server_time,
        })
    }
}

// SwitchScene

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchSceneHeader {
    pub scene_index: SceneIndex,
    pub token: SceneSwitchToken,
}

impl Serde for SwitchSceneHeader {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.scene_index.ser(writer);
        self.token.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let scene_index = SceneIndex::de(reader)?;
        let token = SceneSwitchToken::de(reader)?;
        Ok(Self { scene_index, token })
    }
}

// ChangeOwner

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeOwnerMessage {
    pub object_id: ObjectId,
    pub new_owner_id: ClientId,
}

impl Serde for ChangeOwnerMessage {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.object_id.ser(writer);
        self.new_owner_id.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let object_id = ObjectId::de(reader)?;
        let new_owner_id = ClientId::de(reader)?;
        Ok(Self {
            object_id,
            new_owner_id,
        })
    }
}

// NetworkVariableDelta / NetworkVariableUpdate

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableMessageHeader {
    pub object_id: ObjectId,
    pub behaviour_index: BehaviourIndex,
}

impl Serde for VariableMessageHeader {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.object_id.ser(writer);
        self.behaviour_index.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let object_id = ObjectId::de(reader)?;
        let behaviour_index = BehaviourIndex::de(reader)?;
        Ok(Self {
            object_id,
            behaviour_index,
        })
    }
}
