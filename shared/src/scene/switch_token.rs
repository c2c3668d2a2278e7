use std::fmt;

use tessera_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

pub const SWITCH_TOKEN_BYTES: usize = 16;

/// Opaque 128-bit id pairing a scene switch command with the completion
/// acknowledgement the client sends back for it
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneSwitchToken([u8; SWITCH_TOKEN_BYTES]);

impl SceneSwitchToken {
    pub fn generate() -> Self {
        Self(fastrand::u128(..).to_le_bytes())
    }

    pub fn from_bytes(bytes: [u8; SWITCH_TOKEN_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn from_u128(value: u128) -> Self {
        Self(value.to_le_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; SWITCH_TOKEN_BYTES] {
        &self.0
    }
}

impl fmt::Debug for SceneSwitchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SceneSwitchToken(")?;
        for byte in self.0.iter().rev() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl Serde for SceneSwitchToken {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_bytes(&self.0);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let bytes = reader.read_bytes(SWITCH_TOKEN_BYTES)?;
        let mut token = [0u8; SWITCH_TOKEN_BYTES];
        token.copy_from_slice(bytes);
        Ok(Self(token))
    }
}
