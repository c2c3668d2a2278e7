use log::{error, info, warn};

use tessera_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::types::ClientId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NetworkLogType {
    Info,
    Warning,
    Error,
}

impl Serde for NetworkLogType {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        let index: u8 = match self {
            NetworkLogType::Info => 0,
            NetworkLogType::Warning => 1,
            NetworkLogType::Error => 2,
        };
        writer.write_byte(index);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(NetworkLogType::Info),
            1 => Ok(NetworkLogType::Warning),
            2 => Ok(NetworkLogType::Error),
            _ => Err(SerdeErr),
        }
    }
}

/// A log line a client forwarded to the server
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkLogMessage {
    pub log_type: NetworkLogType,
    pub message: String,
}

impl NetworkLogMessage {
    pub fn new(log_type: NetworkLogType, message: &str) -> Self {
        Self {
            log_type,
            message: message.to_string(),
        }
    }

    /// Re-emit on the local logger, tagged with the client it came from
    pub fn log_locally(&self, sender: ClientId) {
        match self.log_type {
            NetworkLogType::Info => info!("[Client #{}] {}", sender, self.message),
            NetworkLogType::Warning => warn!("[Client #{}] {}", sender, self.message),
            NetworkLogType::Error => error!("[Client #{}] {}", sender, self.message),
        }
    }
}

impl Serde for NetworkLogMessage {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.log_type.ser(writer);
        self.message.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let log_type = NetworkLogType::de(reader)?;
        let message = String::de(reader)?;
        Ok(Self { log_type, message })
    }
}
