// The kind byte that prefixes every inbound message

use tessera_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    ConnectionRequest,
    ConnectionApproved,
    AddObject,
    DestroyObject,
    SwitchScene,
    ClientSwitchSceneCompleted,
    ChangeOwner,
    AddObjects,
    DestroyObjects,
    TimeSync,
    NetworkVariableDelta,
    NetworkVariableUpdate,
    UnnamedMessage,
    NamedMessage,
    NetworkLog,
    ServerRpc,
    ClientRpc,
}

impl MessageKind {
    pub const ALL: [MessageKind; 17] = [
        MessageKind::ConnectionRequest,
        MessageKind::ConnectionApproved,
        MessageKind::AddObject,
        MessageKind::DestroyObject,
        MessageKind::SwitchScene,
        MessageKind::ClientSwitchSceneCompleted,
        MessageKind::ChangeOwner,
        MessageKind::AddObjects,
        MessageKind::DestroyObjects,
        MessageKind::TimeSync,
        MessageKind::NetworkVariableDelta,
        MessageKind::NetworkVariableUpdate,
        MessageKind::UnnamedMessage,
        MessageKind::NamedMessage,
        MessageKind::NetworkLog,
        MessageKind::ServerRpc,
        MessageKind::ClientRpc,
    ];

    pub fn to_u8(self) -> u8 {
        match self {
            MessageKind::ConnectionRequest => 3,
            MessageKind::ConnectionApproved => 4,
            MessageKind::AddObject => 5,
            MessageKind::DestroyObject => 6,
            MessageKind::SwitchScene => 7,
            MessageKind::ClientSwitchSceneCompleted => 8,
            MessageKind::ChangeOwner => 9,
            MessageKind::AddObjects => 10,
            MessageKind::DestroyObjects => 11,
            MessageKind::TimeSync => 12,
            MessageKind::NetworkVariableDelta => 13,
            MessageKind::NetworkVariableUpdate => 14,
            MessageKind::UnnamedMessage => 20,
            MessageKind::NamedMessage => 21,
            MessageKind::NetworkLog => 22,
            MessageKind::ServerRpc => 30,
            MessageKind::ClientRpc => 31,
        }
    }

    /// Returns `None` for bytes that name no known kind
    pub fn from_u8(value: u8) -> Option<Self> {
        MessageKind::ALL
            .iter()
            .find(|kind| kind.to_u8() == value)
            .copied()
    }

    /// RPC-class kinds are queued for later invocation instead of being applied
    pub fn is_rpc(self) -> bool {
        matches!(self, MessageKind::ServerRpc | MessageKind::ClientRpc)
    }
}

impl Serde for MessageKind {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(self.to_u8());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        MessageKind::from_u8(reader.read_byte()?).ok_or(SerdeErr)
    }
}
