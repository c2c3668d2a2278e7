//! # Tessera Shared
//! Message-handling core of the tessera object replication protocol: inbound
//! dispatch, the connection handshake, object spawn/destroy, ownership,
//! replicated variable sync with buffering, and scene switch barriers.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use tessera_serde::{
    ByteReader, ByteWrite, ByteWriter, OwnedByteReader, Serde, SerdeErr,
};

mod config;
mod connection;
mod dispatch;
mod error;
mod events;
mod messages;
mod rpc;
mod scene;
mod types;
mod world;

pub use config::NetworkConfig;
pub use connection::{
    approval::{ApprovalDecision, ApprovalTicket},
    clock::NetworkClock,
    continuation::{ContinuationKind, SceneLoadContinuation},
    disconnect::DisconnectReason,
    error::HandshakeError,
    lifetime::{ConnectionLifetime, LifetimeToken},
};
pub use dispatch::{
    context::NetworkContext,
    dispatcher::{InboundMessage, MessageDispatcher, MessageHandler, RoleFilter, Route},
    outcome::{DispatchOutcome, DropReason},
};
pub use error::NetworkError;
pub use events::{
    ApprovalRequestEvent, ApprovedEvent, ClientSceneLoadedEvent, ConnectEvent, DisconnectEvent,
    ErrorEvent, NamedMessageEvent, NetworkEvent, NetworkEvents, NetworkLogEvent,
    SceneLoadRequestEvent, SwitchCompletedEvent, UnnamedMessageEvent,
};
pub use messages::{
    message_kind::MessageKind,
    network_log::{NetworkLogMessage, NetworkLogType},
    wire::{
        ChangeOwnerMessage, ConnectionApprovedHeader, ConnectionRequest, SwitchSceneHeader,
        VariableMessageHeader,
    },
};
pub use rpc::{
    error::RpcQueueError,
    rpc_queue::{RpcIngest, RpcIngestQueue, RpcQueueConfig, RpcQueueItem},
};
pub use scene::{
    error::SceneSyncError,
    scene_barrier::{SceneSyncBarrier, SwitchAck},
    switch_token::{SceneSwitchToken, SWITCH_TOKEN_BYTES},
};
pub use types::{
    BehaviourIndex, ClientId, HostType, NetworkChannel, ObjectId, SceneIndex, Vec3,
    SERVER_CLIENT_ID,
};
pub use world::{
    client_registry::{ClientRecord, ClientRegistry},
    error::{RegistryError, WorldError},
    lifecycle::spawn_object,
    message_buffer::{BufferedMessage, BufferingPolicy, MessageBuffer},
    object_descriptor::{
        write_object_list, IdentityMode, ObjectDescriptor, ObjectIdentity, ObjectSpawn, SpawnPose,
    },
    object_registry::{ObjectRegistry, SpawnedObject},
    ownership::change_owner,
    replica_world::ReplicaWorld,
};
