use tessera_serde::{ByteReader, OwnedByteReader};

use crate::{
    connection::lifetime::LifetimeToken, scene::switch_token::SceneSwitchToken,
    types::SceneIndex,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContinuationKind {
    /// The rest of ConnectionApproved: clear stale state, spawn the
    /// snapshot, then mark the connection established
    InitialSync,
    /// The rest of SwitchScene: replace scene objects with the snapshot
    SceneSwitch,
}

impl ContinuationKind {
    pub fn name(&self) -> &'static str {
        match self {
            ContinuationKind::InitialSync => "initial sync",
            ContinuationKind::SceneSwitch => "scene switch",
        }
    }
}

/// Work suspended until the requested scene has finished loading. Owns the
/// unread part of the message that started it, so the original packet
/// buffer can be released.
#[derive(Debug)]
pub struct SceneLoadContinuation {
    kind: ContinuationKind,
    scene_index: SceneIndex,
    token: SceneSwitchToken,
    lifetime: LifetimeToken,
    remainder: OwnedByteReader,
}

impl SceneLoadContinuation {
    pub fn new(
        kind: ContinuationKind,
        scene_index: SceneIndex,
        token: SceneSwitchToken,
        lifetime: LifetimeToken,
        remainder: &ByteReader,
    ) -> Self {
        Self {
            kind,
            scene_index,
            token,
            lifetime,
            remainder: remainder.to_owned(),
        }
    }

    pub fn kind(&self) -> ContinuationKind {
        self.kind
    }

    pub fn scene_index(&self) -> SceneIndex {
        self.scene_index
    }

    pub fn token(&self) -> SceneSwitchToken {
        self.token
    }

    pub fn is_live(&self) -> bool {
        self.lifetime.is_live()
    }

    pub fn remainder(&self) -> &OwnedByteReader {
        &self.remainder
    }
}
