use thiserror::Error;

use crate::types::SceneIndex;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SceneSyncError {
    /// A scene load completed but nothing was waiting for it
    #[error("No scene load is pending")]
    NoPendingSceneLoad,

    #[error("Scene management is disabled")]
    SceneManagementDisabled,

    #[error("Scene {scene_index} is not registered ({registered} scenes known)")]
    UnknownScene {
        scene_index: SceneIndex,
        registered: usize,
    },
}
