//! Engine configuration

use std::path::PathBuf;

/// Configuration for an [`Engine`](crate::Engine) instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Path of the snapshot file. Read once at startup if it exists,
    /// rewritten in full after every successful mutating operation.
    pub snapshot_path: PathBuf,
}

impl EngineConfig {
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("database.db"),
        }
    }
}
