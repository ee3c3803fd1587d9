//! Whole-state snapshot persistence
//!
//! The entire engine state (schemas, rows, indexes, row-id counters)
//! is serialized as one bincode blob and rewritten in full after every
//! successful mutating operation. Reads and writes are whole-snapshot,
//! never incremental. The write is a plain create-and-replace: a write
//! interrupted mid-flight can corrupt the file. That risk is accepted
//! here; write-ahead logging and rename-on-write are out of scope.

use super::Storage;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Handle on the snapshot file backing one engine instance.
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted state. A missing file means an empty database,
    /// not an error.
    ///
    /// # Errors
    /// `Error::StorageIo` when the file exists but cannot be read or
    /// decoded.
    pub fn load(&self) -> Result<Storage> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no snapshot file, starting empty");
            return Ok(Storage::default());
        }
        let bytes = fs::read(&self.path).map_err(|e| {
            Error::StorageIo(format!(
                "failed to read snapshot {}: {e}",
                self.path.display()
            ))
        })?;
        let storage: Storage = bincode::deserialize(&bytes).map_err(|e| {
            Error::StorageIo(format!(
                "failed to decode snapshot {}: {e}",
                self.path.display()
            ))
        })?;
        info!(
            path = %self.path.display(),
            tables = storage.table_count(),
            "loaded snapshot"
        );
        Ok(storage)
    }

    /// Serializes and writes the full state, synchronously. The caller is
    /// unblocked only after the write returns.
    ///
    /// # Errors
    /// `Error::StorageIo` on encoding or write failure. In-memory state
    /// and the on-disk snapshot may then diverge; there is no rollback.
    pub fn persist(&self, storage: &Storage) -> Result<()> {
        let bytes = bincode::serialize(storage)
            .map_err(|e| Error::StorageIo(format!("failed to encode snapshot: {e}")))?;
        fs::write(&self.path, &bytes).map_err(|e| {
            Error::StorageIo(format!(
                "failed to write snapshot {}: {e}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "wrote snapshot");
        Ok(())
    }
}
