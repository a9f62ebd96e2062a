use async_trait::async_trait;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::repository::{SnapshotRepository, Slot, Storage, StorageError};

/// One JSON file per slot under a data directory.
///
/// Writes go to a temporary file in the same directory which is synced and
/// then renamed over the target, so a crash mid-save leaves the previous
/// snapshot intact.
#[derive(Debug, Clone)]
pub struct FileRepository {
    dir: PathBuf,
}

impl FileRepository {
    /// Open (and create if needed) the data directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, slot: Slot) -> PathBuf {
        self.dir.join(format!("{}.json", slot.as_str()))
    }

    fn atomic_write(path: &Path, data: &[u8]) -> Result<(), StorageError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StorageError::Connection(format!("invalid path {}", path.display())))?;
        let tmp = path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()));

        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(data)?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        // Directory sync is not supported everywhere.
        if let Some(dir) = path.parent() {
            if let Ok(handle) = fs::File::open(dir) {
                let _ = handle.sync_all();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotRepository for FileRepository {
    async fn load(&self, slot: Slot) -> Result<Option<String>, StorageError> {
        let path = self.path_for(slot);
        match fs::read_to_string(&path) {
            Ok(raw) => {
                debug!(%slot, path = %path.display(), bytes = raw.len(), "loaded snapshot");
                Ok(Some(raw))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, slot: Slot, payload: &str) -> Result<(), StorageError> {
        let path = self.path_for(slot);
        Self::atomic_write(&path, payload.as_bytes())?;
        debug!(%slot, path = %path.display(), bytes = payload.len(), "stored snapshot");
        Ok(())
    }

    async fn remove(&self, slot: Slot) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(slot)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Storage {
    /// Build a `Storage` backed by JSON files in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn files(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let repo = FileRepository::open(dir)?;
        Ok(Self {
            snapshots: Arc::new(repo),
        })
    }
}
