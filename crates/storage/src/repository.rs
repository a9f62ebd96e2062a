use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The three persisted pieces of game state.
///
/// Each slot holds one whole-object snapshot that is overwritten on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The sub-session currently being played.
    CurrentSession,
    /// Completed sub-sessions, oldest first.
    OldSessions,
    /// The session owning the full vocabulary and the remaining draw pool.
    MasterSession,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::CurrentSession, Slot::OldSessions, Slot::MasterSession];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::CurrentSession => "current_session",
            Slot::OldSessions => "old_sessions",
            Slot::MasterSession => "master_session",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository contract for serialized game snapshots.
///
/// Payloads are opaque to the repository; encoding lives in [`crate::codec`].
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Fetch the payload stored in `slot`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. A slot that was
    /// never written is `Ok(None)`, not an error.
    async fn load(&self, slot: Slot) -> Result<Option<String>, StorageError>;

    /// Overwrite `slot` with `payload`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the payload cannot be stored.
    async fn store(&self, slot: Slot, payload: &str) -> Result<(), StorageError>;

    /// Overwrite several slots. Backends with transactions apply the batch atomically.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` encountered.
    async fn store_all(&self, batch: &[(Slot, String)]) -> Result<(), StorageError> {
        for (slot, payload) in batch {
            self.store(*slot, payload).await?;
        }
        Ok(())
    }

    /// Delete whatever is stored in `slot`. Removing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the removal.
    async fn remove(&self, slot: Slot) -> Result<(), StorageError>;

    /// Overwrite the `writes` slots and clear the `removals` slots as one
    /// batch. Backends with transactions commit both together.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` encountered.
    async fn apply_batch(
        &self,
        writes: &[(Slot, String)],
        removals: &[Slot],
    ) -> Result<(), StorageError> {
        self.store_all(writes).await?;
        for slot in removals {
            self.remove(*slot).await?;
        }
        Ok(())
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    slots: Arc<Mutex<HashMap<Slot, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryRepository {
    async fn load(&self, slot: Slot) -> Result<Option<String>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&slot).cloned())
    }

    async fn store(&self, slot: Slot, payload: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(slot, payload.to_owned());
        Ok(())
    }

    async fn remove(&self, slot: Slot) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&slot);
        Ok(())
    }
}

/// Snapshot repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub snapshots: Arc<dyn SnapshotRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            snapshots: Arc::new(InMemoryRepository::new()),
        }
    }
}
