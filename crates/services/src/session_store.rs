use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use storage::codec::{self, LoadOutcome};
use storage::repository::{InMemoryRepository, SnapshotRepository, Slot, StorageError};
use vocab_core::model::{ArchivedSession, Session};

/// Typed access to the three persisted snapshots.
///
/// Constructed once at startup and handed to whoever needs to load or save
/// game state.
#[derive(Clone)]
pub struct SessionStore {
    snapshots: Arc<dyn SnapshotRepository>,
}

impl SessionStore {
    #[must_use]
    pub fn new(snapshots: Arc<dyn SnapshotRepository>) -> Self {
        Self { snapshots }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be read or does not decode.
    pub async fn load_master(&self) -> Result<LoadOutcome<Session>, StorageError> {
        self.load(Slot::MasterSession).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be read or does not decode.
    pub async fn load_current(&self) -> Result<LoadOutcome<Session>, StorageError> {
        self.load(Slot::CurrentSession).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be read or does not decode.
    pub async fn load_history(&self) -> Result<LoadOutcome<Vec<ArchivedSession>>, StorageError> {
        self.load(Slot::OldSessions).await
    }

    /// Write all three snapshots as one batch. A missing current session
    /// clears its slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or any write fails.
    pub async fn save(
        &self,
        master: &Session,
        current: Option<&Session>,
        history: &[ArchivedSession],
    ) -> Result<(), StorageError> {
        let mut batch = vec![
            (Slot::OldSessions, codec::encode(history)?),
            (Slot::MasterSession, codec::encode(master)?),
        ];
        let removals = match current {
            Some(current) => {
                batch.push((Slot::CurrentSession, codec::encode(current)?));
                Vec::new()
            }
            None => vec![Slot::CurrentSession],
        };
        self.snapshots.apply_batch(&batch, &removals).await?;
        debug!(slots = batch.len(), cleared = removals.len(), "saved game state");
        Ok(())
    }

    /// Current session and history, with anything unreadable replaced by
    /// fresh state: no current session and an empty history.
    pub async fn load_progress(&self) -> (Option<Session>, Vec<ArchivedSession>) {
        let current = match self.load_current().await {
            Ok(outcome) => outcome.into_option(),
            Err(e) => {
                warn!(error = %e, "current session unreadable, starting a new one");
                None
            }
        };

        let history = match self.load_history().await {
            Ok(outcome) => outcome.into_option().unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "session history unreadable, starting empty");
                Vec::new()
            }
        };

        (current, history)
    }

    /// Replace the master session only.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn save_master(&self, master: &Session) -> Result<(), StorageError> {
        let payload = codec::encode(master)?;
        self.snapshots.store(Slot::MasterSession, &payload).await
    }

    /// Store `master` and forget the current session and the history, in
    /// one batch.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding, the write or a removal fails.
    pub async fn reset(&self, master: &Session) -> Result<(), StorageError> {
        let payload = codec::encode(master)?;
        self.snapshots
            .apply_batch(
                &[(Slot::MasterSession, payload)],
                &[Slot::CurrentSession, Slot::OldSessions],
            )
            .await
    }

    async fn load<T: DeserializeOwned>(&self, slot: Slot) -> Result<LoadOutcome<T>, StorageError> {
        match self.snapshots.load(slot).await? {
            Some(raw) => Ok(LoadOutcome::Found(codec::decode(slot, &raw)?)),
            None => Ok(LoadOutcome::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::model::{Difficulty, WordEntry};
    use vocab_core::time::fixed_now;

    fn session(words: &[&str]) -> Session {
        Session::new(words.iter().map(|w| {
            WordEntry::new(*w, "noun", "a test meaning", "", Difficulty::Common)
        }))
    }

    #[tokio::test]
    async fn empty_store_reports_not_found() {
        let store = SessionStore::in_memory();
        assert_eq!(store.load_master().await.unwrap(), LoadOutcome::NotFound);
        assert_eq!(store.load_current().await.unwrap(), LoadOutcome::NotFound);
        assert_eq!(store.load_history().await.unwrap(), LoadOutcome::NotFound);
    }

    #[tokio::test]
    async fn save_round_trips_all_three_slots() {
        let store = SessionStore::in_memory();
        let master = session(&["alpha", "bravo", "charlie"]);
        let current = session(&["delta"]);
        let history = vec![ArchivedSession::new(session(&["echo"]), fixed_now())];

        store.save(&master, Some(&current), &history).await.unwrap();

        assert_eq!(store.load_master().await.unwrap(), LoadOutcome::Found(master));
        assert_eq!(store.load_current().await.unwrap(), LoadOutcome::Found(current));
        let LoadOutcome::Found(loaded) = store.load_history().await.unwrap() else {
            panic!("history missing");
        };
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].archived_at, fixed_now());
    }

    #[tokio::test]
    async fn saving_without_current_clears_the_slot() {
        let store = SessionStore::in_memory();
        let master = session(&["alpha"]);
        store.save(&master, Some(&master), &[]).await.unwrap();
        store.save(&master, None, &[]).await.unwrap();
        assert_eq!(store.load_current().await.unwrap(), LoadOutcome::NotFound);
    }

    #[tokio::test]
    async fn reset_replaces_master_and_forgets_progress() {
        let store = SessionStore::in_memory();
        let master = session(&["alpha"]);
        let history = vec![ArchivedSession::new(session(&["echo"]), fixed_now())];
        store.save(&master, Some(&master), &history).await.unwrap();

        let fresh = session(&["bravo", "charlie"]);
        store.reset(&fresh).await.unwrap();
        assert_eq!(store.load_master().await.unwrap(), LoadOutcome::Found(fresh));
        assert!(!store.load_current().await.unwrap().is_found());
        assert!(!store.load_history().await.unwrap().is_found());
    }

    #[tokio::test]
    async fn unreadable_progress_loads_as_fresh_state() {
        let repo = InMemoryRepository::new();
        repo.store(Slot::CurrentSession, "{garbage").await.unwrap();
        repo.store(Slot::OldSessions, "{\"not\": \"a list\"}").await.unwrap();
        let store = SessionStore::new(Arc::new(repo));

        assert!(store.load_history().await.is_err());
        let (current, history) = store.load_progress().await;
        assert!(current.is_none());
        assert!(history.is_empty());
    }
}
