use std::path::{Path, PathBuf};
use std::sync::Arc;

use storage::repository::{SnapshotRepository, Storage};
use vocab_core::model::GameSettings;

use crate::Clock;
use crate::error::{AppServicesError, GameError};
use crate::session_store::SessionStore;
use crate::sessions::{
    GameLoopService, ImportReport, SessionManager, StackGallery, import_vocabulary,
};

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    store: SessionStore,
    settings: GameSettings,
    vocabulary: PathBuf,
    clock: Clock,
    seed: Option<u64>,
}

impl AppServices {
    #[must_use]
    pub fn new(
        snapshots: Arc<dyn SnapshotRepository>,
        settings: GameSettings,
        vocabulary: impl Into<PathBuf>,
        clock: Clock,
    ) -> Self {
        Self {
            store: SessionStore::new(snapshots),
            settings,
            vocabulary: vocabulary.into(),
            clock,
            seed: None,
        }
    }

    /// Build services backed by JSON files in `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the data directory cannot be created.
    pub fn new_files(
        data_dir: &Path,
        settings: GameSettings,
        vocabulary: impl Into<PathBuf>,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::files(data_dir)?;
        Ok(Self::new(storage.snapshots, settings, vocabulary, clock))
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        settings: GameSettings,
        vocabulary: impl Into<PathBuf>,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(storage.snapshots, settings, vocabulary, clock))
    }

    #[must_use]
    pub fn in_memory(settings: GameSettings, clock: Clock) -> Self {
        let storage = Storage::in_memory();
        Self::new(storage.snapshots, settings, PathBuf::new(), clock)
    }

    /// Fix the sampling seed for reproducible games.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    #[must_use]
    pub fn vocabulary_path(&self) -> &Path {
        &self.vocabulary
    }

    /// Load (or create) the game and hand back a loop ready to draw words.
    ///
    /// # Errors
    ///
    /// Returns `GameError` if the master session cannot be loaded or built.
    pub async fn start_game(&self) -> Result<GameLoopService, GameError> {
        let manager = SessionManager::bootstrap(
            &self.store,
            &self.vocabulary,
            self.settings,
            self.clock,
            SessionManager::rng_from_seed(self.seed),
        )
        .await?;
        Ok(GameLoopService::new(self.store.clone(), manager))
    }

    /// # Errors
    ///
    /// Returns `GameError::Storage` if stored snapshots cannot be read.
    pub async fn gallery(&self) -> Result<StackGallery, GameError> {
        StackGallery::load(&self.store).await
    }

    /// # Errors
    ///
    /// Returns `GameError` if the file is missing or unreadable, or the
    /// store rejects the new master session.
    pub async fn import(&self, path: &Path, reset: bool) -> Result<ImportReport, GameError> {
        import_vocabulary(&self.store, path, reset).await
    }
}
