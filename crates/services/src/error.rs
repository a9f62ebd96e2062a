//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use vocab_core::HangmanError;
use vocab_core::model::{SessionError, SettingsError};

/// Errors emitted while running the game.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error("no master session stored and no vocabulary file at {0}")]
    NoVocabulary(String),
    #[error("every word has been played; import a new vocabulary to continue")]
    ContentExhausted,
    #[error("no word is being played")]
    NoActiveRound,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Hangman(#[from] HangmanError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
