use thiserror::Error;

/// Words per gameplay round minted from the master session.
pub const DEFAULT_SUB_SESSION_SIZE: usize = 50;
/// Wrong guesses before the hangman is complete.
pub const DEFAULT_MAX_MISSES: u8 = 7;

const MAX_MISSES_LIMIT: u8 = 26;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("sub-session size must be > 0")]
    InvalidSubSessionSize,

    #[error("max misses must be between 1 and {MAX_MISSES_LIMIT}")]
    InvalidMaxMisses,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Tunables for a game: round size and hangman length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    sub_session_size: usize,
    max_misses: u8,
}

impl GameSettings {
    /// Creates validated game settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the round size is zero or the miss budget
    /// is outside `1..=26`.
    pub fn new(sub_session_size: usize, max_misses: u8) -> Result<Self, SettingsError> {
        if sub_session_size == 0 {
            return Err(SettingsError::InvalidSubSessionSize);
        }
        if !(1..=MAX_MISSES_LIMIT).contains(&max_misses) {
            return Err(SettingsError::InvalidMaxMisses);
        }
        Ok(Self {
            sub_session_size,
            max_misses,
        })
    }

    #[must_use]
    pub fn sub_session_size(&self) -> usize {
        self.sub_session_size
    }

    #[must_use]
    pub fn max_misses(&self) -> u8 {
        self.max_misses
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            sub_session_size: DEFAULT_SUB_SESSION_SIZE,
            max_misses: DEFAULT_MAX_MISSES,
        }
    }
}
