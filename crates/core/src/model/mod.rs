mod archive;
mod ids;
mod session;
mod settings;
mod word;

pub use archive::ArchivedSession;
pub use ids::WordKey;
pub use session::{Draw, EntryStatus, Outcome, Pool, Session, SessionError, SessionSnapshot};
pub use settings::{DEFAULT_MAX_MISSES, DEFAULT_SUB_SESSION_SIZE, GameSettings, SettingsError};
pub use word::{Difficulty, DifficultyError, WordEntry};
