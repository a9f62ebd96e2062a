#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod session_store;
pub mod sessions;

pub use vocab_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, GameError};
pub use session_store::SessionStore;
pub use storage::LoadOutcome;

pub use sessions::{
    GameLoopService, ImportReport, MasterOverview, Recorded, Scoreboard, SessionManager,
    StackGallery, StackTile, TileEntry, TurnResult, import_vocabulary,
};
