mod gallery;
mod import;
mod manager;
mod workflow;

// Public API of the session subsystem.
pub use gallery::{MasterOverview, StackGallery, StackTile, TileEntry};
pub use import::{ImportReport, import_vocabulary};
pub use manager::{Recorded, SessionManager};
pub use workflow::{GameLoopService, Scoreboard, TurnResult};
