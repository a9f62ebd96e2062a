use std::path::Path;

use tracing::info;

use storage::vocabulary::read_vocabulary;

use super::manager::SessionManager;
use crate::error::GameError;
use crate::session_store::SessionStore;

/// What an import left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub read: usize,
    pub kept: usize,
    /// Words left out of the draw pool because they were already played.
    pub withdrawn: usize,
    pub reset: bool,
}

/// Replace the master session with one built from a vocabulary file.
///
/// With `reset` the current session and history are cleared too. Otherwise
/// they are kept, and every word they hold is withdrawn from the new pool so
/// it is not drawn a second time.
///
/// # Errors
///
/// Returns `GameError::NoVocabulary` if the file does not exist and
/// `GameError::Storage` if it cannot be parsed or the store rejects a write.
pub async fn import_vocabulary(
    store: &SessionStore,
    path: &Path,
    reset: bool,
) -> Result<ImportReport, GameError> {
    let entries =
        read_vocabulary(path)?.ok_or_else(|| GameError::NoVocabulary(path.display().to_string()))?;
    let read = entries.len();
    let mut master = SessionManager::build_master(entries);

    let withdrawn = if reset {
        store.reset(&master).await?;
        0
    } else {
        let (current, history) = store.load_progress().await;
        let withdrawn = SessionManager::withdraw_played(&mut master, current.as_ref(), &history);
        store.save_master(&master).await?;
        withdrawn
    };
    info!(
        path = %path.display(),
        read,
        kept = master.len(),
        withdrawn,
        reset,
        "imported vocabulary"
    );

    Ok(ImportReport {
        read,
        kept: master.len(),
        withdrawn,
        reset,
    })
}
