use chrono::{DateTime, Utc};
use serde::Serialize;

use vocab_core::model::{ArchivedSession, Difficulty, EntryStatus, Session};

use crate::error::GameError;
use crate::session_store::SessionStore;

/// Summary of one sub-session, archived or current.
///
/// Plain data only; formatting is up to the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackTile {
    /// Position in the gallery, oldest first.
    pub index: usize,
    pub total: usize,
    /// Size of the session's own draw pool.
    pub active: usize,
    pub unseen: usize,
    pub known: usize,
    pub unknown: usize,
    pub completed: bool,
    /// `None` for the session still being played.
    pub archived_at: Option<DateTime<Utc>>,
}

impl StackTile {
    #[must_use]
    pub fn from_session(index: usize, session: &Session, archived_at: Option<DateTime<Utc>>) -> Self {
        Self {
            index,
            total: session.len(),
            active: session.active_len(),
            unseen: session.unseen_len(),
            known: session.known_len(),
            unknown: session.unknown_len(),
            completed: session.is_completed(),
            archived_at,
        }
    }

    #[must_use]
    pub fn is_current(&self) -> bool {
        self.archived_at.is_none()
    }
}

/// One line of an expanded tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileEntry {
    pub word: String,
    pub category: String,
    pub meaning: String,
    pub example: String,
    pub difficulty: Difficulty,
    pub status: EntryStatus,
}

/// Size of the whole vocabulary and how much of it is still undrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MasterOverview {
    pub vocabulary: usize,
    pub remaining: usize,
    pub archived_sessions: usize,
}

/// Read-only view over every session the player has had.
#[derive(Debug, Clone)]
pub struct StackGallery {
    master: Option<Session>,
    sessions: Vec<(Session, Option<DateTime<Utc>>)>,
}

impl StackGallery {
    #[must_use]
    pub fn new(
        master: Option<Session>,
        history: Vec<ArchivedSession>,
        current: Option<Session>,
    ) -> Self {
        let mut sessions: Vec<(Session, Option<DateTime<Utc>>)> = history
            .into_iter()
            .map(|archived| (archived.session, Some(archived.archived_at)))
            .collect();
        sessions.extend(current.map(|session| (session, None)));
        Self { master, sessions }
    }

    /// Read whatever is stored. Unlike the game bootstrap nothing is minted
    /// or built, so an empty store yields an empty gallery. An unreadable
    /// current session or history is shown as absent.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` if the master snapshot cannot be read or
    /// decoded.
    pub async fn load(store: &SessionStore) -> Result<Self, GameError> {
        let master = store.load_master().await?.into_option();
        let (current, history) = store.load_progress().await;
        Ok(Self::new(master, history, current))
    }

    #[must_use]
    pub fn tiles(&self) -> Vec<StackTile> {
        self.sessions
            .iter()
            .enumerate()
            .map(|(index, (session, archived_at))| {
                StackTile::from_session(index, session, *archived_at)
            })
            .collect()
    }

    /// Entries of the tile at `index` with their status in that session.
    #[must_use]
    pub fn entries(&self, index: usize) -> Option<Vec<TileEntry>> {
        let (session, _) = self.sessions.get(index)?;
        Some(
            session
                .entries()
                .map(|(entry, status)| TileEntry {
                    word: entry.word.clone(),
                    category: entry.category.clone(),
                    meaning: entry.meaning.clone(),
                    example: entry.example.clone(),
                    difficulty: entry.difficulty,
                    status,
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn overview(&self) -> Option<MasterOverview> {
        self.master.as_ref().map(|master| MasterOverview {
            vocabulary: master.len(),
            remaining: master.active_len(),
            archived_sessions: self
                .sessions
                .iter()
                .filter(|(_, archived_at)| archived_at.is_some())
                .count(),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
