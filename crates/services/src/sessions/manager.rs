use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use storage::LoadOutcome;
use storage::vocabulary::read_vocabulary;
use vocab_core::Clock;
use vocab_core::model::{
    ArchivedSession, Draw, EntryStatus, GameSettings, Outcome, Session, WordEntry, WordKey,
};

use crate::error::GameError;
use crate::session_store::SessionStore;

/// What recording an answer did to the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recorded {
    pub status: EntryStatus,
    /// The answer completed the session; it has been archived and a new one
    /// minted (or the vocabulary is exhausted).
    pub session_completed: bool,
}

/// Owns the master session, the current sub-session and the archive.
///
/// Sub-sessions are minted from the master's active stack; a completed
/// sub-session is archived with a timestamp and replaced right away. Once
/// the master's pool is empty there is no current session.
pub struct SessionManager {
    master: Session,
    current: Option<Session>,
    history: Vec<ArchivedSession>,
    settings: GameSettings,
    clock: Clock,
    rng: StdRng,
}

impl SessionManager {
    /// Build a master session from imported entries, dropping duplicates and
    /// entries too short to play.
    #[must_use]
    pub fn build_master(entries: impl IntoIterator<Item = WordEntry>) -> Session {
        let mut dropped = 0_usize;
        let playable: Vec<WordEntry> = entries
            .into_iter()
            .filter(|entry| {
                let keep = entry.is_playable();
                if !keep {
                    dropped += 1;
                    warn!(entry = %entry.key(), "dropping unplayable vocabulary entry");
                }
                keep
            })
            .collect();
        let master = Session::new(playable);
        info!(entries = master.len(), dropped, "built master session");
        master
    }

    /// Take every word of `current` and `history` out of the master's draw
    /// pool so a rebuilt master never hands them out again.
    pub fn withdraw_played(
        master: &mut Session,
        current: Option<&Session>,
        history: &[ArchivedSession],
    ) -> usize {
        let played: Vec<WordKey> = current
            .into_iter()
            .chain(history.iter().map(|archived| &archived.session))
            .flat_map(|session| session.stack().iter().map(WordEntry::key))
            .collect();
        let withdrawn = master.withdraw(&played);
        if withdrawn > 0 {
            info!(withdrawn, remaining = master.active_len(), "withdrew played words from master");
        }
        withdrawn
    }

    /// RNG for sampling; seeded runs are reproducible.
    #[must_use]
    pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Assemble a manager from already loaded state.
    ///
    /// Without a current session one is minted. A current session that is
    /// already complete is archived first.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Session` if minting fails.
    pub fn new(
        master: Session,
        current: Option<Session>,
        history: Vec<ArchivedSession>,
        settings: GameSettings,
        clock: Clock,
        rng: StdRng,
    ) -> Result<Self, GameError> {
        let mut manager = Self {
            master,
            current,
            history,
            settings,
            clock,
            rng,
        };

        match manager.current.as_ref().map(Session::is_completed) {
            None => manager.mint()?,
            Some(true) => {
                manager.archive_current();
                manager.mint()?;
            }
            Some(false) => {}
        }
        Ok(manager)
    }

    /// Load the game from `store`.
    ///
    /// A missing master is built from the vocabulary file. Missing or
    /// unreadable current session and history are replaced with fresh state.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoVocabulary` when neither a master session nor a
    /// vocabulary file exists, and `GameError::Storage` when the master or the
    /// vocabulary cannot be read.
    pub async fn bootstrap(
        store: &SessionStore,
        vocabulary: &Path,
        settings: GameSettings,
        clock: Clock,
        rng: StdRng,
    ) -> Result<Self, GameError> {
        let (current, history) = store.load_progress().await;
        let master = match store.load_master().await? {
            LoadOutcome::Found(master) => master,
            LoadOutcome::NotFound => {
                let entries = read_vocabulary(vocabulary)?
                    .ok_or_else(|| GameError::NoVocabulary(vocabulary.display().to_string()))?;
                let mut master = Self::build_master(entries);
                Self::withdraw_played(&mut master, current.as_ref(), &history);
                master
            }
        };

        debug!(
            master = master.len(),
            remaining = master.active_len(),
            archived = history.len(),
            "loaded game state"
        );
        Self::new(master, current, history, settings, clock, rng)
    }

    #[must_use]
    pub fn master(&self) -> &Session {
        &self.master
    }

    #[must_use]
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &[ArchivedSession] {
        &self.history
    }

    #[must_use]
    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    /// True once every word in the vocabulary has been through a sub-session.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current.is_none()
    }

    /// Draw the next word from the current session.
    ///
    /// # Errors
    ///
    /// Returns `GameError::ContentExhausted` when there is no current
    /// session, or `GameError::Session` if it has nothing left to draw.
    pub fn draw(&mut self) -> Result<Draw, GameError> {
        let current = self.current.as_mut().ok_or(GameError::ContentExhausted)?;
        Ok(current.sample1(&mut self.rng)?)
    }

    /// Classify `key` in the current session and roll over to a new session
    /// if that completed it.
    ///
    /// # Errors
    ///
    /// Returns `GameError::ContentExhausted` without a current session and
    /// `GameError::Session` if the key is not part of it.
    pub fn record(&mut self, key: &WordKey, outcome: Outcome) -> Result<Recorded, GameError> {
        let current = self.current.as_mut().ok_or(GameError::ContentExhausted)?;
        let status = current.record_outcome(key, outcome)?;
        let session_completed = current.is_completed();
        debug!(%key, ?outcome, ?status, "recorded answer");

        if session_completed {
            self.archive_current();
            self.mint()?;
        }
        Ok(Recorded {
            status,
            session_completed,
        })
    }

    /// Put a drawn word back without classifying it.
    ///
    /// # Errors
    ///
    /// Returns `GameError::ContentExhausted` without a current session and
    /// `GameError::Session` if the key is not part of it.
    pub fn skip(&mut self, key: &WordKey) -> Result<EntryStatus, GameError> {
        let current = self.current.as_mut().ok_or(GameError::ContentExhausted)?;
        Ok(current.release(key)?)
    }

    /// Persist master, current session and history.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` if any snapshot cannot be written.
    pub async fn save(&self, store: &SessionStore) -> Result<(), GameError> {
        store
            .save(&self.master, self.current.as_ref(), &self.history)
            .await?;
        Ok(())
    }

    fn archive_current(&mut self) {
        if let Some(session) = self.current.take() {
            let archived_at = self.clock.now();
            info!(words = session.len(), %archived_at, "archived completed session");
            self.history.push(ArchivedSession::new(session, archived_at));
        }
    }

    fn mint(&mut self) -> Result<(), GameError> {
        let n = self.settings.sub_session_size().min(self.master.active_len());
        if n == 0 {
            info!("vocabulary exhausted, no session to mint");
            self.current = None;
            return Ok(());
        }

        let session = self.master.sample_n_pop(n, &mut self.rng)?;
        info!(
            words = session.len(),
            remaining = self.master.active_len(),
            "minted new session"
        );
        self.current = Some(session);
        Ok(())
    }
}
