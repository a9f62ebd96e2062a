use indexmap::IndexSet;
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

use crate::model::ids::WordKey;
use crate::model::word::WordEntry;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    /// Every classification pool is empty (empty stack, or the only entries are pending).
    #[error("no entries available to sample")]
    NothingToSample,

    #[error("requested {requested} entries but only {available} remain in the pool")]
    InsufficientPool { requested: usize, available: usize },

    #[error("{key} is not part of this session")]
    NotInSession { key: WordKey },

    #[error("corrupt session snapshot: {0}")]
    CorruptSnapshot(String),
}

//
// ─── STATUS / OUTCOME ──────────────────────────────────────────────────────────
//

/// Classification of one entry within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryStatus {
    /// Not presented yet.
    Unseen,
    /// Drawn from `Unseen` and shown, waiting for the player's answer.
    Pending,
    Known,
    Unknown,
}

/// Result of a single presentation, as reported by the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// The pool a draw came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pool {
    Known,
    Unknown,
    Unseen,
}

impl Pool {
    /// Draw order when walking the ticket line.
    pub const ALL: [Pool; 3] = [Pool::Known, Pool::Unknown, Pool::Unseen];

    /// Lottery tickets a non-empty pool contributes to each draw.
    ///
    /// Unknown and unseen material comes up twice as often as known material.
    #[must_use]
    pub fn tickets(self) -> u32 {
        match self {
            Pool::Known => 1,
            Pool::Unknown | Pool::Unseen => 2,
        }
    }
}

/// Entry picked by [`Session::sample1`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub entry: WordEntry,
    pub source: Pool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// A bounded working set of vocabulary entries.
///
/// Membership (`stack`) is fixed at construction. Each entry carries one
/// [`EntryStatus`]; the unseen/known/unknown pools are index sets into the
/// stack so that draws and reclassifications are O(1).
///
/// `active_stack` is the pool consumed by [`Session::sample_n_pop`]; only the
/// master session draws from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SessionSnapshot", try_from = "SessionSnapshot")]
pub struct Session {
    stack: Vec<WordEntry>,
    active_stack: Vec<WordEntry>,
    positions: HashMap<WordKey, usize>,
    status: Vec<EntryStatus>,
    unseen: IndexSet<usize>,
    known: IndexSet<usize>,
    unknown: IndexSet<usize>,
    completed: bool,
}

impl Session {
    /// Build a session owning a copy of `entries`, in order.
    ///
    /// Entries repeating an earlier word + category are skipped; the first
    /// occurrence wins.
    pub fn new(entries: impl IntoIterator<Item = WordEntry>) -> Self {
        let mut stack = Vec::new();
        let mut positions = HashMap::new();
        for entry in entries {
            let key = entry.key();
            if positions.contains_key(&key) {
                continue;
            }
            positions.insert(key, stack.len());
            stack.push(entry);
        }

        Self {
            active_stack: stack.clone(),
            status: vec![EntryStatus::Unseen; stack.len()],
            unseen: (0..stack.len()).collect(),
            known: IndexSet::new(),
            unknown: IndexSet::new(),
            completed: false,
            positions,
            stack,
        }
    }

    #[must_use]
    pub fn stack(&self) -> &[WordEntry] {
        &self.stack
    }

    #[must_use]
    pub fn active_stack(&self) -> &[WordEntry] {
        &self.active_stack
    }

    pub fn unseen(&self) -> impl Iterator<Item = &WordEntry> {
        self.unseen.iter().map(|&i| &self.stack[i])
    }

    pub fn known(&self) -> impl Iterator<Item = &WordEntry> {
        self.known.iter().map(|&i| &self.stack[i])
    }

    pub fn unknown(&self) -> impl Iterator<Item = &WordEntry> {
        self.unknown.iter().map(|&i| &self.stack[i])
    }

    /// Entries drawn from `unseen` that have not been classified yet.
    pub fn pending(&self) -> impl Iterator<Item = &WordEntry> {
        self.stack
            .iter()
            .zip(&self.status)
            .filter(|(_, status)| **status == EntryStatus::Pending)
            .map(|(entry, _)| entry)
    }

    /// Every stack entry paired with its current status, in stack order.
    pub fn entries(&self) -> impl Iterator<Item = (&WordEntry, EntryStatus)> {
        self.stack.iter().zip(self.status.iter().copied())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[must_use]
    pub fn active_len(&self) -> usize {
        self.active_stack.len()
    }

    #[must_use]
    pub fn unseen_len(&self) -> usize {
        self.unseen.len()
    }

    #[must_use]
    pub fn known_len(&self) -> usize {
        self.known.len()
    }

    #[must_use]
    pub fn unknown_len(&self) -> usize {
        self.unknown.len()
    }

    /// True once every entry is known and none is unknown.
    ///
    /// An empty session never completes.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn contains(&self, key: &WordKey) -> bool {
        self.positions.contains_key(key)
    }

    #[must_use]
    pub fn status_of(&self, key: &WordKey) -> Option<EntryStatus> {
        self.positions.get(key).map(|&i| self.status[i])
    }

    /// Pick the next entry to present.
    ///
    /// A pool is chosen by ticket lottery (see [`Pool::tickets`]), then an
    /// entry uniformly within it. Known and unknown entries stay where they
    /// are; an unseen entry is removed from `unseen` and becomes
    /// [`EntryStatus::Pending`] until the caller records an outcome or
    /// releases it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingToSample` when all three pools are empty.
    pub fn sample1<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Draw, SessionError> {
        let total: u32 = Pool::ALL
            .iter()
            .filter(|pool| !self.pool(**pool).is_empty())
            .map(|pool| pool.tickets())
            .sum();
        if total == 0 {
            return Err(SessionError::NothingToSample);
        }

        let mut ticket = rng.random_range(0..total);
        let mut source = Pool::Unseen;
        for pool in Pool::ALL {
            if self.pool(pool).is_empty() {
                continue;
            }
            if ticket < pool.tickets() {
                source = pool;
                break;
            }
            ticket -= pool.tickets();
        }

        let at = rng.random_range(0..self.pool(source).len());
        let idx = match source {
            Pool::Known | Pool::Unknown => self.pool(source).get_index(at).copied(),
            Pool::Unseen => self.unseen.swap_remove_index(at),
        }
        .ok_or(SessionError::NothingToSample)?;

        if source == Pool::Unseen {
            self.status[idx] = EntryStatus::Pending;
        }

        Ok(Draw {
            entry: self.stack[idx].clone(),
            source,
        })
    }

    /// Carve `n` random entries out of `active_stack` into a new session.
    ///
    /// The drawn entries are gone from this session's pool for good.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InsufficientPool` if fewer than `n` entries
    /// remain; the pool is left untouched in that case.
    pub fn sample_n_pop<R: Rng + ?Sized>(
        &mut self,
        n: usize,
        rng: &mut R,
    ) -> Result<Session, SessionError> {
        let available = self.active_stack.len();
        if n > available {
            return Err(SessionError::InsufficientPool {
                requested: n,
                available,
            });
        }

        let picked = index::sample(rng, available, n).into_vec();
        let drawn: Vec<WordEntry> = picked.iter().map(|&i| self.active_stack[i].clone()).collect();

        let picked: HashSet<usize> = picked.into_iter().collect();
        let mut position = 0;
        self.active_stack.retain(|_| {
            let keep = !picked.contains(&position);
            position += 1;
            keep
        });

        Ok(Session::new(drawn))
    }

    /// Drop every entry whose key is in `keys` from `active_stack`, as if it
    /// had already been carved out. Returns how many entries were dropped.
    pub fn withdraw<'a>(&mut self, keys: impl IntoIterator<Item = &'a WordKey>) -> usize {
        let keys: HashSet<&WordKey> = keys.into_iter().collect();
        let before = self.active_stack.len();
        self.active_stack.retain(|entry| !keys.contains(&entry.key()));
        before - self.active_stack.len()
    }

    /// Classify an entry after the player answered it.
    ///
    /// `Correct` moves the entry to `known`, `Incorrect` to `unknown`, from
    /// whichever state it was in. Completion is re-evaluated afterwards.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInSession` if the key is not in the stack.
    pub fn record_outcome(
        &mut self,
        key: &WordKey,
        outcome: Outcome,
    ) -> Result<EntryStatus, SessionError> {
        let idx = self.position(key)?;
        self.detach(idx);

        let status = match outcome {
            Outcome::Correct => {
                self.known.insert(idx);
                EntryStatus::Known
            }
            Outcome::Incorrect => {
                self.unknown.insert(idx);
                EntryStatus::Unknown
            }
        };
        self.status[idx] = status;
        self.refresh_completed();
        Ok(status)
    }

    /// Put a pending entry back into `unseen` without classifying it.
    ///
    /// Entries in any other state are left alone. Returns the resulting status.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInSession` if the key is not in the stack.
    pub fn release(&mut self, key: &WordKey) -> Result<EntryStatus, SessionError> {
        let idx = self.position(key)?;
        if self.status[idx] == EntryStatus::Pending {
            self.unseen.insert(idx);
            self.status[idx] = EntryStatus::Unseen;
        }
        Ok(self.status[idx])
    }

    fn position(&self, key: &WordKey) -> Result<usize, SessionError> {
        self.positions
            .get(key)
            .copied()
            .ok_or_else(|| SessionError::NotInSession { key: key.clone() })
    }

    fn pool(&self, pool: Pool) -> &IndexSet<usize> {
        match pool {
            Pool::Known => &self.known,
            Pool::Unknown => &self.unknown,
            Pool::Unseen => &self.unseen,
        }
    }

    fn detach(&mut self, idx: usize) {
        match self.status[idx] {
            EntryStatus::Unseen => {
                self.unseen.swap_remove(&idx);
            }
            EntryStatus::Known => {
                self.known.swap_remove(&idx);
            }
            EntryStatus::Unknown => {
                self.unknown.swap_remove(&idx);
            }
            EntryStatus::Pending => {}
        }
    }

    fn refresh_completed(&mut self) {
        self.completed =
            !self.stack.is_empty() && self.known.len() == self.stack.len() && self.unknown.is_empty();
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "session with {} known and {} unknown words among {}; {} active",
            self.known.len(),
            self.unknown.len(),
            self.stack.len(),
            self.active_stack.len()
        )
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Persisted shape of a [`Session`].
///
/// Pools are stored as keys. Pending entries are written as unseen so a
/// session saved mid-question can still be completed after reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub stack: Vec<WordEntry>,
    pub active_stack: Vec<WordEntry>,
    pub unseen: Vec<WordKey>,
    pub known: Vec<WordKey>,
    pub unknown: Vec<WordKey>,
    #[serde(default)]
    pub completed: bool,
}

impl From<Session> for SessionSnapshot {
    fn from(session: Session) -> Self {
        let keys = |set: &IndexSet<usize>| -> Vec<WordKey> {
            set.iter().map(|&i| session.stack[i].key()).collect()
        };
        let unseen = session
            .stack
            .iter()
            .zip(&session.status)
            .filter(|(_, s)| matches!(s, EntryStatus::Unseen | EntryStatus::Pending))
            .map(|(entry, _)| entry.key())
            .collect();
        let known = keys(&session.known);
        let unknown = keys(&session.unknown);

        Self {
            completed: session.completed,
            stack: session.stack,
            active_stack: session.active_stack,
            unseen,
            known,
            unknown,
        }
    }
}

impl TryFrom<SessionSnapshot> for Session {
    type Error = SessionError;

    /// Rebuild a session, validating that the pools are disjoint subsets of
    /// the stack. Stack entries missing from every pool are restored as unseen.
    fn try_from(snapshot: SessionSnapshot) -> Result<Self, Self::Error> {
        let mut positions = HashMap::with_capacity(snapshot.stack.len());
        for (i, entry) in snapshot.stack.iter().enumerate() {
            if positions.insert(entry.key(), i).is_some() {
                return Err(SessionError::CorruptSnapshot(format!(
                    "duplicate stack entry {}",
                    entry.key()
                )));
            }
        }

        let mut status: Vec<Option<EntryStatus>> = vec![None; snapshot.stack.len()];
        let mut assign = |keys: &[WordKey], to: EntryStatus| -> Result<IndexSet<usize>, SessionError> {
            let mut set = IndexSet::with_capacity(keys.len());
            for key in keys {
                let idx = *positions.get(key).ok_or_else(|| {
                    SessionError::CorruptSnapshot(format!("{key} is not in the stack"))
                })?;
                if status[idx].is_some() {
                    return Err(SessionError::CorruptSnapshot(format!(
                        "{key} appears in more than one pool"
                    )));
                }
                status[idx] = Some(to);
                set.insert(idx);
            }
            Ok(set)
        };

        let mut unseen = assign(&snapshot.unseen, EntryStatus::Unseen)?;
        let known = assign(&snapshot.known, EntryStatus::Known)?;
        let unknown = assign(&snapshot.unknown, EntryStatus::Unknown)?;

        let status = status
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                s.unwrap_or_else(|| {
                    unseen.insert(i);
                    EntryStatus::Unseen
                })
            })
            .collect();

        let mut session = Self {
            stack: snapshot.stack,
            active_stack: snapshot.active_stack,
            positions,
            status,
            unseen,
            known,
            unknown,
            completed: false,
        };
        session.refresh_completed();
        Ok(session)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::word::Difficulty;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn word(i: usize) -> WordEntry {
        WordEntry::new(
            format!("word{i:03}"),
            "noun",
            format!("meaning number {i}"),
            format!("An example using word{i:03}."),
            Difficulty::Common,
        )
    }

    fn words(n: usize) -> Vec<WordEntry> {
        (0..n).map(word).collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn assert_partition(session: &Session) {
        let unseen: HashSet<WordKey> = session.unseen().map(WordEntry::key).collect();
        let known: HashSet<WordKey> = session.known().map(WordEntry::key).collect();
        let unknown: HashSet<WordKey> = session.unknown().map(WordEntry::key).collect();
        assert!(unseen.is_disjoint(&known));
        assert!(unseen.is_disjoint(&unknown));
        assert!(known.is_disjoint(&unknown));
        for key in unseen.iter().chain(&known).chain(&unknown) {
            assert!(session.contains(key));
        }
        let expected = session.known_len() == session.len() && session.unknown_len() == 0;
        assert_eq!(session.is_completed(), expected && !session.is_empty());
    }

    #[test]
    fn construction_copies_input_into_every_pool() {
        let mut input = words(3);
        let session = Session::new(input.clone());
        input.clear();

        assert_eq!(session.len(), 3);
        assert_eq!(session.active_len(), 3);
        assert_eq!(session.unseen_len(), 3);
        assert_eq!(session.known_len(), 0);
        assert_eq!(session.unknown_len(), 0);
        assert!(!session.is_completed());
        assert_eq!(session.stack()[0], word(0));
    }

    #[test]
    fn duplicate_entries_are_kept_once() {
        let mut dup = word(1);
        dup.meaning = "corrected meaning".into();
        let session = Session::new(vec![word(0), word(1), dup]);
        assert_eq!(session.len(), 2);
        assert_eq!(session.stack()[1].meaning, "meaning number 1");
    }

    #[test]
    fn three_word_scenario_completes_after_all_correct() {
        let mut session = Session::new(words(3));
        let a = word(0).key();

        session.record_outcome(&a, Outcome::Correct).unwrap();
        assert_eq!(session.known_len(), 1);
        assert_eq!(session.unseen_len(), 2);
        assert!(!session.is_completed());
        assert_partition(&session);

        session.record_outcome(&word(1).key(), Outcome::Correct).unwrap();
        session.record_outcome(&word(2).key(), Outcome::Correct).unwrap();
        assert_eq!(session.known_len(), 3);
        assert_eq!(session.unseen_len(), 0);
        assert_eq!(session.unknown_len(), 0);
        assert!(session.is_completed());
        assert_partition(&session);
    }

    #[test]
    fn unknown_then_correct_moves_without_duplication() {
        let mut session = Session::new(words(2));
        let a = word(0).key();

        assert_eq!(
            session.record_outcome(&a, Outcome::Incorrect).unwrap(),
            EntryStatus::Unknown
        );
        assert_eq!(session.unknown_len(), 1);

        assert_eq!(
            session.record_outcome(&a, Outcome::Correct).unwrap(),
            EntryStatus::Known
        );
        assert_eq!(session.unknown_len(), 0);
        assert_eq!(session.known_len(), 1);
        assert_partition(&session);

        session.record_outcome(&a, Outcome::Correct).unwrap();
        assert_eq!(session.known_len(), 1);
    }

    #[test]
    fn known_entry_answered_wrong_becomes_unknown_and_blocks_completion() {
        let mut session = Session::new(words(1));
        let a = word(0).key();
        session.record_outcome(&a, Outcome::Correct).unwrap();
        assert!(session.is_completed());

        session.record_outcome(&a, Outcome::Incorrect).unwrap();
        assert!(!session.is_completed());
        assert_eq!(session.known_len(), 0);
        assert_eq!(session.unknown_len(), 1);
    }

    #[test]
    fn unseen_draw_pops_exactly_that_entry() {
        let mut session = Session::new(words(5));
        let mut rng = rng();

        let draw = session.sample1(&mut rng).unwrap();
        assert_eq!(draw.source, Pool::Unseen);
        assert_eq!(session.unseen_len(), 4);
        assert!(session.unseen().all(|e| *e != draw.entry));
        assert_eq!(session.status_of(&draw.entry.key()), Some(EntryStatus::Pending));
        assert_eq!(session.pending().count(), 1);
        assert_partition(&session);
    }

    #[test]
    fn known_only_draws_never_remove() {
        let mut session = Session::new(words(3));
        for i in 0..3 {
            session.record_outcome(&word(i).key(), Outcome::Correct).unwrap();
        }
        let mut rng = rng();
        for _ in 0..50 {
            let draw = session.sample1(&mut rng).unwrap();
            assert_eq!(draw.source, Pool::Known);
            assert_eq!(session.status_of(&draw.entry.key()), Some(EntryStatus::Known));
        }
        assert_eq!(session.known_len(), 3);
    }

    #[test]
    fn unknown_draws_keep_the_entry_in_place() {
        let mut session = Session::new(words(2));
        session.record_outcome(&word(0).key(), Outcome::Incorrect).unwrap();
        session.record_outcome(&word(1).key(), Outcome::Incorrect).unwrap();
        let mut rng = rng();
        for _ in 0..20 {
            let draw = session.sample1(&mut rng).unwrap();
            assert_eq!(draw.source, Pool::Unknown);
        }
        assert_eq!(session.unknown_len(), 2);
    }

    #[test]
    fn weighting_prefers_unknown_over_known() {
        let mut session = Session::new(words(2));
        session.record_outcome(&word(0).key(), Outcome::Correct).unwrap();
        session.record_outcome(&word(1).key(), Outcome::Incorrect).unwrap();

        let mut rng = rng();
        let mut unknown_hits = 0;
        let trials = 3000;
        for _ in 0..trials {
            if session.sample1(&mut rng).unwrap().source == Pool::Unknown {
                unknown_hits += 1;
            }
        }
        // Expected 2/3.
        assert!((1800..2200).contains(&unknown_hits), "got {unknown_hits}");
    }

    #[test]
    fn empty_session_fails_to_sample() {
        let mut session = Session::new(Vec::new());
        let err = session.sample1(&mut rng()).unwrap_err();
        assert_eq!(err, SessionError::NothingToSample);
        assert!(!session.is_completed());
    }

    #[test]
    fn only_pending_entries_fail_to_sample() {
        let mut session = Session::new(words(1));
        let mut rng = rng();
        session.sample1(&mut rng).unwrap();
        assert_eq!(
            session.sample1(&mut rng).unwrap_err(),
            SessionError::NothingToSample
        );
    }

    #[test]
    fn release_returns_pending_entry_to_unseen() {
        let mut session = Session::new(words(2));
        let mut rng = rng();
        let draw = session.sample1(&mut rng).unwrap();
        let key = draw.entry.key();

        assert_eq!(session.release(&key).unwrap(), EntryStatus::Unseen);
        assert_eq!(session.unseen_len(), 2);

        session.record_outcome(&key, Outcome::Incorrect).unwrap();
        assert_eq!(session.release(&key).unwrap(), EntryStatus::Unknown);
        assert_eq!(session.unknown_len(), 1);
    }

    #[test]
    fn outcome_for_foreign_entry_is_rejected() {
        let mut session = Session::new(words(2));
        let stranger = word(99).key();
        let err = session.record_outcome(&stranger, Outcome::Correct).unwrap_err();
        assert_eq!(err, SessionError::NotInSession { key: stranger });
    }

    #[test]
    fn draining_a_session_by_sampling_reaches_completion() {
        let mut session = Session::new(words(10));
        let mut rng = rng();
        let mut steps = 0;
        while !session.is_completed() {
            let draw = session.sample1(&mut rng).unwrap();
            let outcome = if draw.source == Pool::Unseen && steps % 3 == 0 {
                Outcome::Incorrect
            } else {
                Outcome::Correct
            };
            session.record_outcome(&draw.entry.key(), outcome).unwrap();
            assert_partition(&session);
            steps += 1;
            assert!(steps < 10_000);
        }
        assert_eq!(session.known_len(), 10);
    }

    #[test]
    fn sample_n_pop_carves_disjoint_sub_sessions() {
        let mut master = Session::new(words(100));
        let mut rng = rng();

        let first = master.sample_n_pop(50, &mut rng).unwrap();
        assert_eq!(first.len(), 50);
        assert_eq!(master.active_len(), 50);
        let remaining: HashSet<WordKey> = master.active_stack().iter().map(WordEntry::key).collect();
        assert!(first.stack().iter().all(|e| !remaining.contains(&e.key())));

        let second = master.sample_n_pop(50, &mut rng).unwrap();
        assert_eq!(second.len(), 50);
        assert_eq!(master.active_len(), 0);

        let first_keys: HashSet<WordKey> = first.stack().iter().map(WordEntry::key).collect();
        assert!(second.stack().iter().all(|e| !first_keys.contains(&e.key())));

        let err = master.sample_n_pop(50, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SessionError::InsufficientPool {
                requested: 50,
                available: 0
            }
        );
        assert_eq!(master.len(), 100);
    }

    #[test]
    fn withdrawn_entries_never_reach_a_sub_session() {
        let mut master = Session::new(words(6));
        let played = [word(0).key(), word(3).key(), WordKey::new("absent", "noun")];

        assert_eq!(master.withdraw(&played), 2);
        assert_eq!(master.active_len(), 4);
        assert_eq!(master.len(), 6);

        let sub = master.sample_n_pop(4, &mut rng()).unwrap();
        assert!(played.iter().all(|key| !sub.contains(key)));
        assert_eq!(master.active_len(), 0);
    }

    #[test]
    fn sub_session_starts_fresh() {
        let mut master = Session::new(words(10));
        let sub = master.sample_n_pop(4, &mut rng()).unwrap();
        assert_eq!(sub.unseen_len(), 4);
        assert_eq!(sub.active_len(), 4);
        assert_eq!(sub.known_len(), 0);
        assert!(!sub.is_completed());
    }

    #[test]
    fn over_request_leaves_pool_untouched() {
        let mut master = Session::new(words(10));
        let before: Vec<WordEntry> = master.active_stack().to_vec();
        let err = master.sample_n_pop(11, &mut rng()).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InsufficientPool {
                requested: 11,
                available: 10
            }
        ));
        assert_eq!(master.active_stack(), before.as_slice());
    }

    #[test]
    fn snapshot_round_trip_keeps_classification() {
        let mut session = Session::new(words(4));
        session.record_outcome(&word(0).key(), Outcome::Correct).unwrap();
        session.record_outcome(&word(1).key(), Outcome::Incorrect).unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.status_of(&word(0).key()), Some(EntryStatus::Known));
        assert_eq!(restored.status_of(&word(1).key()), Some(EntryStatus::Unknown));
        assert_eq!(restored.unseen_len(), 2);
        assert_eq!(restored.active_len(), 4);
        assert_eq!(restored, session);
    }

    #[test]
    fn snapshot_writes_pending_entries_as_unseen() {
        let mut session = Session::new(words(3));
        let draw = session.sample1(&mut rng()).unwrap();

        let snapshot = SessionSnapshot::from(session);
        assert_eq!(snapshot.unseen.len(), 3);
        assert!(snapshot.unseen.contains(&draw.entry.key()));

        let restored = Session::try_from(snapshot).unwrap();
        assert_eq!(restored.pending().count(), 0);
        assert_eq!(restored.unseen_len(), 3);
    }

    #[test]
    fn snapshot_with_overlapping_pools_is_rejected() {
        let session = Session::new(words(2));
        let mut snapshot = SessionSnapshot::from(session);
        snapshot.known.push(word(0).key());
        let err = Session::try_from(snapshot).unwrap_err();
        assert!(matches!(err, SessionError::CorruptSnapshot(_)));
    }

    #[test]
    fn snapshot_with_foreign_key_is_rejected() {
        let session = Session::new(words(2));
        let mut snapshot = SessionSnapshot::from(session);
        snapshot.unknown.push(word(42).key());
        assert!(matches!(
            Session::try_from(snapshot),
            Err(SessionError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn completion_is_recomputed_on_restore() {
        let mut session = Session::new(words(2));
        for i in 0..2 {
            session.record_outcome(&word(i).key(), Outcome::Correct).unwrap();
        }
        let mut snapshot = SessionSnapshot::from(session);
        snapshot.completed = false;
        assert!(Session::try_from(snapshot).unwrap().is_completed());
    }
}
