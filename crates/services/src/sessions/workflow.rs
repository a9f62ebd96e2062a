use vocab_core::model::{Draw, Pool};
use vocab_core::{GuessResult, HangmanRound};

use super::manager::{Recorded, SessionManager};
use crate::error::GameError;
use crate::session_store::SessionStore;

/// Result of one action that may end the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnResult {
    pub guess: GuessResult,
    /// Present once the round ended and its outcome was recorded.
    pub recorded: Option<Recorded>,
}

/// Counters shown next to the gallows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoreboard {
    pub unseen: usize,
    pub known: usize,
    pub unknown: usize,
    pub total: usize,
}

/// Drives hangman rounds over the current session and saves on request.
pub struct GameLoopService {
    store: SessionStore,
    manager: SessionManager,
    round: Option<HangmanRound>,
    source: Option<Pool>,
}

impl GameLoopService {
    #[must_use]
    pub fn new(store: SessionStore, manager: SessionManager) -> Self {
        Self {
            store,
            manager,
            round: None,
            source: None,
        }
    }

    #[must_use]
    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    #[must_use]
    pub fn round(&self) -> Option<&HangmanRound> {
        self.round.as_ref()
    }

    /// Pool the word on screen was drawn from.
    #[must_use]
    pub fn source(&self) -> Option<Pool> {
        self.source
    }

    #[must_use]
    pub fn scoreboard(&self) -> Option<Scoreboard> {
        self.manager.current().map(|current| Scoreboard {
            unseen: current.unseen_len(),
            known: current.known_len(),
            unknown: current.unknown_len(),
            total: current.len(),
        })
    }

    /// The round in progress, or a new one on a freshly drawn word.
    ///
    /// # Errors
    ///
    /// Returns `GameError::ContentExhausted` when the vocabulary is used up.
    pub fn next_word(&mut self) -> Result<&HangmanRound, GameError> {
        let in_progress = self.round.as_ref().is_some_and(|round| !round.is_over());
        if !in_progress {
            let Draw { entry, source } = self.manager.draw()?;
            self.round = Some(HangmanRound::new(entry, self.manager.settings().max_misses()));
            self.source = Some(source);
        }
        self.round.as_ref().ok_or(GameError::NoActiveRound)
    }

    /// Guess the whole word. A solved or hanged round is recorded at once.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoActiveRound` when no word is on screen.
    pub fn guess(&mut self, input: &str) -> Result<TurnResult, GameError> {
        let round = self.active_round()?;
        let guess = round.guess(input)?;
        let recorded = self.record_if_over()?;
        Ok(TurnResult { guess, recorded })
    }

    /// Give up on the current word; it counts as unknown.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoActiveRound` when no word is on screen.
    pub fn reveal(&mut self) -> Result<Recorded, GameError> {
        self.active_round()?.reveal()?;
        self.record_if_over()?.ok_or(GameError::NoActiveRound)
    }

    /// Put the current word back unclassified and drop the round.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoActiveRound` when no word is on screen.
    pub fn skip(&mut self) -> Result<(), GameError> {
        let key = self.active_round()?.entry().key();
        self.manager.skip(&key)?;
        self.round = None;
        self.source = None;
        Ok(())
    }

    /// Show the example sentence with the word masked, if the entry has one.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoActiveRound` when no word is on screen.
    pub fn hint_example(&mut self) -> Result<Option<String>, GameError> {
        let round = self.active_round()?;
        round.show_example();
        Ok(round.example_hint())
    }

    /// Reveal the first letter on the tiles.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoActiveRound` when no word is on screen.
    pub fn hint_first_letter(&mut self) -> Result<String, GameError> {
        let round = self.active_round()?;
        round.show_first_letter();
        Ok(round.masked())
    }

    /// Persist the game. A word on screen is saved as not yet seen.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` if a snapshot cannot be written.
    pub async fn save(&self) -> Result<(), GameError> {
        self.manager.save(&self.store).await
    }

    fn active_round(&mut self) -> Result<&mut HangmanRound, GameError> {
        self.round
            .as_mut()
            .filter(|round| !round.is_over())
            .ok_or(GameError::NoActiveRound)
    }

    fn record_if_over(&mut self) -> Result<Option<Recorded>, GameError> {
        let Some((key, outcome)) = self
            .round
            .as_ref()
            .and_then(|round| round.outcome().map(|outcome| (round.entry().key(), outcome)))
        else {
            return Ok(None);
        };
        let recorded = self.manager.record(&key, outcome)?;
        Ok(Some(recorded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::Clock;
    use vocab_core::RoundState;
    use vocab_core::model::{Difficulty, EntryStatus, GameSettings, Session, WordEntry};
    use vocab_core::time::fixed_now;

    fn service(words: usize, size: usize, max_misses: u8) -> GameLoopService {
        let entries = (0..words).map(|i| {
            WordEntry::new(
                format!("term{i:02}"),
                "noun",
                format!("definition {i}"),
                format!("Say term{i:02} twice."),
                Difficulty::Common,
            )
        });
        let manager = SessionManager::new(
            Session::new(entries),
            None,
            Vec::new(),
            GameSettings::new(size, max_misses).unwrap(),
            Clock::fixed(fixed_now()),
            SessionManager::rng_from_seed(Some(11)),
        )
        .unwrap();
        GameLoopService::new(SessionStore::in_memory(), manager)
    }

    #[test]
    fn solving_records_known() {
        let mut game = service(4, 4, 7);
        let word = game.next_word().unwrap().entry().word.clone();
        let key = game.round().unwrap().entry().key();

        let turn = game.guess(&word.to_uppercase()).unwrap();
        assert_eq!(turn.guess, GuessResult::Solved);
        assert_eq!(turn.recorded.unwrap().status, EntryStatus::Known);
        assert_eq!(
            game.manager().current().unwrap().status_of(&key),
            Some(EntryStatus::Known)
        );
        assert!(matches!(game.guess("again"), Err(GameError::NoActiveRound)));
    }

    #[test]
    fn hanging_records_unknown() {
        let mut game = service(4, 4, 2);
        game.next_word().unwrap();

        let first = game.guess("nope").unwrap();
        assert_eq!(
            first.guess,
            GuessResult::Miss {
                misses: 1,
                remaining: 1
            }
        );
        assert!(first.recorded.is_none());

        let second = game.guess("still nope").unwrap();
        assert_eq!(second.guess, GuessResult::Hanged);
        assert_eq!(second.recorded.unwrap().status, EntryStatus::Unknown);
        assert_eq!(game.round().unwrap().state(), RoundState::Hanged);
    }

    #[test]
    fn next_word_keeps_an_unfinished_round() {
        let mut game = service(4, 4, 7);
        let first = game.next_word().unwrap().entry().key();
        game.guess("wrong").unwrap();
        let again = game.next_word().unwrap();
        assert_eq!(again.entry().key(), first);
        assert_eq!(again.misses(), 1);
    }

    #[test]
    fn reveal_counts_as_unknown() {
        let mut game = service(4, 4, 7);
        game.next_word().unwrap();
        let recorded = game.reveal().unwrap();
        assert_eq!(recorded.status, EntryStatus::Unknown);
        assert!(matches!(game.reveal(), Err(GameError::NoActiveRound)));
    }

    #[test]
    fn skip_releases_the_word() {
        let mut game = service(4, 4, 7);
        game.next_word().unwrap();
        assert_eq!(game.scoreboard().unwrap().unseen, 3);

        game.skip().unwrap();
        assert!(game.round().is_none());
        assert_eq!(game.scoreboard().unwrap().unseen, 4);
        assert!(matches!(game.skip(), Err(GameError::NoActiveRound)));
    }

    #[test]
    fn hints_expose_example_and_first_letter() {
        let mut game = service(1, 1, 7);
        let word = game.next_word().unwrap().entry().word.clone();

        let example = game.hint_example().unwrap().unwrap();
        assert_eq!(example, format!("Say {} twice.", "*".repeat(word.len())));

        let masked = game.hint_first_letter().unwrap();
        assert!(masked.starts_with('t'));
    }

    #[test]
    fn solving_the_last_word_rolls_the_session_over() {
        let mut game = service(2, 1, 7);
        let word = game.next_word().unwrap().entry().word.clone();
        let turn = game.guess(&word).unwrap();
        assert!(turn.recorded.unwrap().session_completed);
        assert_eq!(game.manager().history().len(), 1);

        let word = game.next_word().unwrap().entry().word.clone();
        game.guess(&word).unwrap();
        assert!(game.manager().is_exhausted());
        assert!(matches!(game.next_word(), Err(GameError::ContentExhausted)));
    }
}
