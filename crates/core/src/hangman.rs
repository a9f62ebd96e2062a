//! Hangman round over a single vocabulary entry.
//!
//! The player sees the meaning and one tile per letter, and types guesses of
//! the whole word. Two hints are available: the example sentence with the
//! word masked, and the first letter. A round ends when the word is guessed,
//! the miss budget runs out, or the player asks for the answer.

use thiserror::Error;

use crate::model::{Outcome, WordEntry};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HangmanError {
    #[error("round is already over")]
    RoundOver,
}

/// Where a round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    InProgress,
    Solved,
    Hanged,
    Revealed,
}

/// Result of one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessResult {
    /// Blank input, nothing counted.
    Ignored,
    Solved,
    Miss { misses: u8, remaining: u8 },
    /// Last miss used up the budget; the word is revealed.
    Hanged,
}

#[derive(Debug, Clone)]
pub struct HangmanRound {
    entry: WordEntry,
    max_misses: u8,
    misses: u8,
    example_shown: bool,
    first_letter_shown: bool,
    state: RoundState,
}

impl HangmanRound {
    #[must_use]
    pub fn new(entry: WordEntry, max_misses: u8) -> Self {
        Self {
            entry,
            max_misses: max_misses.max(1),
            misses: 0,
            example_shown: false,
            first_letter_shown: false,
            state: RoundState::InProgress,
        }
    }

    #[must_use]
    pub fn entry(&self) -> &WordEntry {
        &self.entry
    }

    #[must_use]
    pub fn state(&self) -> RoundState {
        self.state
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state != RoundState::InProgress
    }

    /// Hangman drawing stage, `0..=max_misses`.
    #[must_use]
    pub fn misses(&self) -> u8 {
        self.misses
    }

    #[must_use]
    pub fn max_misses(&self) -> u8 {
        self.max_misses
    }

    #[must_use]
    pub fn remaining(&self) -> u8 {
        self.max_misses.saturating_sub(self.misses)
    }

    /// Compare a whole-word guess, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `HangmanError::RoundOver` once the round has ended.
    pub fn guess(&mut self, input: &str) -> Result<GuessResult, HangmanError> {
        if self.is_over() {
            return Err(HangmanError::RoundOver);
        }
        let input = input.trim();
        if input.is_empty() {
            return Ok(GuessResult::Ignored);
        }

        if input.to_lowercase() == self.entry.word.to_lowercase() {
            self.state = RoundState::Solved;
            return Ok(GuessResult::Solved);
        }

        self.misses = self.misses.saturating_add(1);
        if self.misses >= self.max_misses {
            self.state = RoundState::Hanged;
            return Ok(GuessResult::Hanged);
        }
        Ok(GuessResult::Miss {
            misses: self.misses,
            remaining: self.remaining(),
        })
    }

    /// Give up and show the answer.
    ///
    /// # Errors
    ///
    /// Returns `HangmanError::RoundOver` once the round has ended.
    pub fn reveal(&mut self) -> Result<(), HangmanError> {
        if self.is_over() {
            return Err(HangmanError::RoundOver);
        }
        self.state = RoundState::Revealed;
        Ok(())
    }

    pub fn show_example(&mut self) {
        self.example_shown = true;
    }

    pub fn show_first_letter(&mut self) {
        self.first_letter_shown = true;
    }

    /// The redacted example once hinted; `None` before that or when the
    /// entry has no usable example.
    #[must_use]
    pub fn example_hint(&self) -> Option<String> {
        (self.example_shown && self.entry.has_example()).then(|| self.entry.redacted_example())
    }

    #[must_use]
    pub fn example_shown(&self) -> bool {
        self.example_shown
    }

    /// One tile per letter (`_`), separated by spaces. Non-letters are shown
    /// as-is; the first letter appears once hinted.
    #[must_use]
    pub fn masked(&self) -> String {
        self.entry
            .word
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if !c.is_alphabetic() || (i == 0 && self.first_letter_shown) {
                    c
                } else {
                    '_'
                }
            })
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The word spelled out on the tiles.
    #[must_use]
    pub fn solution(&self) -> String {
        self.entry
            .word
            .chars()
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// How the round should be recorded in the session, once it is over.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            RoundState::InProgress => None,
            RoundState::Solved => Some(Outcome::Correct),
            RoundState::Hanged | RoundState::Revealed => Some(Outcome::Incorrect),
        }
    }
}
