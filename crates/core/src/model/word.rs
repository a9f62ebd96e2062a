use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::WordKey;

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DifficultyError {
    #[error("unknown difficulty: {0}")]
    Unknown(String),
}

/// Difficulty tier of a vocabulary entry, as printed in the source word list.
///
/// Written by name; read back through [`FromStr`], so word lists may use any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Difficulty {
    Common,
    Basic,
    Advanced,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Common => "Common",
            Difficulty::Basic => "Basic",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Ok(Self::Common),
            "basic" => Ok(Self::Basic),
            "advanced" => Ok(Self::Advanced),
            _ => Err(DifficultyError::Unknown(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = DifficultyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

//
// ─── WORD ENTRY ────────────────────────────────────────────────────────────────
//

/// Shortest word the hangman mode will ask for.
const MIN_PLAYABLE_WORD_CHARS: usize = 4;
/// Shortest meaning that still counts as a definition.
const MIN_PLAYABLE_MEANING_CHARS: usize = 6;
/// Examples at or below this length are treated as missing.
const MIN_EXAMPLE_CHARS: usize = 6;

/// One vocabulary flashcard.
///
/// Equality and hashing only look at `word` and `category`; the remaining
/// fields are payload. `meaning` and `example` may be corrected during
/// vocabulary import but are not touched during play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub category: String,
    pub meaning: String,
    pub example: String,
    pub difficulty: Difficulty,
    /// Legacy flag carried over from the word list; sessions track knowledge themselves.
    #[serde(default)]
    pub is_known: bool,
}

impl WordEntry {
    #[must_use]
    pub fn new(
        word: impl Into<String>,
        category: impl Into<String>,
        meaning: impl Into<String>,
        example: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            word: word.into(),
            category: category.into(),
            meaning: meaning.into(),
            example: example.into(),
            difficulty,
            is_known: false,
        }
    }

    #[must_use]
    pub fn key(&self) -> WordKey {
        WordKey::new(self.word.clone(), self.category.clone())
    }

    /// `"{word} ({category}): {meaning}"`
    #[must_use]
    pub fn short_form(&self) -> String {
        format!("{} ({}): {}", self.word, self.category, self.meaning)
    }

    /// Whether the entry carries enough text to be guessed from its meaning.
    #[must_use]
    pub fn is_playable(&self) -> bool {
        self.word.chars().count() >= MIN_PLAYABLE_WORD_CHARS
            && self.meaning.chars().count() >= MIN_PLAYABLE_MEANING_CHARS
    }

    #[must_use]
    pub fn has_example(&self) -> bool {
        self.example.trim().chars().count() >= MIN_EXAMPLE_CHARS
    }

    /// Example sentence with every occurrence of the word masked by `*`.
    #[must_use]
    pub fn redacted_example(&self) -> String {
        if self.word.is_empty() {
            return self.example.clone();
        }
        let mask = "*".repeat(self.word.chars().count());
        self.example.replace(&self.word, &mask)
    }
}

impl PartialEq for WordEntry {
    fn eq(&self, other: &Self) -> bool {
        self.word == other.word && self.category == other.category
    }
}

impl Eq for WordEntry {}

impl Hash for WordEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.word.hash(state);
        self.category.hash(state);
    }
}

/// Long form: word and category, then meaning, then example, one per line.
impl fmt::Display for WordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})\n{}\n{}",
            self.word, self.category, self.meaning, self.example
        )
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
