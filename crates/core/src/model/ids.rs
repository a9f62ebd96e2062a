use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a vocabulary entry: the word plus its part of speech.
///
/// Two entries with the same key are the same entry, whatever their meaning
/// or example text says.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordKey {
    word: String,
    category: String,
}

impl WordKey {
    /// Creates a new `WordKey`
    #[must_use]
    pub fn new(word: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            category: category.into(),
        }
    }

    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }
}

impl fmt::Debug for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WordKey({:?}, {:?})", self.word, self.category)
    }
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.word, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_word_and_category() {
        let key = WordKey::new("laconic", "adjective");
        assert_eq!(key.to_string(), "laconic (adjective)");
        assert_eq!(format!("{key:?}"), "WordKey(\"laconic\", \"adjective\")");
    }

    #[test]
    fn keys_differ_by_category() {
        let noun = WordKey::new("bolster", "noun");
        let verb = WordKey::new("bolster", "verb");
        assert_ne!(noun, verb);
        assert!(noun < verb);
    }
}
