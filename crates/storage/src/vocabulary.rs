//! Vocabulary import files: a JSON array of word entries.
//!
//! ```json
//! [{"word": "laconic", "category": "adjective", "meaning": "using very few words",
//!   "example": "His laconic reply.", "difficulty": "Advanced"}]
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;
use vocab_core::model::WordEntry;

use crate::repository::StorageError;

/// Parse a vocabulary document.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the document is not an array of entries.
pub fn parse_vocabulary(raw: &str) -> Result<Vec<WordEntry>, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(format!("vocabulary: {e}")))
}

/// Read a vocabulary file from disk. A missing file is `Ok(None)`.
///
/// # Errors
///
/// Returns `StorageError::Io` for unreadable files and
/// `StorageError::Serialization` for malformed content.
pub fn read_vocabulary(path: &Path) -> Result<Option<Vec<WordEntry>>, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let entries = parse_vocabulary(&raw)?;
    debug!(path = %path.display(), entries = entries.len(), "read vocabulary");
    Ok(Some(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::model::Difficulty;

    #[test]
    fn parses_entries_and_defaults_known_flag() {
        let raw = r#"[
            {"word": "laconic", "category": "adjective", "meaning": "using very few words",
             "example": "His laconic reply.", "difficulty": "Advanced"},
            {"word": "abate", "category": "verb", "meaning": "to lessen in intensity",
             "example": "", "difficulty": "Basic", "is_known": true}
        ]"#;
        let entries = parse_vocabulary(raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].difficulty, Difficulty::Advanced);
        assert!(!entries[0].is_known);
        assert!(entries[1].is_known);
    }

    #[test]
    fn rejects_non_array_documents() {
        let err = parse_vocabulary(r#"{"word": "x"}"#).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn missing_file_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(read_vocabulary(&tmp.path().join("nope.json")).unwrap().is_none());
    }
}
