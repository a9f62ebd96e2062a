//! JSON encoding of snapshot payloads.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::{Slot, StorageError};

/// Result of reading a slot that may legitimately be empty.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Found(T),
    NotFound,
}

impl<T> LoadOutcome<T> {
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            LoadOutcome::Found(value) => Some(value),
            LoadOutcome::NotFound => None,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, LoadOutcome::Found(_))
    }
}

impl<T> From<Option<T>> for LoadOutcome<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(LoadOutcome::NotFound, LoadOutcome::Found)
    }
}

/// # Errors
///
/// Returns `StorageError::Serialization` if the value cannot be encoded.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// # Errors
///
/// Returns `StorageError::Serialization` naming the slot if the payload is
/// not valid for `T`.
pub fn decode<T: DeserializeOwned>(slot: Slot, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(format!("{slot}: {e}")))
}
