//! Persistence for the three game snapshots and the vocabulary import file.

#![forbid(unsafe_code)]

pub mod codec;
pub mod files;
pub mod repository;
pub mod sqlite;
pub mod vocabulary;

pub use codec::LoadOutcome;
pub use repository::{SnapshotRepository, Slot, Storage, StorageError};
