//! Key-value storage capability consumed by the note store.
//!
//! # Responsibility
//! - Define the slot contract (`get`/`set`/`remove` of whole string values).
//! - Provide an in-memory test double and a durable SQLite backend.
//!
//! # Invariants
//! - A successful `set` is visible to the next `get` of the same key.
//! - Backends store values verbatim; they never parse the payload.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Transport-level failure of a storage backend.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    /// Database was stamped by a newer build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    /// Backend refused the operation (quota, read-only, test doubles).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "slot database version {found} is newer than supported {supported}"
            ),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Durable key-value slot access, passed to the store at construction.
pub trait KeyValueStorage {
    /// Returns the raw value for `key`, or `None` when the slot is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Replaces the whole value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Removes the slot. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}
