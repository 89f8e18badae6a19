//! Core domain logic for GeoNote.
//! This crate is the single source of truth for note collection invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;

pub use config::{StoreConfig, DEFAULT_STORAGE_KEY};
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LogConfig, LoggingError,
};
pub use model::note::{now_iso8601, NewNote, Note, NoteId, NotePatch};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError, StorageResult};
pub use store::{
    NoteEvent, NoteFilter, NoteStore, NoteView, StoreError, StoreResult, SubscriptionId,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
