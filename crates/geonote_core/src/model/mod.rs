//! Domain model for geotagged notes.
//!
//! # Responsibility
//! - Define the canonical note record persisted by the store.
//! - Define the input shapes accepted by create and update.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - `id` and `created_at` are assigned once and never patched.

pub mod note;
