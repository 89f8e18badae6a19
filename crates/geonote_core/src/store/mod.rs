//! Note collection manager and its read-side projections.
//!
//! # Responsibility
//! - Own the ordered note collection and mirror it to one storage slot.
//! - Notify subscribers after each effective mutation.
//! - Provide derived category/date views that recompute on change.
//!
//! # Invariants
//! - After a mutating call returns, memory and storage hold equal sequences.
//! - A failed write leaves the in-memory collection untouched.
//! - Unknown ids are silent no-ops: no write, no revision bump, no event.

pub mod event;
pub mod note_store;
pub mod view;

pub use event::{NoteEvent, SubscriptionId};
pub use note_store::{NoteStore, StoreError, StoreResult};
pub use view::{NoteFilter, NoteView};
