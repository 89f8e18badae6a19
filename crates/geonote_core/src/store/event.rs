//! Change notifications emitted by `NoteStore`.

use crate::model::note::NoteId;

/// Handle returned by `NoteStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// One effective mutation, delivered after it has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    Created { id: NoteId },
    Updated { id: NoteId },
    Deleted { id: NoteId, removed: usize },
    Cleared { removed: usize },
    /// Collection was replaced from storage by `reload`.
    Reloaded { count: usize },
}

impl NoteEvent {
    /// Stable event name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "note_create",
            Self::Updated { .. } => "note_update",
            Self::Deleted { .. } => "note_delete",
            Self::Cleared { .. } => "note_clear",
            Self::Reloaded { .. } => "note_reload",
        }
    }
}

pub(crate) type Subscriber = Box<dyn FnMut(&NoteEvent)>;
