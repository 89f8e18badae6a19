//! Derived read-only views over the note collection.
//!
//! A view caches its filtered snapshot together with the store revision it
//! was computed at, and recomputes on the next read after the store changes.

use super::note_store::NoteStore;
use crate::model::note::Note;
use crate::storage::KeyValueStorage;

/// Predicate selecting a subsequence of the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteFilter {
    /// Exact, case-sensitive category match.
    Category(String),
    /// `created_at` starts with the prefix (e.g. `2026-10-18`).
    DatePrefix(String),
}

impl NoteFilter {
    pub fn matches(&self, note: &Note) -> bool {
        match self {
            Self::Category(category) => note.category == *category,
            Self::DatePrefix(prefix) => note.created_at.starts_with(prefix.as_str()),
        }
    }

    /// Filters `notes`, preserving collection order.
    pub fn apply(&self, notes: &[Note]) -> Vec<Note> {
        notes
            .iter()
            .filter(|note| self.matches(note))
            .cloned()
            .collect()
    }
}

/// Live filtered projection of a `NoteStore`.
///
/// A view must only be read against the store that produced it; revisions
/// are not comparable across stores.
#[derive(Debug, Clone)]
pub struct NoteView {
    filter: NoteFilter,
    snapshot: Vec<Note>,
    computed_at: Option<u64>,
    recomputes: usize,
}

impl NoteView {
    pub fn new(filter: NoteFilter) -> Self {
        Self {
            filter,
            snapshot: Vec::new(),
            computed_at: None,
            recomputes: 0,
        }
    }

    pub fn filter(&self) -> &NoteFilter {
        &self.filter
    }

    /// Returns the current matches, recomputing if the store changed.
    pub fn items<S: KeyValueStorage>(&mut self, store: &NoteStore<S>) -> &[Note] {
        if self.is_stale(store) {
            self.snapshot = self.filter.apply(store.notes());
            self.computed_at = Some(store.revision());
            self.recomputes += 1;
        }
        &self.snapshot
    }

    pub fn is_stale<S: KeyValueStorage>(&self, store: &NoteStore<S>) -> bool {
        self.computed_at != Some(store.revision())
    }

    /// Number of times the snapshot has been rebuilt.
    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::NoteFilter;
    use crate::model::note::{NewNote, Note, NoteId};

    fn note_at(created_at: &str, category: &str) -> Note {
        Note::with_id(
            NoteId::generate(),
            created_at,
            NewNote::new(0.0, 0.0, "t", category),
        )
    }

    #[test]
    fn category_filter_is_exact_and_case_sensitive() {
        let notes = vec![
            note_at("2026-01-01T00:00:00.000Z", "Food"),
            note_at("2026-01-01T00:00:00.000Z", "food"),
        ];
        let matched = NoteFilter::Category("food".to_string()).apply(&notes);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, notes[1].id);
    }

    #[test]
    fn date_prefix_filter_matches_calendar_day_in_order() {
        let notes = vec![
            note_at("2026-10-18T01:00:00.000Z", "a"),
            note_at("2026-10-17T23:59:59.999Z", "a"),
            note_at("2026-10-18T22:00:00.000Z", "b"),
        ];
        let matched = NoteFilter::DatePrefix("2026-10-18".to_string()).apply(&notes);
        let ids: Vec<_> = matched.iter().map(|note| note.id.clone()).collect();
        assert_eq!(ids, vec![notes[0].id.clone(), notes[2].id.clone()]);

        let everything = NoteFilter::DatePrefix(String::new()).apply(&notes);
        assert_eq!(everything.len(), 3);
    }
}
