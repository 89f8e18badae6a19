//! Note collection manager.
//!
//! # Responsibility
//! - Load the collection from its slot on open (empty on absent/corrupt).
//! - Apply create/update/delete and persist the whole sequence each time.
//! - Publish a revision counter for views and events for subscribers.
//!
//! # Invariants
//! - Notes keep insertion order; update replaces in place.
//! - The new sequence is written before it replaces the in-memory one.
//! - `id` and `created_at` are never modified after creation.

use super::event::{NoteEvent, Subscriber, SubscriptionId};
use super::view::{NoteFilter, NoteView};
use crate::config::StoreConfig;
use crate::model::note::{NewNote, Note, NoteId, NotePatch};
use crate::storage::{KeyValueStorage, StorageError};
use log::{debug, error, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure while reading or persisting the collection slot.
#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize notes: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

enum SlotState {
    Absent,
    Loaded(Vec<Note>),
    Corrupt,
}

/// Ordered note collection mirrored to one key-value slot.
pub struct NoteStore<S: KeyValueStorage> {
    storage: S,
    config: StoreConfig,
    notes: Vec<Note>,
    revision: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<S: KeyValueStorage> NoteStore<S> {
    /// Opens the store over `storage`, rehydrating from the configured slot.
    ///
    /// # Errors
    /// - Storage transport errors while reading (or writing defaults).
    pub fn open(storage: S, config: StoreConfig) -> StoreResult<Self> {
        let mut store = Self {
            storage,
            config,
            notes: Vec::new(),
            revision: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        };

        match store.read_slot()? {
            SlotState::Loaded(notes) => store.notes = notes,
            SlotState::Corrupt => {}
            SlotState::Absent if store.config.write_defaults => {
                store.storage.set(&store.config.storage_key, "[]")?;
            }
            SlotState::Absent => {}
        }

        info!(
            "event=store_open module=store status=ok key={} count={}",
            store.config.storage_key,
            store.notes.len()
        );
        Ok(store)
    }

    /// Opens with the default `geo-notes` slot.
    pub fn with_default_config(storage: S) -> StoreResult<Self> {
        Self::open(storage, StoreConfig::default())
    }

    /// Appends a new note with generated id and creation timestamp.
    pub fn create(&mut self, input: NewNote) -> StoreResult<Note> {
        let note = Note::create(input);
        let mut next = self.notes.clone();
        next.push(note.clone());
        self.commit(next, NoteEvent::Created { id: note.id.clone() })?;
        Ok(note)
    }

    /// Shallow-merges `patch` into the first note with `id`.
    ///
    /// Returns `false` without touching storage when no note matches.
    pub fn update(&mut self, id: &NoteId, patch: NotePatch) -> StoreResult<bool> {
        let Some(index) = self.notes.iter().position(|note| note.id == *id) else {
            debug!("event=note_update module=store status=skipped reason=not_found note_id={id}");
            return Ok(false);
        };

        let mut next = self.notes.clone();
        next[index] = self.notes[index].merged(&patch);
        self.commit(next, NoteEvent::Updated { id: id.clone() })?;
        Ok(true)
    }

    /// Removes every note with `id`, preserving the order of the rest.
    ///
    /// Returns the number of removed notes; zero means nothing was written.
    pub fn delete(&mut self, id: &NoteId) -> StoreResult<usize> {
        let next: Vec<Note> = self
            .notes
            .iter()
            .filter(|note| note.id != *id)
            .cloned()
            .collect();
        let removed = self.notes.len() - next.len();
        if removed == 0 {
            debug!("event=note_delete module=store status=skipped reason=not_found note_id={id}");
            return Ok(0);
        }

        self.commit(
            next,
            NoteEvent::Deleted {
                id: id.clone(),
                removed,
            },
        )?;
        Ok(removed)
    }

    /// Removes all notes. No-op on an empty collection.
    pub fn clear(&mut self) -> StoreResult<usize> {
        let removed = self.notes.len();
        if removed == 0 {
            return Ok(0);
        }
        self.commit(Vec::new(), NoteEvent::Cleared { removed })?;
        Ok(removed)
    }

    /// Replaces the in-memory collection with the current slot contents.
    ///
    /// Absent or corrupt slots reload as empty without writing. When the
    /// slot holds the current collection the revision is kept and no event
    /// is emitted.
    pub fn reload(&mut self) -> StoreResult<usize> {
        let notes = match self.read_slot()? {
            SlotState::Loaded(notes) => notes,
            SlotState::Absent | SlotState::Corrupt => Vec::new(),
        };
        let count = notes.len();
        if notes == self.notes {
            debug!("event=note_reload module=store status=skipped reason=unchanged count={count}");
            return Ok(count);
        }
        self.notes = notes;
        self.revision += 1;
        self.notify(&NoteEvent::Reloaded { count });
        Ok(count)
    }

    /// Live view over notes whose category equals `category` exactly.
    pub fn by_category(&self, category: impl Into<String>) -> NoteView {
        NoteView::new(NoteFilter::Category(category.into()))
    }

    /// Live view over notes whose `created_at` starts with `date_prefix`.
    pub fn by_date(&self, date_prefix: impl Into<String>) -> NoteView {
        NoteView::new(NoteFilter::DatePrefix(date_prefix.into()))
    }

    /// One-shot filtered copy of the current collection.
    pub fn filtered(&self, filter: &NoteFilter) -> Vec<Note> {
        filter.apply(&self.notes)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == *id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Counter bumped on every effective mutation or reload.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Distinct categories, sorted ascending.
    pub fn categories(&self) -> Vec<String> {
        self.notes
            .iter()
            .map(|note| note.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Registers a callback invoked after every persisted mutation.
    pub fn subscribe(&mut self, callback: impl FnMut(&NoteEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscription. Returns `false` for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(current, _)| *current != id);
        self.subscribers.len() != before
    }

    fn read_slot(&self) -> StoreResult<SlotState> {
        let key = self.config.storage_key.as_str();
        let Some(raw) = self.storage.get(key)? else {
            return Ok(SlotState::Absent);
        };

        match serde_json::from_str::<Vec<Note>>(&raw) {
            Ok(notes) => Ok(SlotState::Loaded(notes)),
            Err(err) => {
                warn!(
                    "event=store_load module=store status=fallback reason=unparseable key={key} error={err}"
                );
                Ok(SlotState::Corrupt)
            }
        }
    }

    fn commit(&mut self, next: Vec<Note>, event: NoteEvent) -> StoreResult<()> {
        let payload = serde_json::to_string(&next).map_err(StoreError::Serialize)?;
        if let Err(err) = self.storage.set(&self.config.storage_key, &payload) {
            error!(
                "event={} module=store status=error error_code=persist_failed error={}",
                event.name(),
                err
            );
            return Err(err.into());
        }

        self.notes = next;
        self.revision += 1;
        info!(
            "event={} module=store status=ok revision={} count={}",
            event.name(),
            self.revision,
            self.notes.len()
        );
        self.notify(&event);
        Ok(())
    }

    fn notify(&mut self, event: &NoteEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }
}
