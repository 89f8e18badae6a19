use geonote_core::{
    KeyValueStorage, MemoryStorage, NewNote, NoteEvent, NoteFilter, NoteId, NotePatch, NoteStore,
    DEFAULT_STORAGE_KEY,
};
use std::cell::RefCell;
use std::rc::Rc;

fn empty_store() -> NoteStore<MemoryStorage> {
    NoteStore::with_default_config(MemoryStorage::new()).unwrap()
}

#[test]
fn category_view_tracks_mutations() {
    let mut store = empty_store();
    let mut food = store.by_category("food");
    assert!(food.items(&store).is_empty());

    let a = store.create(NewNote::new(0.0, 0.0, "a", "food")).unwrap();
    let b = store.create(NewNote::new(0.0, 0.0, "b", "travel")).unwrap();
    assert_eq!(food.items(&store), &[a.clone()]);

    store.update(&b.id, NotePatch::category("food")).unwrap();
    let ids: Vec<_> = food.items(&store).iter().map(|note| note.id.clone()).collect();
    assert_eq!(ids, vec![a.id.clone(), b.id.clone()]);

    store.delete(&a.id).unwrap();
    let ids: Vec<_> = food.items(&store).iter().map(|note| note.id.clone()).collect();
    assert_eq!(ids, vec![b.id]);
}

#[test]
fn view_reuses_snapshot_until_store_changes() {
    let mut store = empty_store();
    store.create(NewNote::new(0.0, 0.0, "a", "food")).unwrap();
    let mut view = store.by_category("food");

    view.items(&store);
    view.items(&store);
    assert_eq!(view.recompute_count(), 1);
    assert!(!view.is_stale(&store));

    store.update(&NoteId::generate(), NotePatch::title("nobody")).unwrap();
    assert!(!view.is_stale(&store));

    store.create(NewNote::new(0.0, 0.0, "b", "other")).unwrap();
    assert!(view.is_stale(&store));
    assert_eq!(view.items(&store).len(), 1);
    assert_eq!(view.recompute_count(), 2);
}

#[test]
fn date_view_matches_creation_day_prefix() {
    let mut store = empty_store();
    let note = store.create(NewNote::new(0.0, 0.0, "today", "x")).unwrap();
    let day = &note.created_at[..10];

    let mut today = store.by_date(day);
    assert_eq!(today.items(&store), &[note.clone()]);

    let mut never = store.by_date("1999-01-01");
    assert!(never.items(&store).is_empty());

    let mut exact = store.by_date(note.created_at.clone());
    assert_eq!(exact.items(&store).len(), 1);
    assert_eq!(
        store.filtered(&NoteFilter::DatePrefix(day.to_string())),
        vec![note]
    );
}

#[test]
fn subscribers_receive_effective_mutations_only() {
    let mut store = empty_store();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    let note = store.create(NewNote::new(0.0, 0.0, "a", "x")).unwrap();
    store.update(&note.id, NotePatch::title("b")).unwrap();
    store.update(&NoteId::generate(), NotePatch::title("ignored")).unwrap();
    store.delete(&NoteId::generate()).unwrap();
    store.delete(&note.id).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            NoteEvent::Created {
                id: note.id.clone()
            },
            NoteEvent::Updated {
                id: note.id.clone()
            },
            NoteEvent::Deleted {
                id: note.id.clone(),
                removed: 1
            },
        ]
    );

    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));
    store.create(NewNote::new(0.0, 0.0, "after", "x")).unwrap();
    assert_eq!(seen.borrow().len(), 3);
}

#[test]
fn reload_notifies_and_invalidates_views_only_on_change() {
    let mut store = empty_store();
    store.create(NewNote::new(0.0, 0.0, "a", "x")).unwrap();
    let mut view = store.by_category("x");
    assert_eq!(view.items(&store).len(), 1);

    let reloads = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&reloads);
    store.subscribe(move |event| {
        if matches!(event, NoteEvent::Reloaded { .. }) {
            *counter.borrow_mut() += 1;
        }
    });

    assert_eq!(store.reload().unwrap(), 1);
    assert_eq!(*reloads.borrow(), 0);
    assert!(!view.is_stale(&store));

    store
        .storage_mut()
        .set(DEFAULT_STORAGE_KEY, "[]")
        .unwrap();
    assert_eq!(store.reload().unwrap(), 0);
    assert_eq!(*reloads.borrow(), 1);
    assert!(view.is_stale(&store));
    assert!(view.items(&store).is_empty());
}
