#![forbid(unsafe_code)]

//! End-to-end undo/redo scenarios against a small document model.
//!
//! Run:
//!   cargo test -p quill-history --test undo_scenarios

use std::cell::RefCell;
use std::rc::Rc;

use quill_history::{Change, ChangeMetadata, ChangeSource, HistoryConfig, UndoStore};

#[derive(Debug, Clone, PartialEq)]
struct Layer {
    name: String,
    visible: bool,
    opacity: f32,
}

type Shared = Rc<RefCell<Layer>>;

fn layer() -> Shared {
    Rc::new(RefCell::new(Layer {
        name: "A".into(),
        visible: true,
        opacity: 1.0,
    }))
}

fn rename(store: &UndoStore, layer: &Shared, name: &str) {
    store.set_tracked("Rename", layer, |l: &mut Layer| &mut l.name, name.to_string());
}

fn set_visible(store: &UndoStore, layer: &Shared, visible: bool) {
    store.set_tracked("Toggle visibility", layer, |l: &mut Layer| &mut l.visible, visible);
}

fn set_opacity(store: &UndoStore, layer: &Shared, opacity: f32) {
    store.set_tracked("Opacity", layer, |l: &mut Layer| &mut l.opacity, opacity);
}

// ============================================================================
// Group scenario
// ============================================================================

#[test]
fn hide_and_rename_is_one_step() {
    let store = UndoStore::default();
    let layer = layer();

    {
        let _group = store.begin_group().unwrap();
        set_visible(&store, &layer, false);
        rename(&store, &layer, "B");
    }

    assert_eq!(store.undo_depth(), 1);

    let report = store.undo().unwrap();
    assert_eq!(report.changes, 2);
    assert!(layer.borrow().visible);
    assert_eq!(layer.borrow().name, "A");

    store.redo().unwrap();
    assert!(!layer.borrow().visible);
    assert_eq!(layer.borrow().name, "B");
}

#[test]
fn undo_restores_pre_group_state_for_many_changes() {
    let store = UndoStore::new(HistoryConfig::unlimited());
    let layer = layer();
    let before = layer.borrow().clone();

    {
        let _group = store.begin_group_named("Fade out").unwrap();
        for step in 1..=10 {
            set_opacity(&store, &layer, 1.0 - step as f32 * 0.1);
        }
        set_visible(&store, &layer, false);
    }
    let after = layer.borrow().clone();

    store.undo().unwrap();
    assert_eq!(*layer.borrow(), before);
    store.redo().unwrap();
    assert_eq!(*layer.borrow(), after);
}

#[test]
fn single_change_group() {
    let store = UndoStore::default();
    let layer = layer();
    {
        let _group = store.begin_group().unwrap();
        rename(&store, &layer, "Solo");
    }
    assert_eq!(store.undo_depth(), 1);
    store.undo().unwrap();
    assert_eq!(layer.borrow().name, "A");
}

#[test]
fn empty_group_leaves_history_untouched() {
    let store = UndoStore::default();
    let layer = layer();
    rename(&store, &layer, "B");
    store.undo().unwrap();
    assert!(store.can_redo());

    {
        let _group = store.begin_group().unwrap();
    }

    // No push happened, so redo survives.
    assert!(store.can_redo());
    assert!(!store.can_undo());
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn reset_keeps_only_later_changes() {
    let store = UndoStore::default();
    let layer = layer();

    {
        let group = store.begin_group().unwrap();
        rename(&store, &layer, "draft-1");
        rename(&store, &layer, "draft-2");
        group.reset().unwrap();
        set_visible(&store, &layer, false);
        assert_eq!(group.len(), 1);
    }

    let report = store.undo().unwrap();
    assert_eq!(report.changes, 1);
    // Only the visibility change was undone; the reset renames stay applied.
    assert!(layer.borrow().visible);
    assert_eq!(layer.borrow().name, "draft-2");
}

#[test]
fn reset_of_closed_group_fails() {
    let store = UndoStore::default();
    let group = store.begin_group().unwrap();
    let id = group.id();
    store.clear();
    let err = group.reset().unwrap_err();
    assert_eq!(err.to_string(), format!("{id} is not open"));
}

// ============================================================================
// Enable / disable
// ============================================================================

#[test]
fn disabled_store_leaves_can_undo_unchanged() {
    let store = UndoStore::default();
    let layer = layer();
    rename(&store, &layer, "B");
    let depth = store.undo_depth();

    store.set_enabled(false);
    for i in 0..5 {
        rename(&store, &layer, &format!("quiet-{i}"));
        set_visible(&store, &layer, i % 2 == 0);
    }
    assert_eq!(store.undo_depth(), depth);
    assert!(store.can_undo());

    store.set_enabled(true);
    rename(&store, &layer, "C");
    assert_eq!(store.undo_depth(), depth + 1);
}

#[test]
fn disabled_store_with_empty_history() {
    let store = UndoStore::default();
    let layer = layer();
    store.set_enabled(false);
    {
        let _group = store.begin_group().unwrap();
        rename(&store, &layer, "B");
    }
    assert!(!store.can_undo());
    assert_eq!(layer.borrow().name, "B");
}

#[test]
fn suspended_load_does_not_record() {
    let store = UndoStore::default();
    let layer = layer();
    {
        let _quiet = store.suspend();
        rename(&store, &layer, "Loaded");
    }
    assert!(!store.can_undo());
    rename(&store, &layer, "Edited");
    assert!(store.can_undo());
}

// ============================================================================
// Replay details
// ============================================================================

#[test]
fn undo_runs_inverses_newest_first() {
    let store = UndoStore::default();
    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let _group = store.begin_group().unwrap();
        for name in ["first", "second", "third"] {
            let (fwd, inv) = (Rc::clone(&log), Rc::clone(&log));
            store.record(Change::new(
                move || fwd.borrow_mut().push(format!("redo {name}")),
                move || inv.borrow_mut().push(format!("undo {name}")),
            ));
        }
    }

    store.undo().unwrap();
    store.redo().unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            "undo third",
            "undo second",
            "undo first",
            "redo first",
            "redo second",
            "redo third",
        ]
    );
}

#[test]
fn selection_flag_propagates_to_report() {
    let store = UndoStore::default();
    {
        let _group = store.begin_group().unwrap();
        store.create_change(|| {}, || {}, false, false);
        store.create_change(|| {}, || {}, true, false);
    }
    assert!(store.undo().unwrap().affects_selection);

    store.create_change(|| {}, || {}, false, true);
    assert!(!store.undo().unwrap().affects_selection);
}

#[test]
fn shallow_change_while_idle_clears_redo() {
    let store = UndoStore::default();
    let layer = layer();
    rename(&store, &layer, "B");
    store.undo().unwrap();
    assert!(store.can_redo());

    store.record(
        Change::create(|| {}, || {}, false, true)
            .with_metadata(ChangeMetadata::new("Scroll").with_source(ChangeSource::Programmatic)),
    );
    assert!(!store.can_redo());
    assert_eq!(store.next_undo_description().as_deref(), Some("Scroll"));
    assert!(store.undo().unwrap().shallow);
}

#[test]
fn committed_group_is_never_shallow() {
    let store = UndoStore::default();
    let layer = layer();
    {
        let _group = store.begin_group_named("Fade out").unwrap();
        store.create_change(|| {}, || {}, false, true);
        set_opacity(&store, &layer, 0.0);
        store.create_change(|| {}, || {}, false, true);
    }

    let undone = store.undo().unwrap();
    assert_eq!(undone.changes, 3);
    assert!(!undone.shallow);
    assert!(!store.redo().unwrap().shallow);

    // Even a group made only of shallow changes is one non-shallow step.
    {
        let _group = store.begin_group().unwrap();
        store.create_change(|| {}, || {}, false, true);
    }
    assert!(!store.undo().unwrap().shallow);
}

#[test]
fn menu_labels_follow_history() {
    let store = UndoStore::default();
    let layer = layer();
    rename(&store, &layer, "B");
    {
        let _group = store.begin_group_named("Hide layer").unwrap();
        set_visible(&store, &layer, false);
    }
    assert_eq!(store.undo_descriptions(5), vec!["Hide layer", "Rename"]);

    store.undo();
    assert_eq!(store.next_undo_description().as_deref(), Some("Rename"));
    assert_eq!(store.next_redo_description().as_deref(), Some("Hide layer"));
}

#[test]
fn depth_limit_evicts_oldest() {
    let store = UndoStore::new(HistoryConfig::new(2));
    let layer = layer();
    for name in ["B", "C", "D"] {
        rename(&store, &layer, name);
    }
    assert_eq!(store.undo_depth(), 2);
    store.undo().unwrap();
    store.undo().unwrap();
    assert!(store.undo().is_none());
    // The first rename fell off the history.
    assert_eq!(layer.borrow().name, "B");
}
