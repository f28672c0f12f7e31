#![no_main]

use std::cell::Cell;
use std::rc::Rc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use quill_history::{Change, HistoryConfig, UndoStore};

#[derive(Debug, Arbitrary)]
enum Op {
    Edit(i16),
    BeginGroup,
    EndGroup,
    ResetGroup,
    RollbackGroup,
    Undo,
    Redo,
    Toggle,
    Clear,
}

fuzz_target!(|input: (u8, Vec<Op>)| {
    let (depth, ops) = input;
    if ops.len() > 256 {
        return;
    }

    let max_depth = usize::from(depth % 16) + 1;
    let store = UndoStore::new(HistoryConfig::new(max_depth));
    let doc = Rc::new(Cell::new(0i64));
    let mut group = None;

    for op in ops {
        match op {
            Op::Edit(delta) => {
                let delta = i64::from(delta);
                doc.set(doc.get() + delta);
                let (fwd, inv) = (Rc::clone(&doc), Rc::clone(&doc));
                store.record(Change::new(
                    move || fwd.set(fwd.get() + delta),
                    move || inv.set(inv.get() - delta),
                ));
            }
            Op::BeginGroup => {
                if !store.has_open_group() {
                    // Replacing a guard abandoned by `Clear` must not close the new group.
                    group = Some(store.begin_group().expect("no group is open"));
                    assert!(store.has_open_group());
                } else {
                    assert!(store.begin_group().is_err(), "nested groups must be rejected");
                }
            }
            Op::EndGroup => {
                group = None;
            }
            Op::ResetGroup => {
                if let Some(open) = &group {
                    let _ = open.reset();
                }
            }
            Op::RollbackGroup => {
                if let Some(open) = &group {
                    let _ = open.rollback();
                }
            }
            Op::Undo => {
                let _ = store.undo();
            }
            Op::Redo => {
                let _ = store.redo();
            }
            Op::Toggle => store.set_enabled(!store.is_enabled()),
            Op::Clear => store.clear(),
        }

        assert!(store.undo_depth() <= max_depth, "depth limit must hold");
        assert!(!store.is_replaying(), "replay flag must be reset");
    }

    drop(group);
    assert!(!store.has_open_group(), "dropping the guard must close the group");
});
