#![forbid(unsafe_code)]

//! Undo store: grouped undo/redo history for one document.
//!
//! The store keeps two stacks of change groups and arbitrates which group,
//! if any, is currently being recorded.
//!
//! ```text
//!            begin_group
//!   Idle ────────────────────► Recording
//!    ▲                            │
//!    │  drop / commit (≥1 change) │  push onto undo, clear redo
//!    └────────────────────────────┤
//!    │  drop / commit (0 changes) │  no history mutation
//!    └────────────────────────────┘
//! ```
//!
//! A change recorded while `Idle` becomes a singleton group.
//!
//! # Invariants
//!
//! 1. At most one group is open at a time.
//! 2. Pushing a group clears the redo stack.
//! 3. `undo_depth() <= config.max_depth` after every operation.
//! 4. While a replay runs, recording is suppressed and the store is not
//!    borrowed, so replay closures may query the store or call tracked
//!    setters without creating history entries.
//!
//! # Sharing
//!
//! [`UndoStore`] is a cheap handle (`Rc<RefCell<..>>`): clones share the same
//! history. It is not `Send`; all editing happens on one thread.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, error, info, warn};

use crate::batch::ChangeBatch;
use crate::change::{Change, ChangeMetadata};
use crate::config::HistoryConfig;
use crate::error::{Direction, GroupId, HistoryError};
use crate::group::ChangeGroup;

/// Outcome of a successful undo or redo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Which stack was replayed.
    pub direction: Direction,
    /// Description of the replayed group.
    pub description: String,
    /// Number of changes replayed.
    pub changes: usize,
    /// Whether any replayed change alters the current selection.
    pub affects_selection: bool,
    /// Whether the step was a lone shallow change. Groups never are.
    pub shallow: bool,
}

struct OpenGroup {
    id: GroupId,
    batch: ChangeBatch,
}

struct StoreInner {
    /// Groups available for undo (newest at back).
    undo_stack: VecDeque<ChangeBatch>,
    /// Groups available for redo (newest at back).
    redo_stack: VecDeque<ChangeBatch>,
    open: Option<OpenGroup>,
    enabled: bool,
    replaying: bool,
    last_group_id: u64,
    config: HistoryConfig,
}

impl StoreInner {
    /// Push a committed group. Returns the groups that left history.
    fn push_batch(&mut self, batch: ChangeBatch) -> Vec<ChangeBatch> {
        let mut garbage: Vec<ChangeBatch> = self.redo_stack.drain(..).collect();
        self.undo_stack.push_back(batch);
        garbage.extend(self.enforce_depth());
        garbage
    }

    fn enforce_depth(&mut self) -> Vec<ChangeBatch> {
        let mut evicted = Vec::new();
        while self.undo_stack.len() > self.config.max_depth {
            if let Some(batch) = self.undo_stack.pop_front() {
                evicted.push(batch);
            }
        }
        if !evicted.is_empty() {
            info!(
                target: "quill.history",
                evicted = evicted.len(),
                max_depth = self.config.max_depth,
                "oldest history evicted"
            );
        }
        evicted
    }

    fn stack(&self, direction: Direction) -> &VecDeque<ChangeBatch> {
        match direction {
            Direction::Undo => &self.undo_stack,
            Direction::Redo => &self.redo_stack,
        }
    }
}

/// Shared handle to a document's undo/redo history.
#[derive(Clone)]
pub struct UndoStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl fmt::Debug for UndoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("UndoStore")
                .field("undo_depth", &inner.undo_stack.len())
                .field("redo_depth", &inner.redo_stack.len())
                .field("open_group", &inner.open.as_ref().map(|open| open.id))
                .field("enabled", &inner.enabled)
                .field("config", &inner.config)
                .finish(),
            Err(_) => f.write_str("UndoStore { <borrowed> }"),
        }
    }
}

impl Default for UndoStore {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl UndoStore {
    /// Create an empty, enabled store.
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                undo_stack: VecDeque::new(),
                redo_stack: VecDeque::new(),
                open: None,
                enabled: true,
                replaying: false,
                last_group_id: 0,
                config: config.validated(),
            })),
        }
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Open a change group. Every change recorded until the group is closed
    /// is appended to it.
    ///
    /// Fails with [`HistoryError::NestedGroup`] if a group is already open.
    pub fn begin_group(&self) -> Result<ChangeGroup, HistoryError> {
        self.open_group_with(None)
    }

    /// Open a change group with an explicit description.
    pub fn begin_group_named(
        &self,
        description: impl Into<String>,
    ) -> Result<ChangeGroup, HistoryError> {
        self.open_group_with(Some(ChangeMetadata::new(description)))
    }

    fn open_group_with(&self, metadata: Option<ChangeMetadata>) -> Result<ChangeGroup, HistoryError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(open) = &inner.open {
            let open_group = open.id;
            error!(target: "quill.history", %open_group, "nested change group rejected");
            return Err(HistoryError::NestedGroup { open_group });
        }
        inner.last_group_id += 1;
        let id = GroupId(inner.last_group_id);
        inner.open = Some(OpenGroup {
            id,
            batch: ChangeBatch::new(metadata),
        });
        drop(inner);

        debug!(target: "quill.history", group = %id, "change group opened");
        Ok(ChangeGroup::new(self.clone(), id))
    }

    /// Record a change whose mutation has already been performed.
    ///
    /// The change goes into the open group, or becomes a singleton group when
    /// none is open. It is dropped while recording is disabled or a replay is
    /// running.
    pub fn record(&self, change: Change) {
        let garbage = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            if inner.replaying || !inner.enabled {
                debug!(
                    target: "quill.history",
                    reason = if inner.replaying { "replaying" } else { "disabled" },
                    description = change.description(),
                    "change dropped"
                );
                (Some(change), Vec::new())
            } else if let Some(open) = inner.open.as_mut() {
                debug!(
                    target: "quill.history",
                    group = %open.id,
                    description = change.description(),
                    "change recorded into group"
                );
                open.batch.push(change);
                (None, Vec::new())
            } else {
                debug!(
                    target: "quill.history",
                    description = change.description(),
                    shallow = change.is_shallow(),
                    "change recorded as singleton group"
                );
                (None, inner.push_batch(ChangeBatch::singleton(change)))
            }
        };
        drop(garbage);
    }

    /// Build a change from its parts and record it.
    pub fn create_change(
        &self,
        mutate: impl FnMut() + 'static,
        invert: impl FnMut() + 'static,
        affects_selection: bool,
        is_shallow: bool,
    ) {
        self.record(Change::create(mutate, invert, affects_selection, is_shallow));
    }

    /// Assign `value` to the field selected by `accessor` and record the
    /// assignment.
    ///
    /// ```ignore
    /// store.set_tracked("Rename", &layer, |l: &mut Layer| &mut l.name, "B".to_string());
    /// ```
    pub fn set_tracked<T, F, A>(
        &self,
        description: impl Into<String>,
        target: &Rc<RefCell<T>>,
        accessor: A,
        value: F,
    ) where
        T: 'static,
        F: Clone + 'static,
        A: Fn(&mut T) -> &mut F + Clone + 'static,
    {
        let old = {
            let mut guard = target.borrow_mut();
            std::mem::replace(accessor(&mut *guard), value.clone())
        };

        let (fwd_target, inv_target) = (Rc::clone(target), Rc::clone(target));
        let (fwd_access, inv_access) = (accessor.clone(), accessor);
        let change = Change::new(
            move || *fwd_access(&mut *fwd_target.borrow_mut()) = value.clone(),
            move || *inv_access(&mut *inv_target.borrow_mut()) = old.clone(),
        )
        .with_description(description);
        self.record(change);
    }

    // ========================================================================
    // Replay
    // ========================================================================

    /// Undo the newest group, replaying its inverses in reverse order.
    ///
    /// Returns `None` when the step is rejected; [`try_undo`](Self::try_undo)
    /// reports why.
    pub fn undo(&self) -> Option<StepReport> {
        self.step(Direction::Undo).ok()
    }

    /// Redo the newest undone group, replaying its forwards in order.
    ///
    /// Returns `None` when the step is rejected; [`try_redo`](Self::try_redo)
    /// reports why.
    pub fn redo(&self) -> Option<StepReport> {
        self.step(Direction::Redo).ok()
    }

    /// Like [`undo`](Self::undo), reporting why nothing happened.
    pub fn try_undo(&self) -> Result<StepReport, HistoryError> {
        self.step(Direction::Undo)
    }

    /// Like [`redo`](Self::redo), reporting why nothing happened.
    pub fn try_redo(&self) -> Result<StepReport, HistoryError> {
        self.step(Direction::Redo)
    }

    fn step(&self, direction: Direction) -> Result<StepReport, HistoryError> {
        let mut batch = {
            let mut inner = self.inner.borrow_mut();
            if inner.replaying {
                warn!(target: "quill.history", %direction, "replay rejected during another replay");
                return Err(HistoryError::ReentrantReplay { direction });
            }
            if let Some(open) = &inner.open {
                let open_group = open.id;
                warn!(
                    target: "quill.history",
                    %open_group,
                    %direction,
                    "replay rejected while a group is open"
                );
                return Err(HistoryError::GroupOpen { open_group });
            }
            let popped = match direction {
                Direction::Undo => inner.undo_stack.pop_back(),
                Direction::Redo => inner.redo_stack.pop_back(),
            };
            match popped {
                Some(batch) => batch,
                None => {
                    debug!(target: "quill.history", %direction, "nothing to replay");
                    return Err(HistoryError::EmptyHistory { direction });
                }
            }
        };

        {
            let _replay = self.replay_guard();
            match direction {
                Direction::Undo => batch.revert_all(),
                Direction::Redo => batch.apply_all(),
            }
        }

        let report = StepReport {
            direction,
            description: batch.description().to_string(),
            changes: batch.len(),
            affects_selection: batch.affects_selection(),
            shallow: batch.is_shallow(),
        };

        let garbage = {
            let mut inner = self.inner.borrow_mut();
            let garbage = match direction {
                Direction::Undo => {
                    inner.redo_stack.push_back(batch);
                    Vec::new()
                }
                Direction::Redo => {
                    inner.undo_stack.push_back(batch);
                    inner.enforce_depth()
                }
            };
            debug!(
                target: "quill.history",
                %direction,
                changes = report.changes,
                description = %report.description,
                undo_depth = inner.undo_stack.len(),
                redo_depth = inner.redo_stack.len(),
                "history step replayed"
            );
            garbage
        };
        drop(garbage);
        Ok(report)
    }

    // ========================================================================
    // State
    // ========================================================================

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.inner.borrow().undo_stack.is_empty()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.inner.borrow().redo_stack.is_empty()
    }

    /// Whether a change group is being recorded.
    #[must_use]
    pub fn has_open_group(&self) -> bool {
        self.inner.borrow().open.is_some()
    }

    /// Id of the group being recorded, if any.
    #[must_use]
    pub fn open_group(&self) -> Option<GroupId> {
        self.inner.borrow().open.as_ref().map(|open| open.id)
    }

    /// Whether changes are being recorded.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.borrow().enabled
    }

    /// Enable or disable recording. Undo and redo keep working either way.
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.borrow_mut().enabled = enabled;
        debug!(target: "quill.history", enabled, "recording toggled");
    }

    /// Disable recording until the returned guard is dropped.
    ///
    /// The previous enabled flag is restored, so guards nest.
    pub fn suspend(&self) -> SuspendGuard {
        let previous = std::mem::replace(&mut self.inner.borrow_mut().enabled, false);
        debug!(target: "quill.history", "recording suspended");
        SuspendGuard {
            store: self.clone(),
            previous,
        }
    }

    /// Whether an undo or redo is currently replaying.
    #[must_use]
    pub fn is_replaying(&self) -> bool {
        self.inner.borrow().replaying
    }

    /// Get the undo stack depth.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.inner.borrow().undo_stack.len()
    }

    /// Get the redo stack depth.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.inner.borrow().redo_stack.len()
    }

    /// Get the description of the next undo group.
    #[must_use]
    pub fn next_undo_description(&self) -> Option<String> {
        self.next_description(Direction::Undo)
    }

    /// Get the description of the next redo group.
    #[must_use]
    pub fn next_redo_description(&self) -> Option<String> {
        self.next_description(Direction::Redo)
    }

    /// Get descriptions for undo groups (most recent first).
    #[must_use]
    pub fn undo_descriptions(&self, limit: usize) -> Vec<String> {
        self.descriptions(Direction::Undo, limit)
    }

    /// Get descriptions for redo groups (most recent first).
    #[must_use]
    pub fn redo_descriptions(&self, limit: usize) -> Vec<String> {
        self.descriptions(Direction::Redo, limit)
    }

    fn next_description(&self, direction: Direction) -> Option<String> {
        let inner = self.inner.borrow();
        inner
            .stack(direction)
            .back()
            .map(|batch| batch.description().to_string())
    }

    fn descriptions(&self, direction: Direction, limit: usize) -> Vec<String> {
        let inner = self.inner.borrow();
        inner
            .stack(direction)
            .iter()
            .rev()
            .take(limit)
            .map(|batch| batch.description().to_string())
            .collect()
    }

    /// Get the current configuration.
    #[must_use]
    pub fn config(&self) -> HistoryConfig {
        self.inner.borrow().config
    }

    /// Clear all history (both stacks).
    ///
    /// An open group is abandoned: its changes are dropped and its guard
    /// becomes inert.
    pub fn clear(&self) {
        let garbage = {
            let mut inner = self.inner.borrow_mut();
            let abandoned = inner.open.take();
            if let Some(open) = &abandoned {
                warn!(target: "quill.history", group = %open.id, "open change group abandoned");
            }
            (
                std::mem::take(&mut inner.undo_stack),
                std::mem::take(&mut inner.redo_stack),
                abandoned,
            )
        };
        drop(garbage);
        debug!(target: "quill.history", "history cleared");
    }

    // ========================================================================
    // Group plumbing
    // ========================================================================

    pub(crate) fn group_len(&self, id: GroupId) -> Option<usize> {
        let inner = self.inner.try_borrow().ok()?;
        inner
            .open
            .as_ref()
            .filter(|open| open.id == id)
            .map(|open| open.batch.len())
    }

    /// Detach the accumulated changes of `id`, keeping the group open.
    pub(crate) fn take_group_changes(&self, id: GroupId) -> Result<Vec<Change>, HistoryError> {
        let mut inner = self.inner.borrow_mut();
        match inner.open.as_mut() {
            Some(open) if open.id == id => Ok(open.batch.take_changes()),
            _ => {
                error!(target: "quill.history", group = %id, "change group is not open");
                Err(HistoryError::InvalidGroupState { group: id })
            }
        }
    }

    /// Close `id`. Returns true if a history entry was pushed.
    pub(crate) fn close_group(&self, id: GroupId, commit: bool) -> bool {
        let (garbage, pushed) = {
            let Ok(mut guard) = self.inner.try_borrow_mut() else {
                return false;
            };
            let inner = &mut *guard;
            let Some(open) = inner.open.take_if(|open| open.id == id) else {
                return false;
            };
            if commit && !open.batch.is_empty() {
                debug!(
                    target: "quill.history",
                    group = %id,
                    changes = open.batch.len(),
                    description = open.batch.description(),
                    "change group committed"
                );
                (inner.push_batch(open.batch), true)
            } else {
                debug!(
                    target: "quill.history",
                    group = %id,
                    changes = open.batch.len(),
                    "change group discarded"
                );
                (vec![open.batch], false)
            }
        };
        drop(garbage);
        pushed
    }

    pub(crate) fn replay_guard(&self) -> ReplayGuard<'_> {
        let previous = std::mem::replace(&mut self.inner.borrow_mut().replaying, true);
        ReplayGuard {
            inner: &self.inner,
            previous,
        }
    }
}

/// Suppresses recording while closures replay; restored even on panic.
pub(crate) struct ReplayGuard<'a> {
    inner: &'a RefCell<StoreInner>,
    previous: bool,
}

impl Drop for ReplayGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.replaying = self.previous;
        }
    }
}

/// Guard returned by [`UndoStore::suspend`].
#[must_use = "recording resumes as soon as the guard is dropped"]
pub struct SuspendGuard {
    store: UndoStore,
    previous: bool,
}

impl fmt::Debug for SuspendGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuspendGuard")
            .field("previous", &self.previous)
            .finish()
    }
}

impl Drop for SuspendGuard {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.store.inner.try_borrow_mut() {
            inner.enabled = self.previous;
        }
        debug!(target: "quill.history", enabled = self.previous, "recording resumed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tracing_test::traced_test;

    fn counter_change(counter: &Rc<Cell<i32>>, delta: i32) -> Change {
        let (fwd, inv) = (Rc::clone(counter), Rc::clone(counter));
        Change::new(move || fwd.set(fwd.get() + delta), move || inv.set(inv.get() - delta))
    }

    fn bump(store: &UndoStore, counter: &Rc<Cell<i32>>, delta: i32) {
        counter.set(counter.get() + delta);
        store.record(counter_change(counter, delta).with_description(format!("add {delta}")));
    }

    #[test]
    fn new_store_is_empty() {
        let store = UndoStore::default();
        assert!(!store.can_undo());
        assert!(!store.can_redo());
        assert!(!store.has_open_group());
        assert!(store.is_enabled());
        assert_eq!(store.undo_depth(), 0);
        assert_eq!(store.config(), HistoryConfig::default());
    }

    #[test]
    fn idle_record_becomes_singleton_group() {
        let store = UndoStore::default();
        let counter = Rc::new(Cell::new(0));
        bump(&store, &counter, 5);
        assert_eq!(store.undo_depth(), 1);

        let report = store.undo().unwrap();
        assert_eq!(report.changes, 1);
        assert_eq!(report.description, "add 5");
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let store = UndoStore::default();
        assert!(store.undo().is_none());
        assert!(store.redo().is_none());
        assert_eq!(
            store.try_undo().unwrap_err(),
            HistoryError::EmptyHistory {
                direction: Direction::Undo
            }
        );
    }

    #[test]
    fn push_clears_redo() {
        let store = UndoStore::default();
        let counter = Rc::new(Cell::new(0));
        bump(&store, &counter, 1);
        store.undo();
        assert!(store.can_redo());

        bump(&store, &counter, 2);
        assert!(!store.can_redo());
        assert_eq!(store.redo_depth(), 0);
    }

    #[test]
    fn max_depth_enforced() {
        let store = UndoStore::new(HistoryConfig::new(3));
        let counter = Rc::new(Cell::new(0));
        for delta in 1..=5 {
            bump(&store, &counter, delta);
        }
        assert_eq!(store.undo_depth(), 3);
        assert_eq!(store.undo_descriptions(10), vec!["add 5", "add 4", "add 3"]);
    }

    #[test]
    #[traced_test]
    fn eviction_is_logged() {
        let store = UndoStore::new(HistoryConfig::new(1));
        let counter = Rc::new(Cell::new(0));
        bump(&store, &counter, 1);
        bump(&store, &counter, 2);
        assert!(logs_contain("oldest history evicted"));
    }

    #[test]
    fn next_descriptions() {
        let store = UndoStore::default();
        let counter = Rc::new(Cell::new(0));
        bump(&store, &counter, 1);

        assert_eq!(store.next_undo_description().as_deref(), Some("add 1"));
        assert_eq!(store.next_redo_description(), None);

        store.undo();

        assert_eq!(store.next_undo_description(), None);
        assert_eq!(store.next_redo_description().as_deref(), Some("add 1"));
        assert_eq!(store.redo_descriptions(1), vec!["add 1"]);
    }

    #[test]
    fn disabled_store_drops_changes() {
        let store = UndoStore::default();
        let counter = Rc::new(Cell::new(0));
        store.set_enabled(false);
        bump(&store, &counter, 1);
        assert!(!store.can_undo());
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn disabled_store_still_replays() {
        let store = UndoStore::default();
        let counter = Rc::new(Cell::new(0));
        bump(&store, &counter, 4);
        store.set_enabled(false);
        assert!(store.undo().is_some());
        assert_eq!(counter.get(), 0);
        assert!(store.redo().is_some());
        assert_eq!(counter.get(), 4);
    }

    #[test]
    fn suspend_restores_previous_flag() {
        let store = UndoStore::default();
        {
            let _outer = store.suspend();
            assert!(!store.is_enabled());
            {
                let _inner = store.suspend();
                assert!(!store.is_enabled());
            }
            assert!(!store.is_enabled());
        }
        assert!(store.is_enabled());
    }

    #[test]
    fn replay_does_not_record() {
        let store = UndoStore::default();
        let counter = Rc::new(Cell::new(0));

        // Inverse that calls back into the store, like a tracked setter would.
        let (fwd, inv, inv_store) = (Rc::clone(&counter), Rc::clone(&counter), store.clone());
        counter.set(1);
        store.record(Change::new(
            move || fwd.set(1),
            move || {
                inv.set(0);
                assert!(inv_store.is_replaying());
                assert_eq!(inv_store.undo_depth(), 0);
                inv_store.record(Change::new(|| {}, || {}));
            },
        ));

        store.undo().unwrap();
        assert_eq!(counter.get(), 0);
        assert_eq!(store.undo_depth(), 0);
        assert_eq!(store.redo_depth(), 1);
        assert!(!store.is_replaying());
    }

    #[test]
    fn replay_rejects_nested_undo() {
        let store = UndoStore::default();
        let counter = Rc::new(Cell::new(0));
        bump(&store, &counter, 1);

        let nested = Rc::new(Cell::new(None));
        let (inv, inv_store, seen) = (Rc::clone(&counter), store.clone(), Rc::clone(&nested));
        counter.set(counter.get() + 10);
        store.record(Change::new(
            || {},
            move || {
                inv.set(inv.get() - 10);
                seen.set(Some(inv_store.try_undo().map(|report| report.changes)));
            },
        ));

        let report = store.undo().unwrap();
        assert_eq!(report.changes, 1);
        assert_eq!(
            nested.take(),
            Some(Err(HistoryError::ReentrantReplay {
                direction: Direction::Undo
            }))
        );
        // Only the outer step ran; the older change is still undoable.
        assert_eq!(counter.get(), 1);
        assert_eq!(store.undo_depth(), 1);
        assert_eq!(store.redo_depth(), 1);
    }

    #[test]
    fn step_report_flags_shallow_singletons() {
        let store = UndoStore::default();
        store.record(Change::new(|| {}, || {}).shallow(true));
        assert!(store.undo().unwrap().shallow);

        store.record(Change::new(|| {}, || {}));
        assert!(!store.undo().unwrap().shallow);
    }

    #[test]
    fn replay_guard_resets_after_panic() {
        let store = UndoStore::default();
        store.record(Change::new(|| {}, || panic!("inverse failed")));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| store.undo()));
        assert!(result.is_err());
        assert!(!store.is_replaying());
        assert!(store.is_enabled());
    }

    #[test]
    fn set_tracked_records_old_and_new() {
        #[derive(Debug)]
        struct Layer {
            name: String,
        }

        let store = UndoStore::default();
        let layer = Rc::new(RefCell::new(Layer { name: "A".into() }));
        store.set_tracked("Rename", &layer, |l: &mut Layer| &mut l.name, "B".to_string());
        assert_eq!(layer.borrow().name, "B");

        store.undo().unwrap();
        assert_eq!(layer.borrow().name, "A");
        store.redo().unwrap();
        assert_eq!(layer.borrow().name, "B");
        assert_eq!(store.next_undo_description().as_deref(), Some("Rename"));
    }

    #[test]
    fn create_change_records_flags() {
        let store = UndoStore::default();
        store.create_change(|| {}, || {}, true, true);
        let report = store.undo().unwrap();
        assert!(report.affects_selection);
        assert_eq!(report.direction, Direction::Undo);
    }

    #[test]
    fn clear_drops_everything() {
        let store = UndoStore::default();
        let counter = Rc::new(Cell::new(0));
        bump(&store, &counter, 1);
        bump(&store, &counter, 2);
        store.undo();
        store.clear();
        assert!(!store.can_undo());
        assert!(!store.can_redo());
    }

    #[test]
    fn clones_share_history() {
        let store = UndoStore::default();
        let other = store.clone();
        let counter = Rc::new(Cell::new(0));
        bump(&store, &counter, 1);
        assert!(other.can_undo());
    }

    #[test]
    fn debug_reports_depths() {
        let store = UndoStore::default();
        let debug_str = format!("{store:?}");
        assert!(debug_str.contains("UndoStore"));
        assert!(debug_str.contains("undo_depth"));
    }
}
