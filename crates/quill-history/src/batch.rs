#![forbid(unsafe_code)]

//! Ordered batch of changes forming one undo step.

use std::fmt;

use crate::change::{Change, ChangeMetadata};

/// One history entry: changes in recording order.
pub(crate) struct ChangeBatch {
    changes: Vec<Change>,
    /// Explicit group label; `None` falls back to the first change.
    metadata: Option<ChangeMetadata>,
    /// Built by a change group rather than by an idle `record`.
    grouped: bool,
}

impl fmt::Debug for ChangeBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeBatch")
            .field("description", &self.description())
            .field("changes", &self.changes.len())
            .field("grouped", &self.grouped)
            .finish()
    }
}

impl ChangeBatch {
    pub(crate) fn new(metadata: Option<ChangeMetadata>) -> Self {
        Self {
            changes: Vec::new(),
            metadata,
            grouped: true,
        }
    }

    pub(crate) fn singleton(change: Change) -> Self {
        Self {
            changes: vec![change],
            metadata: None,
            grouped: false,
        }
    }

    pub(crate) fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub(crate) fn len(&self) -> usize {
        self.changes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Remove every accumulated change, keeping the label.
    pub(crate) fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }

    pub(crate) fn description(&self) -> &str {
        match (&self.metadata, self.changes.first()) {
            (Some(meta), _) => &meta.description,
            (None, Some(first)) => first.description(),
            (None, None) => ChangeMetadata::DEFAULT_DESCRIPTION,
        }
    }

    /// Only an idle singleton can be shallow; a group never is.
    pub(crate) fn is_shallow(&self) -> bool {
        !self.grouped && self.changes.iter().all(Change::is_shallow)
    }

    pub(crate) fn affects_selection(&self) -> bool {
        self.changes.iter().any(Change::affects_selection)
    }

    /// Replay forwards in recording order.
    pub(crate) fn apply_all(&mut self) {
        for change in &mut self.changes {
            change.apply();
        }
    }

    /// Replay inverses in reverse recording order.
    pub(crate) fn revert_all(&mut self) {
        revert_in_reverse(&mut self.changes);
    }
}

pub(crate) fn revert_in_reverse(changes: &mut [Change]) {
    for change in changes.iter_mut().rev() {
        change.revert();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn logging_change(log: &Rc<RefCell<Vec<String>>>, name: &str) -> Change {
        let (fwd, inv) = (Rc::clone(log), Rc::clone(log));
        let (fname, iname) = (format!("apply {name}"), format!("revert {name}"));
        Change::new(
            move || fwd.borrow_mut().push(fname.clone()),
            move || inv.borrow_mut().push(iname.clone()),
        )
        .with_description(name)
    }

    #[test]
    fn revert_runs_in_reverse_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut batch = ChangeBatch::new(None);
        batch.push(logging_change(&log, "a"));
        batch.push(logging_change(&log, "b"));
        batch.push(logging_change(&log, "c"));

        batch.revert_all();
        assert_eq!(*log.borrow(), vec!["revert c", "revert b", "revert a"]);
    }

    #[test]
    fn apply_runs_in_recording_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut batch = ChangeBatch::new(None);
        batch.push(logging_change(&log, "a"));
        batch.push(logging_change(&log, "b"));

        batch.apply_all();
        assert_eq!(*log.borrow(), vec!["apply a", "apply b"]);
    }

    #[test]
    fn description_prefers_group_label() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut named = ChangeBatch::new(Some(ChangeMetadata::new("Align")));
        named.push(logging_change(&log, "move"));
        assert_eq!(named.description(), "Align");

        let single = ChangeBatch::singleton(logging_change(&log, "move"));
        assert_eq!(single.description(), "move");

        let empty = ChangeBatch::new(None);
        assert_eq!(empty.description(), ChangeMetadata::DEFAULT_DESCRIPTION);
    }

    #[test]
    fn affects_selection_if_any_change_does() {
        let mut batch = ChangeBatch::new(None);
        batch.push(Change::new(|| {}, || {}));
        assert!(!batch.affects_selection());
        batch.push(Change::new(|| {}, || {}).affecting_selection(true));
        assert!(batch.affects_selection());
    }

    #[test]
    fn group_is_never_shallow() {
        let mut group = ChangeBatch::new(None);
        group.push(Change::new(|| {}, || {}).shallow(true));
        group.push(Change::new(|| {}, || {}).shallow(true));
        assert!(!group.is_shallow());

        assert!(ChangeBatch::singleton(Change::new(|| {}, || {}).shallow(true)).is_shallow());
        assert!(!ChangeBatch::singleton(Change::new(|| {}, || {})).is_shallow());
    }

    #[test]
    fn take_changes_empties_batch() {
        let mut batch = ChangeBatch::new(Some(ChangeMetadata::new("Align")));
        batch.push(Change::new(|| {}, || {}));
        assert_eq!(batch.take_changes().len(), 1);
        assert!(batch.is_empty());
        assert_eq!(batch.description(), "Align");
    }
}
