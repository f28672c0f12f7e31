#![forbid(unsafe_code)]

//! Scoped change groups.
//!
//! A [`ChangeGroup`] is the guard returned by
//! [`UndoStore::begin_group`](crate::UndoStore::begin_group). While it is
//! open, every change recorded on the store is appended to it. Closing the
//! group (explicitly, or by dropping the guard on any exit path including
//! unwinding) pushes it onto the undo stack if it holds at least one change
//! and discards it otherwise.
//!
//! ```ignore
//! {
//!     let _group = store.begin_group_named("Hide and rename")?;
//!     store.set_tracked("Hide", &layer, |l: &mut Layer| &mut l.visible, false);
//!     store.set_tracked("Rename", &layer, |l: &mut Layer| &mut l.name, "B".into());
//! } // one undo step
//! ```

use std::fmt;

use tracing::debug;

use crate::batch::revert_in_reverse;
use crate::error::{GroupId, HistoryError};
use crate::store::UndoStore;

/// Guard for the store's open change group.
#[must_use = "dropping a ChangeGroup closes it immediately"]
pub struct ChangeGroup {
    store: UndoStore,
    id: GroupId,
    closed: bool,
}

impl fmt::Debug for ChangeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeGroup")
            .field("id", &self.id)
            .field("open", &self.is_open())
            .field("len", &self.len())
            .finish()
    }
}

impl ChangeGroup {
    pub(crate) fn new(store: UndoStore, id: GroupId) -> Self {
        Self {
            store,
            id,
            closed: false,
        }
    }

    /// Identifier of this group.
    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Whether this group is still the store's open group.
    ///
    /// False after [`UndoStore::clear`](crate::UndoStore::clear) abandoned it.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.closed && self.store.group_len(self.id).is_some()
    }

    /// Number of changes accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.group_len(self.id).unwrap_or(0)
    }

    /// Whether no changes have been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard the accumulated changes without closing the group and
    /// without touching history. The domain objects are left as they are.
    pub fn reset(&self) -> Result<(), HistoryError> {
        let discarded = self.store.take_group_changes(self.id)?;
        debug!(
            target: "quill.history",
            group = %self.id,
            discarded = discarded.len(),
            "change group reset"
        );
        drop(discarded);
        Ok(())
    }

    /// Replay the inverses of the accumulated changes (newest first), then
    /// discard them. The group stays open.
    pub fn rollback(&self) -> Result<(), HistoryError> {
        let mut changes = self.store.take_group_changes(self.id)?;
        {
            let _replay = self.store.replay_guard();
            revert_in_reverse(&mut changes);
        }
        debug!(
            target: "quill.history",
            group = %self.id,
            reverted = changes.len(),
            "change group rolled back"
        );
        Ok(())
    }

    /// Close the group now. Returns true if it was pushed onto the undo stack.
    pub fn commit(mut self) -> bool {
        self.closed = true;
        self.store.close_group(self.id, true)
    }

    /// Close the group without recording it. Accumulated changes are dropped
    /// and the domain objects are left as they are.
    pub fn discard(mut self) {
        self.closed = true;
        self.store.close_group(self.id, false);
    }
}

impl Drop for ChangeGroup {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            self.store.close_group(self.id, true);
        }
    }
}
