#![forbid(unsafe_code)]

//! History errors.

use std::fmt;

/// Identifier of a change group, unique per store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) u64);

impl GroupId {
    /// Raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group #{}", self.0)
    }
}

/// Which stack a replay operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Replaying inverses.
    Undo,
    /// Replaying forwards.
    Redo,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undo => f.write_str("undo"),
            Self::Redo => f.write_str("redo"),
        }
    }
}

/// Errors reported by the undo store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// `begin_group` was called while another group is open.
    NestedGroup {
        /// The group that is still open.
        open_group: GroupId,
    },
    /// The group is no longer the store's open group.
    InvalidGroupState {
        /// The closed or abandoned group.
        group: GroupId,
    },
    /// Undo/redo was requested while a group is being recorded.
    GroupOpen {
        /// The group being recorded.
        open_group: GroupId,
    },
    /// Undo/redo was requested from inside a change being replayed.
    ReentrantReplay {
        /// The step that was requested.
        direction: Direction,
    },
    /// The requested stack is empty.
    EmptyHistory {
        /// The stack that was empty.
        direction: Direction,
    },
}

impl HistoryError {
    /// Returns true for "nothing to do" outcomes that callers may ignore.
    #[must_use]
    pub fn is_empty_history(&self) -> bool {
        matches!(self, Self::EmptyHistory { .. })
    }
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NestedGroup { open_group } => {
                write!(f, "cannot begin a group while {open_group} is open")
            }
            Self::InvalidGroupState { group } => write!(f, "{group} is not open"),
            Self::GroupOpen { open_group } => {
                write!(f, "cannot replay history while {open_group} is open")
            }
            Self::ReentrantReplay { direction } => {
                write!(f, "cannot {direction} while a replay is running")
            }
            Self::EmptyHistory { direction } => write!(f, "nothing to {direction}"),
        }
    }
}

impl std::error::Error for HistoryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let id = GroupId(3);
        assert_eq!(
            HistoryError::NestedGroup { open_group: id }.to_string(),
            "cannot begin a group while group #3 is open"
        );
        assert_eq!(
            HistoryError::InvalidGroupState { group: id }.to_string(),
            "group #3 is not open"
        );
        assert_eq!(
            HistoryError::EmptyHistory {
                direction: Direction::Redo
            }
            .to_string(),
            "nothing to redo"
        );
        assert_eq!(
            HistoryError::ReentrantReplay {
                direction: Direction::Undo
            }
            .to_string(),
            "cannot undo while a replay is running"
        );
    }

    #[test]
    fn empty_history_is_benign() {
        let err = HistoryError::EmptyHistory {
            direction: Direction::Undo,
        };
        assert!(err.is_empty_history());
        assert!(!HistoryError::GroupOpen { open_group: GroupId(1) }.is_empty_history());
    }
}
