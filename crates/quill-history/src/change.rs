#![forbid(unsafe_code)]

//! Tracked mutations.
//!
//! A [`Change`] is the ledger entry for a mutation the caller has already
//! performed. It carries a forward closure (replayed on redo) and an inverse
//! closure (replayed on undo), plus the flags hosts use to decide how to
//! refresh after a replay.
//!
//! # Invariants
//!
//! - Creating a `Change` never runs either closure.
//! - Once recorded, the change is owned by the store; the caller cannot
//!   replay it a second time.

use std::fmt;

use web_time::Instant;

/// Who or what triggered a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChangeSource {
    /// Direct user edit.
    #[default]
    User,
    /// Application code acting on the user's behalf.
    Programmatic,
    /// Script or macro playback.
    Macro,
    /// Another process or collaborator.
    External,
}

/// Description and provenance of a change or group.
#[derive(Debug, Clone)]
pub struct ChangeMetadata {
    /// Human-readable label for menus (e.g. "Rename layer").
    pub description: String,
    /// When the change was created.
    pub timestamp: Instant,
    /// Who/what triggered the change.
    pub source: ChangeSource,
}

impl ChangeMetadata {
    /// Label used when none was supplied.
    pub const DEFAULT_DESCRIPTION: &'static str = "Edit";

    /// Create metadata with the given description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            timestamp: Instant::now(),
            source: ChangeSource::User,
        }
    }

    /// Set the source.
    #[must_use]
    pub fn with_source(mut self, source: ChangeSource) -> Self {
        self.source = source;
        self
    }
}

impl Default for ChangeMetadata {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DESCRIPTION)
    }
}

/// Replay closure stored by a change.
pub type ReplayFn = Box<dyn FnMut()>;

/// Smallest unit of tracked mutation.
pub struct Change {
    forward: ReplayFn,
    inverse: ReplayFn,
    affects_selection: bool,
    shallow: bool,
    metadata: ChangeMetadata,
}

impl fmt::Debug for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Change")
            .field("description", &self.metadata.description)
            .field("affects_selection", &self.affects_selection)
            .field("shallow", &self.shallow)
            .finish()
    }
}

impl Change {
    /// Create a change from a forward/inverse closure pair.
    ///
    /// The mutation itself must already have been performed; neither closure
    /// runs here.
    #[must_use]
    pub fn new(forward: impl FnMut() + 'static, inverse: impl FnMut() + 'static) -> Self {
        Self {
            forward: Box::new(forward),
            inverse: Box::new(inverse),
            affects_selection: false,
            shallow: false,
            metadata: ChangeMetadata::default(),
        }
    }

    /// Create a change with both flags given up front.
    #[must_use]
    pub fn create(
        mutate: impl FnMut() + 'static,
        invert: impl FnMut() + 'static,
        affects_selection: bool,
        is_shallow: bool,
    ) -> Self {
        Self::new(mutate, invert)
            .affecting_selection(affects_selection)
            .shallow(is_shallow)
    }

    /// Mark whether replaying this change alters the current selection.
    #[must_use]
    pub fn affecting_selection(mut self, affects: bool) -> Self {
        self.affects_selection = affects;
        self
    }

    /// Mark the change as standalone rather than one step of a larger edit.
    #[must_use]
    pub fn shallow(mut self, shallow: bool) -> Self {
        self.shallow = shallow;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = description.into();
        self
    }

    /// Replace the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: ChangeMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Whether replaying this change alters the current selection.
    #[must_use]
    pub fn affects_selection(&self) -> bool {
        self.affects_selection
    }

    /// Whether this change is standalone.
    #[must_use]
    pub fn is_shallow(&self) -> bool {
        self.shallow
    }

    /// Metadata for UI display.
    #[must_use]
    pub fn metadata(&self) -> &ChangeMetadata {
        &self.metadata
    }

    /// Description for UI display.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    /// Replay the mutation forward.
    pub fn apply(&mut self) {
        (self.forward)();
    }

    pub(crate) fn revert(&mut self) {
        (self.inverse)();
    }
}
