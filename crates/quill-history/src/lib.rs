#![forbid(unsafe_code)]

//! Grouped undo/redo history for Quill documents.
//!
//! Mutations to in-memory domain objects are recorded as [`Change`]s: a
//! forward/inverse closure pair for a mutation the caller already performed.
//! Changes recorded while a [`ChangeGroup`] is open form one undo step; a
//! change recorded with no open group is a step of its own.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        UndoStore                          │
//! │  ┌──────────────┐                    ┌──────────────┐     │
//! │  │ Undo Stack   │      undo()        │ Redo Stack   │     │
//! │  │  [group N]   │  ───────────────►  │  [group 1]   │     │
//! │  │  [group 2]   │                    │  [group 2]   │     │
//! │  │  [group 1]   │  ◄───────────────  │  [group N]   │     │
//! │  └──────────────┘      redo()        └──────────────┘     │
//! │         ▲                                                 │
//! │         │ commit (drop)                                   │
//! │  ┌──────────────┐                                         │
//! │  │ Open group   │ ◄── record(change)                      │
//! │  └──────────────┘                                         │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use quill_history::UndoStore;
//!
//! #[derive(Debug)]
//! struct Layer {
//!     name: String,
//!     visible: bool,
//! }
//!
//! let store = UndoStore::default();
//! let layer = Rc::new(RefCell::new(Layer { name: "A".into(), visible: true }));
//!
//! {
//!     let _group = store.begin_group_named("Hide and rename").unwrap();
//!     store.set_tracked("Hide", &layer, |l: &mut Layer| &mut l.visible, false);
//!     store.set_tracked("Rename", &layer, |l: &mut Layer| &mut l.name, "B".to_string());
//! }
//!
//! store.undo();
//! assert!(layer.borrow().visible);
//! assert_eq!(layer.borrow().name, "A");
//!
//! store.redo();
//! assert!(!layer.borrow().visible);
//! assert_eq!(layer.borrow().name, "B");
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`HistoryConfig`] and [`ChangeSource`].

mod batch;
pub mod change;
pub mod config;
pub mod error;
pub mod group;
pub mod store;

pub use change::{Change, ChangeMetadata, ChangeSource, ReplayFn};
pub use config::HistoryConfig;
pub use error::{Direction, GroupId, HistoryError};
pub use group::ChangeGroup;
pub use store::{StepReport, SuspendGuard, UndoStore};
