#![forbid(unsafe_code)]

//! Quill public facade crate.
//!
//! Quill is the persistence and history layer of an editor: domain objects
//! are stored as compact positional arrays ([`quill_codec`]) and edits to
//! them are grouped into undoable steps ([`quill_history`]). This crate
//! re-exports both, adds a workspace-wide [`QuillConfig`], and ties one
//! document's registry and history together in a [`Session`].
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use quill::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct Layer {
//!     name: String,
//!     visible: bool,
//! }
//!
//! let registry = SchemaRegistry::default().with(
//!     SchemaBuilder::<Layer>::new("Layer")
//!         .field(0, "name", |l| &l.name, |l| &mut l.name)
//!         .field(1, "visible", |l| &l.visible, |l| &mut l.visible)
//!         .build()
//!         .unwrap(),
//! );
//! let session = Session::new(registry);
//!
//! let layer: Layer = session.load_str(r#"["A", true]"#).unwrap().unwrap();
//! let layer = Rc::new(RefCell::new(layer));
//! assert!(!session.store().can_undo());
//!
//! session.store().set_tracked("Rename", &layer, |l: &mut Layer| &mut l.name, "B".to_string());
//! assert_eq!(session.save_to_string(&*layer.borrow()).unwrap(), r#"["B",true]"#);
//! ```

use std::fmt;

pub mod config;
pub mod session;

pub use config::{ConfigError, QuillConfig};
pub use session::Session;

// --- Codec re-exports ------------------------------------------------------

pub use quill_codec::{
    CodecConfig, CodecContext, CodecError, CodecResult, Decoded, ListCodec, OptionCodec, Patch,
    Schema, SchemaBuilder, SchemaCodec, SchemaRegistry, SlotCodec, Value,
};

// --- History re-exports ----------------------------------------------------

pub use quill_history::{
    Change, ChangeGroup, ChangeMetadata, ChangeSource, Direction, GroupId, HistoryConfig,
    HistoryError, StepReport, SuspendGuard, UndoStore,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Quill hosts.
#[derive(Debug)]
pub enum Error {
    /// Encoding or decoding failed.
    Codec(CodecError),
    /// History misuse.
    History(HistoryError),
    /// Configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(err) => write!(f, "{err}"),
            Self::History(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(err) => Some(err),
            Self::History(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<CodecError> for Error {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

impl From<HistoryError> for Error {
    fn from(err: HistoryError) -> Self {
        Self::History(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for Quill APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Change, ChangeGroup, Error, HistoryConfig, ListCodec, OptionCodec, QuillConfig, Result,
        SchemaBuilder, SchemaCodec, SchemaRegistry, Session, UndoStore, Value,
    };

    pub use crate::{codec, history};
}

pub use quill_codec as codec;
pub use quill_history as history;
