#![forbid(unsafe_code)]

//! One open document: schema registry plus undo history.
//!
//! Loading a document replaces whatever the user was editing, so a load
//! decodes with recording suspended and then clears the history. Saving only
//! reads the document and never touches history.

use std::sync::Arc;

use quill_codec::{SchemaRegistry, Value};
use quill_history::{HistoryConfig, HistoryError, UndoStore};
use tracing::info;

use crate::Result;
use crate::config::QuillConfig;

/// Persistence and history for one document.
#[derive(Debug, Clone)]
pub struct Session {
    registry: Arc<SchemaRegistry>,
    store: UndoStore,
}

impl Session {
    /// Create a session with default history limits.
    #[must_use]
    pub fn new(registry: impl Into<Arc<SchemaRegistry>>) -> Self {
        Self::with_history(registry, HistoryConfig::default())
    }

    /// Create a session with explicit history limits.
    #[must_use]
    pub fn with_history(registry: impl Into<Arc<SchemaRegistry>>, history: HistoryConfig) -> Self {
        Self {
            registry: registry.into(),
            store: UndoStore::new(history),
        }
    }

    /// Create a session from a loaded [`QuillConfig`].
    ///
    /// The codec section replaces the registry's configuration and the
    /// history section sizes the undo store.
    #[must_use]
    pub fn with_config(registry: SchemaRegistry, config: &QuillConfig) -> Self {
        Self::with_history(registry.with_config(config.codec), config.history)
    }

    /// The schema registry documents are encoded with.
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// The document's undo history.
    #[must_use]
    pub fn store(&self) -> &UndoStore {
        &self.store
    }

    // ========================================================================
    // Saving
    // ========================================================================

    /// Encode `document` as an array value.
    pub fn save<T: 'static>(&self, document: &T) -> Result<Value> {
        Ok(self.registry.encode_value(document)?)
    }

    /// Encode `document` as compact JSON text.
    pub fn save_to_string<T: 'static>(&self, document: &T) -> Result<String> {
        Ok(quill_codec::encode_to_string(&self.registry, document)?)
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Decode `input` into a fresh document and start a clean history.
    ///
    /// Returns `Ok(None)` for an explicit `null`.
    pub fn load<T: Default + 'static>(&self, input: &Value) -> Result<Option<T>> {
        let mut document = T::default();
        let loaded = self.load_into(input, &mut document)?;
        Ok(loaded.then_some(document))
    }

    /// Decode `input` into an existing document and start a clean history.
    ///
    /// Fails without touching anything if a change group is open or if the
    /// document is rejected; history and `target` are only replaced by a
    /// load that succeeds.
    pub fn load_into<T: 'static>(&self, input: &Value, target: &mut T) -> Result<bool> {
        if let Some(open_group) = self.store.open_group() {
            return Err(HistoryError::GroupOpen { open_group }.into());
        }

        let loaded = {
            let _quiet = self.store.suspend();
            self.registry.decode_value_into(input, target)?
        };
        self.store.clear();

        info!(
            target: "quill.session",
            type_name = std::any::type_name::<T>(),
            loaded,
            "document loaded"
        );
        Ok(loaded)
    }

    /// Parse JSON text into a fresh document and start a clean history.
    pub fn load_str<T: Default + 'static>(&self, text: &str) -> Result<Option<T>> {
        let value: Value =
            serde_json::from_str(text).map_err(quill_codec::CodecError::Json)?;
        self.load(&value)
    }
}
