#![forbid(unsafe_code)]

//! Schema registry and top-level encode/decode entry points.
//!
//! The registry is the open set of types the codec understands. Hosts
//! register one [`Schema`] per domain type at startup; every entry point
//! resolves the target type here and fails with
//! [`CodecError::SchemaResolution`] when it is missing.
//!
//! # Null vs. wrong shape
//!
//! [`decode_value`](SchemaRegistry::decode_value) accepts an explicit `null`
//! and returns `Ok(None)`. Any other non-array value is rejected with
//! [`CodecError::MalformedInput`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::config::CodecConfig;
use crate::context::CodecContext;
use crate::error::{CodecError, CodecResult};
use crate::schema::Schema;

/// Mapping from domain type to its positional schema.
pub struct SchemaRegistry {
    schemas: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    names: HashMap<TypeId, &'static str>,
    config: CodecConfig,
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names.values().collect();
        names.sort();
        f.debug_struct("SchemaRegistry")
            .field("types", &names)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

impl SchemaRegistry {
    /// Create an empty registry with the given configuration.
    #[must_use]
    pub fn new(config: CodecConfig) -> Self {
        Self {
            schemas: HashMap::new(),
            names: HashMap::new(),
            config: config.validated(),
        }
    }

    /// Register `schema` for `T`, replacing any previous schema.
    pub fn register<T: 'static>(&mut self, schema: Schema<T>) -> &mut Self {
        let id = TypeId::of::<T>();
        let type_name = schema.type_name();
        if self.schemas.insert(id, Box::new(schema)).is_some() {
            debug!(target: "quill.codec", type_name, "schema replaced");
        }
        self.names.insert(id, type_name);
        self
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with<T: 'static>(mut self, schema: Schema<T>) -> Self {
        self.register(schema);
        self
    }

    /// Resolve the schema registered for `T`.
    pub fn schema<T: 'static>(&self) -> CodecResult<&Schema<T>> {
        self.schemas
            .get(&TypeId::of::<T>())
            .and_then(|schema| schema.downcast_ref::<Schema<T>>())
            .ok_or(CodecError::SchemaResolution {
                type_name: std::any::type_name::<T>(),
            })
    }

    /// Whether `T` has a registered schema.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.schemas.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Schema names of all registered types, sorted.
    #[must_use]
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.names.values().copied().collect();
        names.sort_unstable();
        names
    }

    /// Replace the configuration, keeping every registered schema.
    pub fn set_config(&mut self, config: CodecConfig) {
        self.config = config.validated();
    }

    /// Builder-style [`set_config`](Self::set_config).
    #[must_use]
    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    // ========================================================================
    // Encoding
    // ========================================================================

    /// Encode `value` as exactly one slot per schema entry, in ordinal order.
    pub fn encode<T: 'static>(&self, value: &T) -> CodecResult<Vec<Value>> {
        CodecContext::root(self).encode(value)
    }

    /// Encode `value` as a single array value.
    pub fn encode_value<T: 'static>(&self, value: &T) -> CodecResult<Value> {
        self.encode(value).map(Value::Array)
    }

    // ========================================================================
    // Decoding
    // ========================================================================

    /// Decode `slots` into an existing instance, updating it in place.
    ///
    /// The whole input is decoded before anything is written, so `target` is
    /// left unchanged when this returns an error.
    pub fn decode_into<T: 'static>(&self, slots: &[Value], target: &mut T) -> CodecResult<()> {
        CodecContext::root(self).decode_into(slots, target)
    }

    /// Decode `slots` into a fresh `T::default()`.
    pub fn decode_slots<T: Default + 'static>(&self, slots: &[Value]) -> CodecResult<T> {
        let mut target = T::default();
        self.decode_into(slots, &mut target)?;
        Ok(target)
    }

    /// Decode an array value into a fresh instance.
    ///
    /// Returns `Ok(None)` for an explicit `null`.
    pub fn decode_value<T: Default + 'static>(&self, input: &Value) -> CodecResult<Option<T>> {
        let mut target = T::default();
        if self.decode_value_into(input, &mut target)? {
            Ok(Some(target))
        } else {
            Ok(None)
        }
    }

    /// Decode an array value into an existing instance.
    ///
    /// Returns `Ok(false)` and leaves `target` untouched for an explicit
    /// `null`. On error `target` is also untouched.
    pub fn decode_value_into<T: 'static>(&self, input: &Value, target: &mut T) -> CodecResult<bool> {
        let schema = self.schema::<T>()?;
        match input {
            Value::Null => Ok(false),
            Value::Array(slots) => {
                self.decode_into(slots, target)?;
                Ok(true)
            }
            other => Err(CodecError::malformed(schema.type_name(), other)),
        }
    }
}
