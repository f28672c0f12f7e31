#![forbid(unsafe_code)]

//! Positional field schemas.
//!
//! A [`Schema<T>`] is an explicit table mapping each field of `T` to an
//! ordinal slot in the encoded array. The table, not the struct declaration,
//! is authoritative: fields may be declared to the builder in any order and
//! the encoded layout follows ordinals.
//!
//! ```ignore
//! let schema = SchemaBuilder::<Point>::new("Point")
//!     .field(0, "name", |p| &p.name, |p| &mut p.name)
//!     .field(1, "x", |p| &p.x, |p| &mut p.x)
//!     .field(2, "y", |p| &p.y, |p| &mut p.y)
//!     .build()?;
//! ```
//!
//! # Invariants
//!
//! 1. Ordinals of a built schema are dense and start at 0.
//! 2. Field names are unique within a schema.
//! 3. `fields()` iterates in ordinal order.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::{Deserialize, DeserializeOwned};
use serde_json::Value;

use crate::context::CodecContext;
use crate::error::{CodecError, CodecResult};
use crate::slot::{Decoded, Patch, SlotCodec};

/// Reads one field of `T` into a single slot.
pub(crate) type EncodeFn<T> =
    Box<dyn Fn(&T, &CodecContext<'_>) -> CodecResult<Value> + Send + Sync>;

/// Reads one field of `T` from the front of the remaining slots and returns
/// the slots consumed plus the deferred write.
pub(crate) type DecodeFn<T> =
    Box<dyn Fn(&[Value], &CodecContext<'_>) -> CodecResult<Decoded<T>> + Send + Sync>;

/// One entry of a positional schema.
pub struct FieldSchema<T> {
    name: &'static str,
    ordinal: usize,
    nested: bool,
    pub(crate) encode: EncodeFn<T>,
    pub(crate) decode: DecodeFn<T>,
}

impl<T> FieldSchema<T> {
    /// Field name (diagnostics only; never written to the encoded form).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Zero-based slot position.
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Whether this entry delegates to a nested slot codec.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.nested
    }
}

impl<T> fmt::Debug for FieldSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSchema")
            .field("name", &self.name)
            .field("ordinal", &self.ordinal)
            .field("nested", &self.nested)
            .finish()
    }
}

/// Ordered field table for one domain type.
pub struct Schema<T> {
    type_name: &'static str,
    fields: Vec<FieldSchema<T>>,
}

impl<T: 'static> Schema<T> {
    /// Start building a schema named `type_name`.
    #[must_use]
    pub fn builder(type_name: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder::new(type_name)
    }
}

impl<T> Schema<T> {
    /// Name used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Number of slots an encoded instance occupies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field entries in ordinal order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSchema<T>> {
        self.fields.iter()
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in ordinal order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builder for [`Schema`].
///
/// Ordinals are supplied explicitly; [`build`](Self::build) sorts and
/// validates them.
pub struct SchemaBuilder<T> {
    type_name: &'static str,
    fields: Vec<FieldSchema<T>>,
}

impl<T> fmt::Debug for SchemaBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields.len())
            .finish()
    }
}

impl<T: 'static> SchemaBuilder<T> {
    /// Create an empty builder.
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
        }
    }

    /// Declare a plain field handled by the value serializer (serde).
    ///
    /// Encoding fails with [`CodecError::Serialize`] when the serializer
    /// emits a slot the field could not read back. Non-finite floats are the
    /// usual case: JSON has no spelling for them and they come out as `null`.
    #[must_use]
    pub fn field<F, G, M>(mut self, ordinal: usize, name: &'static str, get: G, get_mut: M) -> Self
    where
        F: Serialize + DeserializeOwned + 'static,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        let type_name = self.type_name;
        let encode: EncodeFn<T> = Box::new(move |value: &T, _cx: &CodecContext<'_>| {
            let serialize_error = |source| CodecError::Serialize {
                type_name,
                field: name,
                source,
            };
            let slot = serde_json::to_value(get(value)).map_err(serialize_error)?;
            if slot.is_null() {
                <F as Deserialize>::deserialize(&slot).map_err(serialize_error)?;
            }
            Ok(slot)
        });
        let get_mut = Arc::new(get_mut);
        let decode: DecodeFn<T> = Box::new(move |slots: &[Value], _cx: &CodecContext<'_>| {
            let Some(slot) = slots.first() else {
                return Ok(Decoded::keep(0));
            };
            let value = <F as Deserialize>::deserialize(slot).map_err(|source| {
                CodecError::InvalidValue {
                    type_name,
                    field: name,
                    ordinal,
                    source,
                }
            })?;
            let get_mut = Arc::clone(&get_mut);
            Ok(Decoded::new(
                1,
                Patch::new(move |target: &mut T| *get_mut(target) = value),
            ))
        });
        self.fields.push(FieldSchema {
            name,
            ordinal,
            nested: false,
            encode,
            decode,
        });
        self
    }

    /// Declare a field handled by a nested [`SlotCodec`].
    #[must_use]
    pub fn nested<F, C, G, M>(
        mut self,
        ordinal: usize,
        name: &'static str,
        codec: C,
        get: G,
        get_mut: M,
    ) -> Self
    where
        F: 'static,
        C: SlotCodec<F> + 'static,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        let codec = Arc::new(codec);
        let encode_codec = Arc::clone(&codec);
        let encode: EncodeFn<T> = Box::new(move |value: &T, cx: &CodecContext<'_>| {
            encode_codec.encode(get(value), cx)
        });
        let get_mut = Arc::new(get_mut);
        let decode: DecodeFn<T> = Box::new(move |slots: &[Value], cx: &CodecContext<'_>| {
            let Decoded { consumed, patch } = codec.decode(slots, cx)?;
            let get_mut = Arc::clone(&get_mut);
            Ok(Decoded::new(
                consumed,
                Patch::new(move |target: &mut T| patch.apply(get_mut(target))),
            ))
        });
        self.fields.push(FieldSchema {
            name,
            ordinal,
            nested: true,
            encode,
            decode,
        });
        self
    }

    /// Sort fields by ordinal and validate the table.
    ///
    /// Fails with [`CodecError::InvalidSchema`] on duplicate ordinals, gaps
    /// in the ordinal sequence, or duplicate field names.
    pub fn build(mut self) -> CodecResult<Schema<T>> {
        let type_name = self.type_name;
        self.fields.sort_by_key(|f| f.ordinal);

        for (expected, field) in self.fields.iter().enumerate() {
            if field.ordinal < expected {
                return Err(CodecError::InvalidSchema {
                    type_name,
                    reason: format!("duplicate ordinal {}", field.ordinal),
                });
            }
            if field.ordinal > expected {
                return Err(CodecError::InvalidSchema {
                    type_name,
                    reason: format!("ordinal {expected} is missing"),
                });
            }
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name) {
                return Err(CodecError::InvalidSchema {
                    type_name,
                    reason: format!("duplicate field name `{}`", field.name),
                });
            }
        }

        Ok(Schema {
            type_name,
            fields: self.fields,
        })
    }
}
