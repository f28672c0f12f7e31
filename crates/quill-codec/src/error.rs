#![forbid(unsafe_code)]

//! Error types for schema resolution and array decoding.
//!
//! Slot-count mismatches inside a well-formed array are never errors: a short
//! input keeps defaults for the missing trailing fields and a long input has
//! its unknown trailing slots ignored. Everything in [`CodecError`] is fatal
//! for the current encode/decode call and is surfaced to the caller unchanged.

use std::fmt;

use serde_json::Value;

/// Result of an encode or decode operation.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding positional arrays.
#[derive(Debug)]
pub enum CodecError {
    /// No schema is registered for the requested type.
    SchemaResolution {
        /// Rust type name of the unregistered type.
        type_name: &'static str,
    },
    /// An array was required but the input held another kind of value.
    MalformedInput {
        /// Schema name of the type being decoded.
        type_name: &'static str,
        /// Kind of the value that was found instead (`"object"`, `"string"`, ...).
        found: &'static str,
    },
    /// The value serializer rejected a slot.
    InvalidValue {
        /// Schema name of the type being decoded.
        type_name: &'static str,
        /// Field that owns the slot.
        field: &'static str,
        /// Ordinal of the slot.
        ordinal: usize,
        /// Underlying deserializer error.
        source: serde_json::Error,
    },
    /// The value serializer could not represent a field.
    Serialize {
        /// Schema name of the type being encoded.
        type_name: &'static str,
        /// Field that failed to serialize.
        field: &'static str,
        /// Underlying serializer error.
        source: serde_json::Error,
    },
    /// A schema definition is inconsistent (duplicate or missing ordinals).
    InvalidSchema {
        /// Schema name of the offending definition.
        type_name: &'static str,
        /// Human-readable reason.
        reason: String,
    },
    /// Nested values exceeded the configured nesting limit.
    DepthLimit {
        /// Schema name of the type at which the limit was hit.
        type_name: &'static str,
        /// Configured limit.
        limit: usize,
    },
    /// A nested slot codec reported an impossible slot count.
    StalledSlotCodec {
        /// Schema name of the parent type.
        type_name: &'static str,
        /// Field whose codec misreported.
        field: &'static str,
        /// Slots the codec claims to have consumed.
        consumed: usize,
        /// Slots that were available.
        remaining: usize,
    },
    /// Document text was not valid JSON.
    Json(serde_json::Error),
}

impl CodecError {
    /// Build a [`CodecError::MalformedInput`] describing `found`.
    #[must_use]
    pub fn malformed(type_name: &'static str, found: &Value) -> Self {
        Self::MalformedInput {
            type_name,
            found: value_kind(found),
        }
    }

    /// Returns true if this error came from an unregistered type.
    #[must_use]
    pub fn is_schema_resolution(&self) -> bool {
        matches!(self, Self::SchemaResolution { .. })
    }

    /// Returns true if this error came from wrongly shaped input.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaResolution { type_name } => {
                write!(f, "no schema registered for type `{type_name}`")
            }
            Self::MalformedInput { type_name, found } => {
                write!(f, "malformed input for `{type_name}`: expected array, found {found}")
            }
            Self::InvalidValue {
                type_name,
                field,
                ordinal,
                source,
            } => write!(
                f,
                "invalid value for `{type_name}.{field}` at slot {ordinal}: {source}"
            ),
            Self::Serialize {
                type_name,
                field,
                source,
            } => write!(f, "cannot serialize `{type_name}.{field}`: {source}"),
            Self::InvalidSchema { type_name, reason } => {
                write!(f, "invalid schema for `{type_name}`: {reason}")
            }
            Self::DepthLimit { type_name, limit } => {
                write!(f, "nesting limit {limit} exceeded at `{type_name}`")
            }
            Self::StalledSlotCodec {
                type_name,
                field,
                consumed,
                remaining,
            } => write!(
                f,
                "slot codec for `{type_name}.{field}` consumed {consumed} of {remaining} slots"
            ),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidValue { source, .. } | Self::Serialize { source, .. } => Some(source),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

/// Short name for the kind of a JSON value, used in error messages.
#[must_use]
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
