#![forbid(unsafe_code)]

//! JSON text helpers for hosts that store documents as text.

use serde_json::Value;

use crate::error::{CodecError, CodecResult};
use crate::registry::SchemaRegistry;

/// Encode `value` and render it as compact JSON text.
pub fn encode_to_string<T: 'static>(registry: &SchemaRegistry, value: &T) -> CodecResult<String> {
    let encoded = registry.encode_value(value)?;
    serde_json::to_string(&encoded).map_err(CodecError::Json)
}

/// Encode `value` and render it as indented JSON text.
pub fn encode_to_string_pretty<T: 'static>(
    registry: &SchemaRegistry,
    value: &T,
) -> CodecResult<String> {
    let encoded = registry.encode_value(value)?;
    serde_json::to_string_pretty(&encoded).map_err(CodecError::Json)
}

/// Parse JSON text and decode it into a fresh instance.
///
/// The text `null` decodes to `Ok(None)`.
pub fn decode_from_str<T: Default + 'static>(
    registry: &SchemaRegistry,
    text: &str,
) -> CodecResult<Option<T>> {
    let value: Value = serde_json::from_str(text).map_err(CodecError::Json)?;
    registry.decode_value(&value)
}

/// Parse JSON text and decode it into `target` in place.
///
/// Returns `Ok(false)` when the text is `null`.
pub fn decode_from_str_into<T: 'static>(
    registry: &SchemaRegistry,
    text: &str,
    target: &mut T,
) -> CodecResult<bool> {
    let value: Value = serde_json::from_str(text).map_err(CodecError::Json)?;
    registry.decode_value_into(&value, target)
}
