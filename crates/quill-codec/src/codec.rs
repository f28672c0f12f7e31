#![forbid(unsafe_code)]

//! Schema walker shared by every encode/decode entry point.
//!
//! # Decoding
//!
//! ```text
//! schema:  [ name | x   | y   ]
//! input:   [ "A"  | 1.0 ]             -> y keeps its current value
//! input:   [ "A"  | 1.0 | 2.0 | "z" ] -> "z" is ignored
//! ```
//!
//! Entries are visited in ordinal order while a cursor advances through the
//! input by however many slots each entry consumed. The walk stops when the
//! input runs out or when every entry has been visited.
//!
//! The walk only collects [`Patch`]es. They are applied after it finishes,
//! so a document that fails anywhere writes nothing.

use serde_json::Value;
use tracing::{debug, debug_span, trace};

use crate::context::CodecContext;
use crate::error::{CodecError, CodecResult};
use crate::schema::Schema;
use crate::slot::{Decoded, Patch};

pub(crate) fn encode_fields<T>(
    schema: &Schema<T>,
    value: &T,
    cx: &CodecContext<'_>,
) -> CodecResult<Vec<Value>> {
    let _span = debug_span!(
        target: "quill.codec",
        "codec.encode",
        type_name = schema.type_name(),
        slots = schema.len(),
        depth = cx.depth(),
    )
    .entered();

    schema
        .fields()
        .map(|field| (field.encode)(value, cx))
        .collect()
}

pub(crate) fn decode_fields<T: 'static>(
    schema: &Schema<T>,
    slots: &[Value],
    cx: &CodecContext<'_>,
) -> CodecResult<Patch<T>> {
    let _span = debug_span!(
        target: "quill.codec",
        "codec.decode",
        type_name = schema.type_name(),
        slots = slots.len(),
        depth = cx.depth(),
    )
    .entered();

    let mut cursor = 0;
    let mut patches = Vec::with_capacity(schema.len());
    for field in schema.fields() {
        let remaining = &slots[cursor..];
        if remaining.is_empty() {
            break;
        }

        let Decoded { consumed, patch } = (field.decode)(remaining, cx)?;
        if consumed == 0 || consumed > remaining.len() {
            return Err(CodecError::StalledSlotCodec {
                type_name: schema.type_name(),
                field: field.name(),
                consumed,
                remaining: remaining.len(),
            });
        }
        if field.is_nested() {
            trace!(
                target: "quill.codec",
                field = field.name(),
                ordinal = field.ordinal(),
                consumed,
                "nested slot decoded"
            );
        }
        cursor += consumed;
        patches.push(patch);
    }

    if patches.len() < schema.len() {
        debug!(
            target: "quill.codec",
            type_name = schema.type_name(),
            missing = schema.len() - patches.len(),
            "input ended early; remaining fields keep their values"
        );
    }
    if cursor < slots.len() {
        debug!(
            target: "quill.codec",
            type_name = schema.type_name(),
            ignored = slots.len() - cursor,
            "ignored trailing slots"
        );
    }
    Ok(Patch::new(move |target: &mut T| {
        for patch in patches {
            patch.apply(target);
        }
    }))
}
