#![forbid(unsafe_code)]

//! Nested slot codecs.
//!
//! A schema entry declared with [`SchemaBuilder::nested`](crate::SchemaBuilder::nested)
//! hands its slot(s) to a [`SlotCodec`] instead of the value serializer.
//! Encoding always produces exactly one slot per entry. Decoding reports how
//! many input slots were consumed, so a codec that understands an older,
//! wider layout can swallow several slots while the parent stays in lockstep.
//!
//! Built-in codecs:
//!
//! | Codec | Field type | Slot shape |
//! |-------|------------|------------|
//! | [`SchemaCodec`] | `F` (registered) | nested array, `null` keeps the current value |
//! | [`OptionCodec`] | `Option<F>` | nested array or `null` |
//! | [`ListCodec`] | `Vec<F>` | array of nested arrays, `null` clears |

use std::fmt;

use serde_json::Value;

use crate::context::CodecContext;
use crate::error::{CodecError, CodecResult};

/// Deferred write into a decode target.
///
/// Decoding reads the whole input before touching the target: every entry
/// yields a patch, and the patches run only after the last slot decoded. A
/// rejected document therefore leaves the target exactly as it was.
pub struct Patch<F>(Box<dyn FnOnce(&mut F)>);

impl<F> Patch<F> {
    /// Wrap a write.
    #[must_use]
    pub fn new(write: impl FnOnce(&mut F) + 'static) -> Self {
        Self(Box::new(write))
    }

    /// A patch that leaves the target unchanged.
    #[must_use]
    pub fn keep() -> Self {
        Self::new(|_: &mut F| {})
    }

    /// Run the write against `target`.
    pub fn apply(self, target: &mut F) {
        (self.0)(target);
    }
}

impl<F> fmt::Debug for Patch<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Patch")
    }
}

/// Outcome of decoding one schema entry.
#[derive(Debug)]
pub struct Decoded<F> {
    /// Input slots the entry occupied.
    pub consumed: usize,
    /// Write to perform once the whole document decoded.
    pub patch: Patch<F>,
}

impl<F> Decoded<F> {
    /// `consumed` slots that write `patch`.
    #[must_use]
    pub fn new(consumed: usize, patch: Patch<F>) -> Self {
        Self { consumed, patch }
    }

    /// `consumed` slots that leave the target unchanged.
    #[must_use]
    pub fn keep(consumed: usize) -> Self {
        Self::new(consumed, Patch::keep())
    }
}

/// Codec for one schema entry that is not a plain serde value.
pub trait SlotCodec<F>: Send + Sync {
    /// Encode `value` into a single slot.
    fn encode(&self, value: &F, cx: &CodecContext<'_>) -> CodecResult<Value>;

    /// Decode from the front of `slots`.
    ///
    /// `slots` is never empty when called by the schema walker. The returned
    /// `consumed` must be at least 1 and at most `slots.len()`. Nothing may
    /// be written until the returned patch is applied.
    fn decode(&self, slots: &[Value], cx: &CodecContext<'_>) -> CodecResult<Decoded<F>>;
}

/// Nested value of a registered type, encoded as its own positional array.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCodec;

impl<F: 'static> SlotCodec<F> for SchemaCodec {
    fn encode(&self, value: &F, cx: &CodecContext<'_>) -> CodecResult<Value> {
        cx.encode(value).map(Value::Array)
    }

    fn decode(&self, slots: &[Value], cx: &CodecContext<'_>) -> CodecResult<Decoded<F>> {
        match slots.first() {
            None => Ok(Decoded::keep(0)),
            Some(Value::Null) => Ok(Decoded::keep(1)),
            Some(Value::Array(items)) => Ok(Decoded::new(1, cx.decode_patch::<F>(items)?)),
            Some(other) => Err(CodecError::malformed(cx.type_name_of::<F>(), other)),
        }
    }
}

/// Optional nested value; `None` is encoded as `null`.
///
/// Decoding into an existing `Some` updates it in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionCodec;

impl<F: Default + 'static> SlotCodec<Option<F>> for OptionCodec {
    fn encode(&self, value: &Option<F>, cx: &CodecContext<'_>) -> CodecResult<Value> {
        match value {
            Some(inner) => cx.encode(inner).map(Value::Array),
            None => Ok(Value::Null),
        }
    }

    fn decode(&self, slots: &[Value], cx: &CodecContext<'_>) -> CodecResult<Decoded<Option<F>>> {
        match slots.first() {
            None => Ok(Decoded::keep(0)),
            Some(Value::Null) => Ok(Decoded::new(
                1,
                Patch::new(|target: &mut Option<F>| *target = None),
            )),
            Some(Value::Array(items)) => {
                let inner = cx.decode_patch::<F>(items)?;
                Ok(Decoded::new(
                    1,
                    Patch::new(move |target: &mut Option<F>| {
                        inner.apply(target.get_or_insert_with(F::default));
                    }),
                ))
            }
            Some(other) => Err(CodecError::malformed(cx.type_name_of::<F>(), other)),
        }
    }
}

/// List of nested values, encoded as an array of positional arrays.
///
/// Existing elements are updated in place by index; surplus elements are
/// truncated and missing ones are appended from `F::default()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCodec;

impl<F: Default + 'static> SlotCodec<Vec<F>> for ListCodec {
    fn encode(&self, value: &Vec<F>, cx: &CodecContext<'_>) -> CodecResult<Value> {
        value
            .iter()
            .map(|item| cx.encode(item).map(Value::Array))
            .collect::<CodecResult<Vec<_>>>()
            .map(Value::Array)
    }

    fn decode(&self, slots: &[Value], cx: &CodecContext<'_>) -> CodecResult<Decoded<Vec<F>>> {
        let items = match slots.first() {
            None => return Ok(Decoded::keep(0)),
            Some(Value::Null) => {
                return Ok(Decoded::new(1, Patch::new(|target: &mut Vec<F>| target.clear())));
            }
            Some(Value::Array(items)) => items,
            Some(other) => return Err(CodecError::malformed("list", other)),
        };

        let patches = items
            .iter()
            .map(|item| match item {
                Value::Array(fields) => cx.decode_patch::<F>(fields),
                other => Err(CodecError::malformed(cx.type_name_of::<F>(), other)),
            })
            .collect::<CodecResult<Vec<_>>>()?;

        Ok(Decoded::new(
            1,
            Patch::new(move |target: &mut Vec<F>| {
                target.truncate(patches.len());
                for (index, patch) in patches.into_iter().enumerate() {
                    if let Some(existing) = target.get_mut(index) {
                        patch.apply(existing);
                    } else {
                        let mut fresh = F::default();
                        patch.apply(&mut fresh);
                        target.push(fresh);
                    }
                }
            }),
        ))
    }
}
