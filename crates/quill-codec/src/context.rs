#![forbid(unsafe_code)]

//! Recursion context threaded through nested encode/decode calls.

use serde_json::Value;

use crate::codec;
use crate::error::{CodecError, CodecResult};
use crate::registry::SchemaRegistry;
use crate::slot::Patch;

/// Registry handle plus current nesting depth.
///
/// Slot codecs receive a context so they can recurse into other registered
/// schemas while the depth limit from [`CodecConfig`](crate::CodecConfig)
/// stays enforced.
#[derive(Debug, Clone, Copy)]
pub struct CodecContext<'a> {
    registry: &'a SchemaRegistry,
    depth: usize,
}

impl<'a> CodecContext<'a> {
    pub(crate) fn root(registry: &'a SchemaRegistry) -> Self {
        Self { registry, depth: 0 }
    }

    /// The registry schemas are resolved from.
    #[must_use]
    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Number of schema levels entered so far (0 at the top level).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Encode `value` through its registered schema, one slot per field.
    pub fn encode<T: 'static>(&self, value: &T) -> CodecResult<Vec<Value>> {
        let schema = self.registry.schema::<T>()?;
        let cx = self.descend(schema.type_name())?;
        codec::encode_fields(schema, value, &cx)
    }

    /// Decode `slots` through the registered schema of `T` without writing
    /// anything yet.
    ///
    /// Slot codecs call this for nested values and fold the result into their
    /// own patch.
    pub fn decode_patch<T: 'static>(&self, slots: &[Value]) -> CodecResult<Patch<T>> {
        let schema = self.registry.schema::<T>()?;
        let cx = self.descend(schema.type_name())?;
        codec::decode_fields(schema, slots, &cx)
    }

    /// Decode `slots` into `target`. `target` is untouched on error.
    pub fn decode_into<T: 'static>(&self, slots: &[Value], target: &mut T) -> CodecResult<()> {
        self.decode_patch::<T>(slots)?.apply(target);
        Ok(())
    }

    /// Schema name of `T` if registered, otherwise the Rust type name.
    #[must_use]
    pub fn type_name_of<T: 'static>(&self) -> &'static str {
        self.registry
            .schema::<T>()
            .map_or_else(|_| std::any::type_name::<T>(), |s| s.type_name())
    }

    fn descend(&self, type_name: &'static str) -> CodecResult<Self> {
        let depth = self.depth + 1;
        let limit = self.registry.config().max_depth;
        if depth > limit {
            return Err(CodecError::DepthLimit { type_name, limit });
        }
        Ok(Self {
            registry: self.registry,
            depth,
        })
    }
}
