#![forbid(unsafe_code)]

//! Quill positional array codec.
//!
//! Encodes domain objects as flat, order-dependent arrays: each object becomes
//! the sequence of its declared fields in schema ordinal order instead of a
//! keyed map. Decoding is forward compatible: extra trailing slots written by
//! a newer schema are ignored, and missing trailing slots written by an older
//! one leave fields at their default (or existing) values. A document that
//! fails to decode leaves an existing target unchanged.
//!
//! # Key Components
//!
//! - [`Schema`] / [`SchemaBuilder`] - explicit field table per type
//! - [`SchemaRegistry`] - open set of registered types and the encode/decode entry points
//! - [`SlotCodec`] - nested codecs ([`SchemaCodec`], [`OptionCodec`], [`ListCodec`])
//! - [`CodecContext`] - recursion context handed to slot codecs
//! - [`text`] - JSON text helpers
//!
//! # Example
//!
//! ```
//! use quill_codec::{SchemaBuilder, SchemaRegistry};
//! use serde_json::json;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Point {
//!     name: String,
//!     x: f64,
//!     y: f64,
//! }
//!
//! let schema = SchemaBuilder::<Point>::new("Point")
//!     .field(0, "name", |p| &p.name, |p| &mut p.name)
//!     .field(1, "x", |p| &p.x, |p| &mut p.x)
//!     .field(2, "y", |p| &p.y, |p| &mut p.y)
//!     .build()
//!     .unwrap();
//! let registry = SchemaRegistry::default().with(schema);
//!
//! let point = Point { name: "A".into(), x: 1.0, y: 2.0 };
//! assert_eq!(registry.encode(&point).unwrap(), vec![json!("A"), json!(1.0), json!(2.0)]);
//!
//! let short: Point = registry.decode_slots(&[json!("A"), json!(1.0)]).unwrap();
//! assert_eq!(short.y, 0.0);
//! ```

mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod registry;
pub mod schema;
pub mod slot;
pub mod text;

pub use config::CodecConfig;
pub use context::CodecContext;
pub use error::{CodecError, CodecResult, value_kind};
pub use registry::SchemaRegistry;
pub use schema::{FieldSchema, Schema, SchemaBuilder};
pub use slot::{Decoded, ListCodec, OptionCodec, Patch, SchemaCodec, SlotCodec};
pub use text::{decode_from_str, decode_from_str_into, encode_to_string, encode_to_string_pretty};

/// Generic value type held in encoded slots.
pub use serde_json::Value;
