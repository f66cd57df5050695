//! # vcp-schema — Schema Codec for the Veridian Credential Platform
//!
//! Bidirectional transformation between the internal schema model
//! (`vcp-core`) and the human-authorable JSON schema-definition format used
//! by editors and import pipelines.
//!
//! ## Components
//!
//! - [`FieldTypeRegistry`]: resolves human type names against the three
//!   ordered type tables and supplies the read-only fields injected per
//!   entity kind.
//! - [`ErrorContext`] / [`DecodeError`]: path-qualified diagnostics. Every
//!   decode failure names the exact offending node
//!   (`schema.fields[2].enum[0]`), so editors can highlight it.
//! - [`SchemaEncoder`]: `Schema` to authoring document. Total: a
//!   well-formed schema always encodes.
//! - [`SchemaDecoder`]: authoring document to `Schema`. Validates field
//!   types, requirement states, type-gated properties, field-name
//!   uniqueness, and condition predicates; fails fast with a located error.
//!
//! ## Concurrency
//!
//! The codec is synchronous and side-effect-free. Both directions only read
//! their inputs and allocate fresh outputs, so encoders and decoders are
//! freely shared across threads. The registry and the schema catalog must
//! simply stay immutable for the duration of a call.
//!
//! ## Round-trip guarantee
//!
//! For any well-formed schema, decoding its encoding (against the same
//! catalog) reproduces it exactly, modulo the injected read-only fields
//! that encoding omits and decoding re-adds.

pub mod context;
pub mod decode;
pub mod document;
pub mod encode;
pub mod registry;

// Re-export primary types for ergonomic imports.
pub use context::{DecodeError, DecodeResult, ErrorContext, ValueRule};
pub use decode::SchemaDecoder;
pub use document::{
    ClauseDocument, ConditionDocument, EnumDocument, FieldDocument, PredicateDocument,
    SchemaDocument,
};
pub use encode::SchemaEncoder;
pub use registry::{FieldTypeRegistry, TypeDescriptor};
