#![deny(missing_docs)]
//! # roundtable-schema — declarative entity schemas
//!
//! Every roundtable entity (permissions, roles, speakers, messages and the
//! aggregates holding them) is loaded from and written back to loosely typed
//! documents. This crate is the one place that knows how.
//!
//! | Piece | Types | What it does |
//! |-------|-------|-------------|
//! | Wire data | [`Value`] | Any serde format reads into it and writes out of it |
//! | Field tables | [`SchemaTable`], [`FieldSpec`], [`Validator`] | Per-type metadata, built once |
//! | Conversion | [`Schema`], [`from_mapping`], [`to_mapping`], [`validate`] | Mapping ⇄ entity, recursively |
//! | Docs | [`describe`], [`Section`] | Field descriptions as a Markdown tree |
//! | Lookup | [`Registry`], [`Identity`] | Name-keyed tables over entity lists |
//!
//! Errors are a single [`SchemaError`] carrying a trail of the fields and
//! sequence positions between the document root and the failing value.

pub mod convert;
pub mod error;
pub mod field;
pub mod registry;
pub mod section;
pub mod value;

pub use convert::{FromValue, Fields, Schema, ToValue, describe, from_mapping, to_mapping, validate};
pub use error::{SchemaError, SchemaErrorKind, Segment};
pub use field::{FieldSpec, SchemaTable, Validator};
pub use registry::{Identity, Registry};
pub use section::Section;
pub use value::Value;
