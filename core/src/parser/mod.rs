//! # Parser Module
//!
//! Handles parsing of Rust source code using `syn`.
//! Extracts records, fixed value sets, aliases, field annotations and doc comments.

pub mod attributes;
pub mod extractors;
pub mod models;
pub mod types;

pub use extractors::{extract_model_names, extract_models};
pub use models::{
    Extensions, ModelSet, OpaqueModel, ParsedAlias, ParsedEnum, ParsedField, ParsedModel,
    ParsedRecord,
};
pub use types::{Primitive, TypeShape, WellKnown};
