#![deny(missing_docs)]

//! # OapiGen Core
//!
//! Derives OpenAPI documents from statically declared Rust data models.
//!
//! Pipeline: Rust source -> [`ModelSet`] -> schema derivation ->
//! [`DocumentAssembler`] -> [`OpenApi`] -> YAML/JSON.

/// Shared error types.
pub mod error;

/// Rust source parsing into the model set.
pub mod parser;

/// Type-to-schema derivation.
pub mod schema;

/// Output document model.
pub mod oas;

/// Document declaration, assembly and serialization.
pub mod document;

pub use document::{
    load_manifest, parse_manifest, write_document, DocumentAssembler, DocumentModel,
    OutputFormat, ParameterDescriptor, PathDescriptor, ResponseDescriptor,
};
pub use error::{AppError, AppResult};
pub use oas::{OpenApi, Schema};
pub use parser::{extract_model_names, extract_models, ModelSet, TypeShape};
pub use schema::{SchemaDeriver, SchemaRegistry, TypeClassifier};
