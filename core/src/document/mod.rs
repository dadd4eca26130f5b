//! # Document Module
//!
//! Declaration data, assembly into an OpenAPI document, manifest loading
//! and serialization.

pub mod assembler;
pub mod descriptors;
pub mod manifest;
pub mod writer;

pub use assembler::DocumentAssembler;
pub use descriptors::{
    DocumentModel, HeaderDescriptor, ParameterDescriptor, PathDescriptor, RequestBodyDescriptor,
    ResponseDescriptor, StatusCode, TagDescriptor,
};
pub use manifest::{load_manifest, parse_manifest};
pub use writer::{write_document, OutputFormat};
