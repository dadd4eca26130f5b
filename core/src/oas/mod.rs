#![deny(missing_docs)]

//! # OpenAPI Output Module
//!
//! - **document**: Serde model of the emitted document.
//! - **render**: Conversion of derived schemas into document schemas.

pub mod document;
pub mod render;

pub use document::{
    AdditionalProperties, Components, Header, HttpMethod, Info, MediaType, OpenApi, Operation,
    ParamLocation, Parameter, PathItem, RefOr, Reference, RequestBody, Response, Schema,
    SecurityRequirement, SecurityScheme, Server, Tag, OPENAPI_VERSION,
};
pub use render::{parameter_ref, render_components, render_definition, render_field, schema_ref};
