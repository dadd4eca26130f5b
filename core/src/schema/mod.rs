//! # Schema Module
//!
//! Type-to-schema derivation: annotation parsing, type classification,
//! enum/extension resolution and the name-keyed schema registry.

pub mod annotation;
pub mod classifier;
pub mod descriptors;
pub mod naming;
pub mod registry;
pub mod resolvers;

pub use annotation::FieldAnnotation;
pub use classifier::{Classification, NestedSchema, TypeClassifier};
pub use descriptors::{FieldDescriptor, FieldKind, JsonType, SchemaDefinition, SchemaKind};
pub use registry::{SchemaDeriver, SchemaRegistry};
pub use resolvers::{FixedValueSet, VendorExtensions};
