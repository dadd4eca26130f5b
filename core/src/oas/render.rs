#![deny(missing_docs)]

//! # Schema Rendering
//!
//! Converts derived schema descriptors into document [`Schema`] objects.

use crate::oas::document::{AdditionalProperties, Schema};
use crate::schema::descriptors::{FieldDescriptor, FieldKind, SchemaDefinition, SchemaKind};
use crate::schema::registry::SchemaRegistry;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Component path prefix of schemas.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Component path prefix of parameters.
pub const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";

/// `#/components/schemas/<name>`.
pub fn schema_ref(name: &str) -> String {
    format!("{}{}", SCHEMA_REF_PREFIX, name)
}

/// `#/components/parameters/<name>`.
pub fn parameter_ref(name: &str) -> String {
    format!("{}{}", PARAMETER_REF_PREFIX, name)
}

/// Renders every registered schema, keyed by name.
pub fn render_components(registry: &SchemaRegistry) -> BTreeMap<String, Schema> {
    registry
        .iter()
        .map(|definition| (definition.name.clone(), render_definition(definition)))
        .collect()
}

/// Renders a named schema body.
pub fn render_definition(definition: &SchemaDefinition) -> Schema {
    let mut schema = match &definition.kind {
        SchemaKind::Object(fields) => {
            let mut schema = Schema::typed("object", None);
            for field in fields {
                if field.required {
                    schema.required.push(field.name.clone());
                }
                schema
                    .properties
                    .insert(field.name.clone(), render_field(field));
            }
            schema
        }
        SchemaKind::Array(element) => Schema {
            items: Some(Box::new(Schema::reference(schema_ref(element)))),
            ..Schema::typed("array", None)
        },
        SchemaKind::Enum(values) => Schema {
            enum_values: values.clone(),
            ..Schema::typed("string", None)
        },
    };
    schema.extensions = definition.extensions.clone();
    schema
}

/// Renders one property or element shape.
///
/// References are emitted bare: sibling keys next to `$ref` are ignored by
/// readers of the format.
pub fn render_field(field: &FieldDescriptor) -> Schema {
    let mut schema = match &field.kind {
        FieldKind::Reference(name) | FieldKind::EnumReference(name) => {
            return Schema::reference(schema_ref(name));
        }
        FieldKind::Primitive(json_type) => Schema::typed(json_type.to_string(), None),
        FieldKind::Array(item) => Schema {
            items: Some(Box::new(render_field(item))),
            ..Schema::typed("array", None)
        },
        FieldKind::Map(value) => Schema {
            additional_properties: Some(AdditionalProperties::Schema(Box::new(render_field(
                value,
            )))),
            ..Schema::typed("object", None)
        },
    };
    schema.format = field.format.clone();
    schema.description = field.description.clone();
    schema.nullable = field.nullable;
    schema.deprecated = field.deprecated;
    schema.default = field.default.clone();
    schema.minimum = field.minimum.and_then(bound);
    schema.maximum = field.maximum.and_then(bound);
    schema.extensions = field.extensions.clone();
    schema
}

/// Numeric bound as JSON; whole numbers are written without a fraction.
pub fn bound(value: f64) -> Option<Value> {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        return Some(Value::Number((value as i64).into()));
    }
    Number::from_f64(value).map(Value::Number)
}
