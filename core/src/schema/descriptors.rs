//! # Schema Descriptors
//!
//! The normalized schema graph produced by derivation, independent of the
//! output document model.

use crate::parser::models::Extensions;
use serde_json::Value;
use std::fmt::{self, Display};

/// OpenAPI scalar `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
}

impl Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonType::String => write!(f, "string"),
            JsonType::Integer => write!(f, "integer"),
            JsonType::Number => write!(f, "number"),
            JsonType::Boolean => write!(f, "boolean"),
        }
    }
}

impl JsonType {
    /// Parses a declared scalar type name (`"integer"`, `"string"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(JsonType::String),
            "integer" => Some(JsonType::Integer),
            "number" => Some(JsonType::Number),
            "boolean" => Some(JsonType::Boolean),
            _ => None,
        }
    }
}

/// Shape of one field after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Inline scalar.
    Primitive(JsonType),
    /// Reference to a named object or array schema.
    Reference(String),
    /// Reference to a named enum schema.
    EnumReference(String),
    /// Array of the nested element shape.
    Array(Box<FieldDescriptor>),
    /// Object with `additionalProperties` of the nested value shape.
    Map(Box<FieldDescriptor>),
}

/// A property of an object schema, or the element/value shape of a
/// collection (in which case `name` is empty).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Property name, unique within the owning record.
    pub name: String,
    /// Classified shape.
    pub kind: FieldKind,
    /// Format refinement (`int64`, `uuid`, `date-time`, ...).
    pub format: Option<String>,
    /// Listed in the owner's `required` array.
    pub required: bool,
    /// Emits `nullable: true`.
    pub nullable: bool,
    /// Emits `deprecated: true`.
    pub deprecated: bool,
    /// Human readable description.
    pub description: Option<String>,
    /// Default literal.
    pub default: Option<Value>,
    /// Inclusive lower bound.
    pub minimum: Option<f64>,
    /// Inclusive upper bound.
    pub maximum: Option<f64>,
    /// Field-level vendor extensions.
    pub extensions: Extensions,
}

impl FieldDescriptor {
    /// A bare descriptor of the given kind, without any metadata.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            format: None,
            required: false,
            nullable: false,
            deprecated: false,
            description: None,
            default: None,
            minimum: None,
            maximum: None,
            extensions: Extensions::new(),
        }
    }

    /// Nameless element/value descriptor.
    pub fn item(kind: FieldKind, format: Option<String>) -> Self {
        Self {
            format,
            ..Self::new(String::new(), kind)
        }
    }

    /// The referenced schema name, if this descriptor points at a component.
    pub fn reference(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Reference(name) | FieldKind::EnumReference(name) => Some(name),
            _ => None,
        }
    }
}

/// Body of a named schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// Properties in declaration order.
    Object(Vec<FieldDescriptor>),
    /// Array whose items reference the named element schema.
    Array(String),
    /// Fixed ordered list of allowed literals.
    Enum(Vec<Value>),
}

/// A named, registered schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefinition {
    /// Component key; the sole identity of the schema.
    pub name: String,
    /// Body.
    pub kind: SchemaKind,
    /// Type-level vendor extensions.
    pub extensions: Extensions,
}

impl SchemaDefinition {
    /// Object schema.
    pub fn object(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            kind: SchemaKind::Object(fields),
            extensions: Extensions::new(),
        }
    }

    /// Array wrapper schema.
    pub fn array(name: impl Into<String>, items: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SchemaKind::Array(items.into()),
            extensions: Extensions::new(),
        }
    }

    /// Enum schema.
    pub fn enumeration(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind: SchemaKind::Enum(values),
            extensions: Extensions::new(),
        }
    }

    /// Object properties, empty for arrays and enums.
    pub fn fields(&self) -> &[FieldDescriptor] {
        match &self.kind {
            SchemaKind::Object(fields) => fields,
            _ => &[],
        }
    }
}
