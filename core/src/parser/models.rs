//! # Data Models
//!
//! Intermediate Representation (IR) of the model set extracted from Rust code.

use crate::parser::types::TypeShape;
use indexmap::IndexMap;
use serde_json::Value;

/// Vendor-extension metadata, kept in declaration order.
pub type Extensions = IndexMap<String, Value>;

/// A field extracted from a record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedField {
    /// The Rust identifier (without any `r#` prefix).
    pub ident: String,
    /// Declared type.
    pub ty: TypeShape,
    /// Raw `#[oapi("...")]` annotation string, if present.
    pub annotation: Option<String>,
    /// `#[serde(rename = "...")]` override.
    pub rename: Option<String>,
    /// Extracted doc comments (if any).
    pub description: Option<String>,
    /// `#[oapi_ext(...)]` metadata.
    pub extensions: Extensions,
    /// Whether the field is visible outside its module.
    pub exported: bool,
    /// Whether the field is marked `#[serde(skip)]`.
    pub skipped: bool,
}

/// A struct with named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    /// The struct name.
    pub name: String,
    /// Type parameter names in declaration order.
    pub generics: Vec<String>,
    /// Fields in declaration order.
    pub fields: Vec<ParsedField>,
    /// Record-level `#[oapi_ext(...)]` metadata.
    pub extensions: Extensions,
}

/// A unit-only enum: a fixed value set.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEnum {
    /// Enum name.
    pub name: String,
    /// Wire values in declaration order.
    pub values: Vec<String>,
    /// Enum-level `#[oapi_ext(...)]` metadata.
    pub extensions: Extensions,
}

/// `type X = ...;` or a newtype tuple struct.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAlias {
    /// Alias name.
    pub name: String,
    /// Type parameter names in declaration order.
    pub generics: Vec<String>,
    /// The aliased type.
    pub target: TypeShape,
}

/// A named item that exists but cannot be described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueModel {
    /// Item name.
    pub name: String,
    /// Why it cannot be described.
    pub reason: String,
}

/// One named item of the model set.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedModel {
    /// A record definition.
    Record(ParsedRecord),
    /// A fixed value set.
    Enum(ParsedEnum),
    /// A transparent alias.
    Alias(ParsedAlias),
    /// Data enums, multi-field tuple structs.
    Opaque(OpaqueModel),
}

impl ParsedModel {
    /// Returns the name of the model.
    pub fn name(&self) -> &str {
        match self {
            ParsedModel::Record(r) => &r.name,
            ParsedModel::Enum(e) => &e.name,
            ParsedModel::Alias(a) => &a.name,
            ParsedModel::Opaque(o) => &o.name,
        }
    }
}

/// Every model known at derivation time, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ModelSet {
    models: IndexMap<String, ParsedModel>,
}

impl ModelSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a model. A model with the same name is replaced.
    pub fn insert(&mut self, model: ParsedModel) {
        let name = model.name().to_string();
        if self.models.insert(name.clone(), model).is_some() {
            log::warn!("model '{}' declared more than once, keeping the last one", name);
        }
    }

    /// Moves every model of `other` into this set.
    pub fn extend(&mut self, other: ModelSet) {
        for (_, model) in other.models {
            self.insert(model);
        }
    }

    /// Looks a model up by name.
    pub fn get(&self, name: &str) -> Option<&ParsedModel> {
        self.models.get(name)
    }

    /// Number of models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Iterates models in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ParsedModel> {
        self.models.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque(name: &str, reason: &str) -> ParsedModel {
        ParsedModel::Opaque(OpaqueModel {
            name: name.into(),
            reason: reason.into(),
        })
    }

    #[test]
    fn test_last_definition_wins() {
        let mut set = ModelSet::new();
        set.insert(opaque("Thing", "first"));
        set.insert(opaque("Thing", "second"));

        assert_eq!(set.len(), 1);
        match set.get("Thing") {
            Some(ParsedModel::Opaque(o)) => assert_eq!(o.reason, "second"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_extend_keeps_order() {
        let mut left = ModelSet::new();
        left.insert(opaque("A", ""));
        let mut right = ModelSet::new();
        right.insert(opaque("B", ""));
        right.insert(opaque("C", ""));

        left.extend(right);
        let names: Vec<&str> = left.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
