//! # Type Classifier
//!
//! Maps a declared type shape to a schema fragment.
//!
//! Dispatch order: optional wrapper, fixed value set, well-known value type,
//! primitive, record, sequence, keyed mapping. Anything else is an error.
//! Named records and enums are never expanded inline: they are emitted as a
//! reference and handed back as [`NestedSchema`] for registration.

use crate::error::{AppError, AppResult};
use crate::parser::models::{ModelSet, ParsedAlias, ParsedModel, ParsedRecord};
use crate::parser::types::{Primitive, TypeShape};
use crate::schema::descriptors::{FieldDescriptor, FieldKind, JsonType};
use crate::schema::naming::sanitize_schema_name;
use std::collections::HashMap;

/// Deepest generic instantiation accepted before giving up on a type.
const MAX_INSTANTIATION_DEPTH: usize = 32;

/// A named schema discovered during classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedSchema {
    /// Component name the reference points at.
    pub name: String,
    /// The named type (with its type arguments) to derive.
    pub shape: TypeShape,
}

/// Result of classifying one type.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Nameless fragment carrying kind and format.
    pub descriptor: FieldDescriptor,
    /// Named schemas that must be registered for the references to resolve.
    pub nested: Vec<NestedSchema>,
}

/// Classifies type shapes against a model set.
pub struct TypeClassifier<'a> {
    models: &'a ModelSet,
}

impl<'a> TypeClassifier<'a> {
    /// Creates a classifier over `models`.
    pub fn new(models: &'a ModelSet) -> Self {
        Self { models }
    }

    /// The model set names are resolved against.
    pub fn models(&self) -> &'a ModelSet {
        self.models
    }

    /// Classifies `ty`.
    pub fn classify(&self, ty: &TypeShape) -> AppResult<Classification> {
        let mut nested = Vec::new();
        let mut aliases = Vec::new();
        let descriptor = self.classify_inner(ty, &mut nested, &mut aliases)?;
        Ok(Classification { descriptor, nested })
    }

    fn classify_inner(
        &self,
        ty: &TypeShape,
        nested: &mut Vec<NestedSchema>,
        aliases: &mut Vec<String>,
    ) -> AppResult<FieldDescriptor> {
        match ty {
            TypeShape::Optional(inner) => self.classify_inner(inner, nested, aliases),
            TypeShape::Named(name, args) => self.classify_named(ty, name, args, nested, aliases),
            TypeShape::WellKnown(well_known) => Ok(FieldDescriptor::item(
                FieldKind::Primitive(JsonType::String),
                Some(well_known.format().to_string()),
            )),
            TypeShape::Primitive(primitive) => Ok(classify_primitive(*primitive)),
            TypeShape::Sequence(element) => {
                let item = self.classify_inner(element, nested, aliases)?;
                Ok(FieldDescriptor::item(FieldKind::Array(Box::new(item)), None))
            }
            TypeShape::Map(key, value) => {
                let mut key_nested = Vec::new();
                let key_descriptor = self.classify_inner(key, &mut key_nested, aliases)?;
                if key_descriptor.kind != FieldKind::Primitive(JsonType::String) {
                    return Err(AppError::InvalidMapKey(format!(
                        "`{}` has non-text key `{}`",
                        ty, key
                    )));
                }
                let value = self.classify_inner(value, nested, aliases)?;
                Ok(FieldDescriptor::item(FieldKind::Map(Box::new(value)), None))
            }
            TypeShape::Anonymous(text) => Err(AppError::AnonymousType(format!(
                "`{}` has no name and cannot be referenced",
                text
            ))),
            TypeShape::Unsupported(text) => Err(AppError::UnsupportedShape(format!(
                "`{}` cannot be described",
                text
            ))),
        }
    }

    fn classify_named(
        &self,
        ty: &TypeShape,
        name: &str,
        args: &[TypeShape],
        nested: &mut Vec<NestedSchema>,
        aliases: &mut Vec<String>,
    ) -> AppResult<FieldDescriptor> {
        match self.models.get(name) {
            Some(ParsedModel::Enum(parsed)) => {
                nested.push(NestedSchema {
                    name: parsed.name.clone(),
                    shape: TypeShape::Named(parsed.name.clone(), Vec::new()),
                });
                Ok(FieldDescriptor::item(
                    FieldKind::EnumReference(parsed.name.clone()),
                    None,
                ))
            }
            Some(ParsedModel::Record(record)) => {
                let schema_name = record_schema_name(record, args)?;
                nested.push(NestedSchema {
                    name: schema_name.clone(),
                    shape: ty.clone(),
                });
                Ok(FieldDescriptor::item(FieldKind::Reference(schema_name), None))
            }
            Some(ParsedModel::Alias(alias)) => {
                if aliases.iter().any(|a| a == name) {
                    return Err(AppError::RecursiveType(format!(
                        "alias `{}` expands into itself",
                        name
                    )));
                }
                aliases.push(name.to_string());
                let target = expand_alias(alias, args)?;
                let result = self.classify_inner(&target, nested, aliases);
                aliases.pop();
                result
            }
            Some(ParsedModel::Opaque(opaque)) => Err(AppError::UnsupportedShape(format!(
                "`{}`: {}",
                opaque.name, opaque.reason
            ))),
            None => Err(AppError::UnsupportedShape(format!(
                "unknown type `{}`",
                ty
            ))),
        }
    }
}

/// OpenAPI type/format for a primitive.
fn classify_primitive(primitive: Primitive) -> FieldDescriptor {
    let (json_type, format) = match primitive {
        Primitive::I8 | Primitive::I16 | Primitive::Isize => (JsonType::Integer, None),
        Primitive::U8 | Primitive::U16 | Primitive::Usize => (JsonType::Integer, None),
        Primitive::I128 | Primitive::U128 => (JsonType::Integer, None),
        Primitive::I32 => (JsonType::Integer, Some("int32")),
        Primitive::I64 | Primitive::U32 | Primitive::U64 => (JsonType::Integer, Some("int64")),
        Primitive::F32 => (JsonType::Number, Some("float")),
        Primitive::F64 => (JsonType::Number, Some("double")),
        Primitive::Bool => (JsonType::Boolean, None),
        Primitive::Char | Primitive::String => (JsonType::String, None),
    };
    FieldDescriptor::item(FieldKind::Primitive(json_type), format.map(str::to_string))
}

/// Component name of a record instance: `Person`, `Page<User>` -> `Page_User`.
pub fn record_schema_name(record: &ParsedRecord, args: &[TypeShape]) -> AppResult<String> {
    check_arity(&record.name, &record.generics, args)?;
    if args.is_empty() {
        return Ok(record.name.clone());
    }
    let display = TypeShape::Named(record.name.clone(), args.to_vec()).to_string();
    if instantiation_depth(args) > MAX_INSTANTIATION_DEPTH {
        return Err(AppError::RecursiveType(format!(
            "`{}` instantiates without bound",
            record.name
        )));
    }
    Ok(sanitize_schema_name(&display))
}

/// Binds the generic parameters of a record or alias to concrete shapes.
pub fn generic_bindings(
    owner: &str,
    generics: &[String],
    args: &[TypeShape],
) -> AppResult<HashMap<String, TypeShape>> {
    check_arity(owner, generics, args)?;
    Ok(generics.iter().cloned().zip(args.iter().cloned()).collect())
}

/// Target of an alias with its type arguments substituted.
pub fn expand_alias(alias: &ParsedAlias, args: &[TypeShape]) -> AppResult<TypeShape> {
    let bindings = generic_bindings(&alias.name, &alias.generics, args)?;
    Ok(alias.target.substitute(&bindings))
}

fn check_arity(owner: &str, generics: &[String], args: &[TypeShape]) -> AppResult<()> {
    if generics.len() != args.len() {
        return Err(AppError::UnsupportedShape(format!(
            "`{}` expects {} type argument(s), got {}",
            owner,
            generics.len(),
            args.len()
        )));
    }
    Ok(())
}

fn instantiation_depth(args: &[TypeShape]) -> usize {
    args.iter().map(shape_depth).max().unwrap_or(0) + 1
}

fn shape_depth(shape: &TypeShape) -> usize {
    match shape {
        TypeShape::Named(_, args) => instantiation_depth(args),
        TypeShape::Optional(inner) | TypeShape::Sequence(inner) => shape_depth(inner) + 1,
        TypeShape::Map(key, value) => shape_depth(key).max(shape_depth(value)) + 1,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract_models;

    const MODELS: &str = r#"
        pub enum MyEnum { FOO, BAR }
        pub struct Addr { pub street: Vec<i32>, pub city: String }
        pub struct Page<T> { pub items: Vec<T>, pub total: i64 }
        pub type Addresses = Vec<Addr>;
        pub type Loop = Vec<Loop>;
        pub enum Shape { Circle(f64), Square(f64) }
    "#;

    fn classify(expr: &str) -> AppResult<Classification> {
        let models = extract_models(MODELS).unwrap();
        let classifier = TypeClassifier::new(&models);
        classifier.classify(&TypeShape::parse(expr).unwrap())
    }

    fn primitive(expr: &str) -> (FieldKind, Option<String>) {
        let c = classify(expr).unwrap();
        assert!(c.nested.is_empty());
        (c.descriptor.kind, c.descriptor.format)
    }

    #[test]
    fn test_primitive_formats() {
        let cases = vec![
            ("i8", JsonType::Integer, None),
            ("i16", JsonType::Integer, None),
            ("isize", JsonType::Integer, None),
            ("i32", JsonType::Integer, Some("int32")),
            ("i64", JsonType::Integer, Some("int64")),
            ("f32", JsonType::Number, Some("float")),
            ("f64", JsonType::Number, Some("double")),
            ("bool", JsonType::Boolean, None),
            ("String", JsonType::String, None),
            ("Uuid", JsonType::String, Some("uuid")),
            ("chrono::DateTime<Utc>", JsonType::String, Some("date-time")),
        ];
        for (expr, json_type, format) in cases {
            let (kind, actual) = primitive(expr);
            assert_eq!(kind, FieldKind::Primitive(json_type), "{}", expr);
            assert_eq!(actual.as_deref(), format, "{}", expr);
        }
    }

    #[test]
    fn test_optional_is_transparent() {
        let c = classify("Option<i64>").unwrap();
        assert_eq!(c.descriptor.kind, FieldKind::Primitive(JsonType::Integer));
        assert!(!c.descriptor.nullable);
    }

    #[test]
    fn test_enum_becomes_reference() {
        let c = classify("MyEnum").unwrap();
        assert_eq!(c.descriptor.kind, FieldKind::EnumReference("MyEnum".into()));
        assert_eq!(c.nested.len(), 1);
        assert_eq!(c.nested[0].name, "MyEnum");
    }

    #[test]
    fn test_sequence_of_records_and_primitives() {
        let c = classify("Vec<Addr>").unwrap();
        match &c.descriptor.kind {
            FieldKind::Array(item) => {
                assert_eq!(item.kind, FieldKind::Reference("Addr".into()))
            }
            other => panic!("Expected array, got {:?}", other),
        }
        assert_eq!(c.nested[0].name, "Addr");

        let c = classify("Vec<Uuid>").unwrap();
        match &c.descriptor.kind {
            FieldKind::Array(item) => {
                assert_eq!(item.kind, FieldKind::Primitive(JsonType::String));
                assert_eq!(item.format.as_deref(), Some("uuid"));
            }
            other => panic!("Expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_is_transparent() {
        let c = classify("Addresses").unwrap();
        assert!(matches!(c.descriptor.kind, FieldKind::Array(_)));
        assert_eq!(c.nested[0].name, "Addr");
    }

    #[test]
    fn test_generic_record_name() {
        let c = classify("Page<Addr>").unwrap();
        assert_eq!(c.descriptor.kind, FieldKind::Reference("Page_Addr".into()));
        assert_eq!(c.nested[0].shape.to_string(), "Page<Addr>");

        let err = classify("Page").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedShape(_)));
    }

    #[test]
    fn test_map_keys_must_be_text() {
        let c = classify("HashMap<String, Addr>").unwrap();
        match &c.descriptor.kind {
            FieldKind::Map(value) => {
                assert_eq!(value.kind, FieldKind::Reference("Addr".into()))
            }
            other => panic!("Expected map, got {:?}", other),
        }

        let err = classify("HashMap<i32, String>").unwrap_err();
        assert!(matches!(err, AppError::InvalidMapKey(_)));
    }

    #[test]
    fn test_unsupported_shapes() {
        assert!(matches!(
            classify("fn(i32)").unwrap_err(),
            AppError::UnsupportedShape(_)
        ));
        assert!(matches!(
            classify("std::sync::mpsc::Sender<i32>").unwrap_err(),
            AppError::UnsupportedShape(_)
        ));
        assert!(matches!(
            classify("Shape").unwrap_err(),
            AppError::UnsupportedShape(_)
        ));
        assert!(matches!(
            classify("(i32, i32)").unwrap_err(),
            AppError::AnonymousType(_)
        ));
    }

    #[test]
    fn test_alias_cycle_fails_closed() {
        assert!(matches!(
            classify("Loop").unwrap_err(),
            AppError::RecursiveType(_)
        ));
    }
}
