//! # Schema Registry
//!
//! Name-keyed store of derived schemas plus the deriver that fills it.
//!
//! Derivation of one root type walks nested records and enums through a
//! worklist guarded by a visited set. Everything found is staged first and
//! committed only once the whole walk succeeded, so a failing derivation
//! leaves the registry exactly as it was.

use crate::error::{AppError, AppResult};
use crate::parser::models::{ModelSet, ParsedModel, ParsedRecord};
use crate::parser::types::TypeShape;
use crate::schema::annotation::FieldAnnotation;
use crate::schema::classifier::{
    expand_alias, generic_bindings, record_schema_name, NestedSchema, TypeClassifier,
};
use crate::schema::descriptors::{FieldDescriptor, SchemaDefinition};
use crate::schema::naming::{pluralize, property_name, sanitize_schema_name};
use crate::schema::resolvers::{merge_extensions, resolve_enum};
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};

/// Registered schemas of one document build.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, SchemaDefinition>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition. An existing one with the same name is replaced.
    pub fn register(&mut self, definition: SchemaDefinition) {
        let name = definition.name.clone();
        if self.schemas.insert(name.clone(), definition).is_some() {
            log::debug!("schema '{}' re-registered", name);
        } else {
            log::debug!("schema '{}' registered", name);
        }
    }

    /// Looks a schema up by name.
    pub fn get(&self, name: &str) -> Option<&SchemaDefinition> {
        self.schemas.get(name)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Number of schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Iterates definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaDefinition> {
        self.schemas.values()
    }
}

type Staged = IndexMap<String, SchemaDefinition>;

/// Derives schemas for root types and registers them.
pub struct SchemaDeriver<'a> {
    classifier: TypeClassifier<'a>,
}

impl<'a> SchemaDeriver<'a> {
    /// Creates a deriver over `models`.
    pub fn new(models: &'a ModelSet) -> Self {
        Self {
            classifier: TypeClassifier::new(models),
        }
    }

    /// Derives `root` and every schema it depends on, returning the root's
    /// component name.
    ///
    /// A sequence of records registers a pluralized array wrapper. An alias
    /// of such a sequence names the wrapper after the alias.
    pub fn derive_and_register(
        &self,
        root: &TypeShape,
        registry: &mut SchemaRegistry,
    ) -> AppResult<String> {
        let mut staged = Staged::new();
        let mut aliases = Vec::new();
        let name = self.derive_root(root, &mut staged, &mut aliases)?;
        commit(staged, registry);
        Ok(name)
    }

    /// Classifies a type used outside a record (parameters) and registers
    /// the schemas its references point at.
    pub fn classify_and_register(
        &self,
        ty: &TypeShape,
        registry: &mut SchemaRegistry,
    ) -> AppResult<FieldDescriptor> {
        let classification = self.classifier.classify(ty)?;
        let mut staged = Staged::new();
        self.drain(classification.nested, &mut staged)?;
        commit(staged, registry);
        Ok(classification.descriptor)
    }

    fn derive_root(
        &self,
        root: &TypeShape,
        staged: &mut Staged,
        aliases: &mut Vec<String>,
    ) -> AppResult<String> {
        match root {
            TypeShape::Optional(inner) => self.derive_root(inner, staged, aliases),
            TypeShape::Sequence(element) => {
                let element_name = self.derive_element(root, element, staged)?;
                let wrapper = pluralize(&element_name);
                staged.insert(
                    wrapper.clone(),
                    SchemaDefinition::array(wrapper.clone(), element_name),
                );
                Ok(wrapper)
            }
            TypeShape::Named(name, args) => match self.classifier.models().get(name) {
                Some(ParsedModel::Alias(alias)) => {
                    if aliases.iter().any(|a| a == name) {
                        return Err(AppError::RecursiveType(format!(
                            "alias `{}` expands into itself",
                            name
                        )));
                    }
                    aliases.push(name.clone());
                    let target = expand_alias(alias, args)?;
                    match strip_optional(&target) {
                        TypeShape::Sequence(element) => {
                            let element_name = self.derive_element(root, element, staged)?;
                            let wrapper = sanitize_schema_name(&root.to_string());
                            staged.insert(
                                wrapper.clone(),
                                SchemaDefinition::array(wrapper.clone(), element_name),
                            );
                            Ok(wrapper)
                        }
                        other => self.derive_root(other, staged, aliases),
                    }
                }
                _ => {
                    let classification = self.classifier.classify(root)?;
                    let name = classification
                        .descriptor
                        .reference()
                        .map(str::to_string)
                        .ok_or_else(|| {
                            AppError::UnsupportedShape(format!(
                                "root type `{}` is not a named record",
                                root
                            ))
                        })?;
                    self.drain(classification.nested, staged)?;
                    Ok(name)
                }
            },
            TypeShape::Anonymous(text) => Err(AppError::AnonymousType(format!(
                "root type `{}` has no name",
                text
            ))),
            other => Err(AppError::UnsupportedShape(format!(
                "root type `{}` is not a named record",
                other
            ))),
        }
    }

    /// Derives the element of a root sequence; it must be a named schema.
    fn derive_element(
        &self,
        root: &TypeShape,
        element: &TypeShape,
        staged: &mut Staged,
    ) -> AppResult<String> {
        let classification = self.classifier.classify(element)?;
        let name = match classification.descriptor.reference() {
            Some(name) => name.to_string(),
            None => {
                return Err(AppError::UnsupportedShape(format!(
                    "root type `{}` is a sequence of unnamed `{}`",
                    root, element
                )))
            }
        };
        self.drain(classification.nested, staged)?;
        Ok(name)
    }

    /// Derives every pending schema and whatever those in turn reference.
    fn drain(&self, pending: Vec<NestedSchema>, staged: &mut Staged) -> AppResult<()> {
        let mut queue: VecDeque<NestedSchema> = pending.into();
        let mut visited: HashSet<String> = staged.keys().cloned().collect();
        while let Some(next) = queue.pop_front() {
            if !visited.insert(next.name.clone()) {
                continue;
            }
            let (definition, discovered) = self.derive_named(&next)?;
            staged.insert(definition.name.clone(), definition);
            queue.extend(discovered);
        }
        Ok(())
    }

    fn derive_named(
        &self,
        nested: &NestedSchema,
    ) -> AppResult<(SchemaDefinition, Vec<NestedSchema>)> {
        let (name, args) = match &nested.shape {
            TypeShape::Named(name, args) => (name, args.as_slice()),
            other => {
                return Err(AppError::UnsupportedShape(format!(
                    "`{}` is not a named type",
                    other
                )))
            }
        };
        match self.classifier.models().get(name) {
            Some(ParsedModel::Enum(parsed)) => Ok((resolve_enum(parsed), Vec::new())),
            Some(ParsedModel::Record(record)) => self.derive_record(record, args),
            _ => Err(AppError::UnsupportedShape(format!(
                "`{}` is neither a record nor an enum",
                nested.shape
            ))),
        }
    }

    fn derive_record(
        &self,
        record: &ParsedRecord,
        args: &[TypeShape],
    ) -> AppResult<(SchemaDefinition, Vec<NestedSchema>)> {
        let bindings = generic_bindings(&record.name, &record.generics, args)?;
        let schema_name = record_schema_name(record, args)?;

        let mut fields = Vec::with_capacity(record.fields.len());
        let mut nested = Vec::new();
        let mut names = HashSet::new();
        for field in &record.fields {
            if !field.exported || field.skipped {
                log::debug!("{}.{} is not part of the schema", record.name, field.ident);
                continue;
            }
            let context = format!("{}.{}", record.name, field.ident);
            let ty = if bindings.is_empty() {
                field.ty.clone()
            } else {
                field.ty.substitute(&bindings)
            };
            let classification = self
                .classifier
                .classify(&ty)
                .map_err(|e| e.within(&context))?;

            let mut descriptor = classification.descriptor;
            descriptor.name = field
                .rename
                .clone()
                .unwrap_or_else(|| property_name(&field.ident));
            descriptor.description = field.description.clone();
            if let Some(raw) = &field.annotation {
                FieldAnnotation::parse(raw)
                    .map_err(|e| e.within(&context))?
                    .apply(&mut descriptor);
            }
            merge_extensions(&mut descriptor.extensions, field);

            if !names.insert(descriptor.name.clone()) {
                return Err(AppError::InvalidAnnotation(format!(
                    "{}: property '{}' declared twice",
                    context, descriptor.name
                )));
            }
            nested.extend(classification.nested);
            fields.push(descriptor);
        }

        let mut definition = SchemaDefinition::object(schema_name, fields);
        merge_extensions(&mut definition.extensions, record);
        Ok((definition, nested))
    }
}

fn strip_optional(shape: &TypeShape) -> &TypeShape {
    match shape {
        TypeShape::Optional(inner) => strip_optional(inner),
        other => other,
    }
}

fn commit(staged: Staged, registry: &mut SchemaRegistry) {
    for (_, definition) in staged {
        registry.register(definition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract_models;
    use crate::schema::descriptors::{FieldKind, JsonType, SchemaKind};
    use serde_json::json;

    const MODELS: &str = r##"
        pub enum MyEnum { FOO, BAR }

        /// A person.
        #[oapi_ext(r#"{"x-entity": "person"}"#)]
        pub struct Person {
            #[oapi("required:true")]
            pub Name: String,
            /// Age in years.
            #[oapi("min:0,max:150")]
            pub age: i32,
            #[serde(rename = "kind")]
            pub my_enum: MyEnum,
            #[oapi_ext(r#"{"x-go-type": "uuid.UUID"}"#)]
            pub id: Uuid,
            secret: String,
            #[serde(skip)]
            pub cache: String,
        }

        pub struct Page<T> { pub items: Vec<T>, pub total: i64 }

        pub struct Node {
            pub children: Vec<Node>,
            pub parent: Option<Box<Node>>,
        }

        pub struct Left { pub right: Option<Box<Right>> }
        pub struct Right { pub lefts: Vec<Left> }

        pub struct Broken {
            pub person: Person,
            pub tx: Sender<i32>,
        }

        pub struct Callback {
            pub on_done: fn(i32),
        }

        pub struct Clash {
            #[oapi("name:same")]
            pub a: String,
            #[serde(rename = "same")]
            pub b: String,
        }

        pub struct Cursor {
            #[serde(rename = "skip")]
            pub offset: i32,
            #[serde(skip)]
            pub token: String,
            pub limit: i32,
        }

        pub type Movies = Vec<Person>;
        pub type People = Vec<Person>;
    "##;

    fn derive(expr: &str, registry: &mut SchemaRegistry) -> AppResult<String> {
        let models = extract_models(MODELS).unwrap();
        let deriver = SchemaDeriver::new(&models);
        deriver.derive_and_register(&TypeShape::parse(expr).unwrap(), registry)
    }

    #[test]
    fn test_idempotent_naming() {
        let mut registry = SchemaRegistry::new();
        assert_eq!(derive("Person", &mut registry).unwrap(), "Person");
        let first = registry.get("Person").cloned();
        assert_eq!(derive("Person", &mut registry).unwrap(), "Person");

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("MyEnum"));
        assert_eq!(registry.get("Person").cloned(), first);
    }

    #[test]
    fn test_field_order_and_metadata() {
        let mut registry = SchemaRegistry::new();
        derive("Person", &mut registry).unwrap();
        let person = registry.get("Person").unwrap();

        let names: Vec<&str> = person.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "kind", "id"]);

        let name = &person.fields()[0];
        assert!(name.required);
        let age = &person.fields()[1];
        assert_eq!(age.format.as_deref(), Some("int32"));
        assert_eq!(age.minimum, Some(0.0));
        assert_eq!(age.maximum, Some(150.0));
        assert_eq!(age.description.as_deref(), Some("Age in years."));

        let kind = &person.fields()[2];
        assert_eq!(kind.kind, FieldKind::EnumReference("MyEnum".into()));

        let id = &person.fields()[3];
        assert_eq!(id.kind, FieldKind::Primitive(JsonType::String));
        assert_eq!(id.format.as_deref(), Some("uuid"));
        assert_eq!(id.extensions.get("x-go-type"), Some(&json!("uuid.UUID")));
        assert!(id.extensions.get("x-entity").is_none());

        assert_eq!(person.extensions.get("x-entity"), Some(&json!("person")));
        assert!(person.extensions.get("x-go-type").is_none());
    }

    #[test]
    fn test_array_of_record_naming() {
        let mut registry = SchemaRegistry::new();
        assert_eq!(derive("Vec<Person>", &mut registry).unwrap(), "Persons");
        assert_eq!(
            registry.get("Persons").unwrap().kind,
            SchemaKind::Array("Person".into())
        );
        assert!(registry.contains("Person"));
        assert!(registry.contains("MyEnum"));
    }

    #[test]
    fn test_alias_names_the_wrapper() {
        let mut registry = SchemaRegistry::new();
        assert_eq!(derive("Movies", &mut registry).unwrap(), "Movies");
        assert_eq!(derive("People", &mut registry).unwrap(), "People");
        assert_eq!(
            registry.get("Movies").unwrap().kind,
            SchemaKind::Array("Person".into())
        );
        assert!(registry.contains("Person"));
    }

    #[test]
    fn test_generic_instantiation() {
        let mut registry = SchemaRegistry::new();
        assert_eq!(derive("Page<Person>", &mut registry).unwrap(), "Page_Person");
        let page = registry.get("Page_Person").unwrap();
        match &page.fields()[0].kind {
            FieldKind::Array(item) => {
                assert_eq!(item.kind, FieldKind::Reference("Person".into()))
            }
            other => panic!("Expected array, got {:?}", other),
        }
        assert!(registry.contains("Person"));
    }

    #[test]
    fn test_fail_fast_leaves_registry_untouched() {
        let mut registry = SchemaRegistry::new();
        let err = derive("Broken", &mut registry).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedShape(_)));
        assert!(err.to_string().contains("Broken.tx"));
        assert!(registry.is_empty());

        let err = derive("Callback", &mut registry).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedShape(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_self_and_mutual_recursion_terminate() {
        let mut registry = SchemaRegistry::new();
        derive("Node", &mut registry).unwrap();
        assert_eq!(registry.len(), 1);
        let node = registry.get("Node").unwrap();
        assert_eq!(
            node.fields()[1].kind,
            FieldKind::Reference("Node".into())
        );

        derive("Left", &mut registry).unwrap();
        assert!(registry.contains("Left"));
        assert!(registry.contains("Right"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_field_renamed_to_skip_is_kept() {
        let mut registry = SchemaRegistry::new();
        derive("Cursor", &mut registry).unwrap();

        let names: Vec<&str> = registry
            .get("Cursor")
            .unwrap()
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["skip", "limit"]);
    }

    #[test]
    fn test_duplicate_property_names_rejected() {
        let mut registry = SchemaRegistry::new();
        let err = derive("Clash", &mut registry).unwrap_err();
        assert!(matches!(err, AppError::InvalidAnnotation(_)));
    }

    #[test]
    fn test_unnamed_roots_rejected() {
        let mut registry = SchemaRegistry::new();
        assert!(matches!(
            derive("(i32, String)", &mut registry).unwrap_err(),
            AppError::AnonymousType(_)
        ));
        assert!(matches!(
            derive("i64", &mut registry).unwrap_err(),
            AppError::UnsupportedShape(_)
        ));
        assert!(matches!(
            derive("Vec<i64>", &mut registry).unwrap_err(),
            AppError::UnsupportedShape(_)
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_enum_root() {
        let mut registry = SchemaRegistry::new();
        assert_eq!(derive("Option<MyEnum>", &mut registry).unwrap(), "MyEnum");
        assert_eq!(
            registry.get("MyEnum").unwrap().kind,
            SchemaKind::Enum(vec![json!("FOO"), json!("BAR")])
        );
    }
}
