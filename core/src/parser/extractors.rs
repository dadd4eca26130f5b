//! # Extraction Logic
//!
//! High-level functions to parse Rust code into the model set.

use crate::error::{AppError, AppResult};
use crate::parser::attributes::extract_attributes;
use crate::parser::models::{
    ModelSet, OpaqueModel, ParsedAlias, ParsedEnum, ParsedField, ParsedModel, ParsedRecord,
};
use crate::parser::types::TypeShape;
use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::visit::{self, Visit};

/// Parses a Rust source file and collects every struct, enum and type alias.
pub fn extract_models(code: &str) -> AppResult<ModelSet> {
    let file = syn::parse_file(code)
        .map_err(|e| AppError::Parse(format!("Failed to parse Rust source: {}", e)))?;

    let mut collector = ModelCollector {
        models: ModelSet::new(),
        error: None,
    };
    collector.visit_file(&file);

    match collector.error {
        Some(err) => Err(err),
        None => Ok(collector.models),
    }
}

/// Extracts the names of all models defined in the provided Rust source code.
pub fn extract_model_names(code: &str) -> AppResult<Vec<String>> {
    let models = extract_models(code)?;
    Ok(models.iter().map(|m| m.name().to_string()).collect())
}

struct ModelCollector {
    models: ModelSet,
    error: Option<AppError>,
}

impl ModelCollector {
    fn record(&mut self, result: AppResult<ParsedModel>) {
        if self.error.is_some() {
            return;
        }
        match result {
            Ok(model) => self.models.insert(model),
            Err(err) => self.error = Some(err),
        }
    }
}

impl<'ast> Visit<'ast> for ModelCollector {
    fn visit_item_struct(&mut self, i: &'ast syn::ItemStruct) {
        self.record(parse_struct(i));
        visit::visit_item_struct(self, i);
    }

    fn visit_item_enum(&mut self, i: &'ast syn::ItemEnum) {
        self.record(parse_enum(i));
        visit::visit_item_enum(self, i);
    }

    fn visit_item_type(&mut self, i: &'ast syn::ItemType) {
        self.record(Ok(ParsedModel::Alias(ParsedAlias {
            name: i.ident.to_string(),
            generics: generic_names(&i.generics),
            target: TypeShape::from_syn(&i.ty),
        })));
        visit::visit_item_type(self, i);
    }
}

fn generic_names(generics: &syn::Generics) -> Vec<String> {
    generics
        .type_params()
        .map(|p| p.ident.to_string())
        .collect()
}

fn parse_struct(item: &syn::ItemStruct) -> AppResult<ParsedModel> {
    let name = item.ident.to_string();
    let attrs = extract_attributes(&item.attrs)?;

    match &item.fields {
        syn::Fields::Named(named) => {
            let mut fields = Vec::new();
            for field in &named.named {
                let Some(ident) = &field.ident else {
                    continue;
                };
                let field_attrs = extract_attributes(&field.attrs)?;
                let ident = ident.to_string();
                fields.push(ParsedField {
                    ident: ident.strip_prefix("r#").unwrap_or(&ident).to_string(),
                    ty: TypeShape::from_syn(&field.ty),
                    annotation: field_attrs.annotation,
                    rename: field_attrs.rename,
                    description: field_attrs.description,
                    extensions: field_attrs.extensions,
                    exported: !matches!(field.vis, syn::Visibility::Inherited),
                    skipped: field_attrs.is_skipped,
                });
            }
            Ok(ParsedModel::Record(ParsedRecord {
                name,
                generics: generic_names(&item.generics),
                fields,
                extensions: attrs.extensions,
            }))
        }
        syn::Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
            let inner = unnamed.unnamed.iter().next().map(|f| TypeShape::from_syn(&f.ty));
            match inner {
                Some(target) => Ok(ParsedModel::Alias(ParsedAlias {
                    name,
                    generics: generic_names(&item.generics),
                    target,
                })),
                None => Ok(opaque(name, "empty tuple struct")),
            }
        }
        syn::Fields::Unnamed(_) => Ok(opaque(name, "tuple struct with several fields")),
        syn::Fields::Unit => Ok(ParsedModel::Record(ParsedRecord {
            name,
            generics: generic_names(&item.generics),
            fields: Vec::new(),
            extensions: attrs.extensions,
        })),
    }
}

fn parse_enum(item: &syn::ItemEnum) -> AppResult<ParsedModel> {
    let name = item.ident.to_string();
    let attrs = extract_attributes(&item.attrs)?;

    let mut values = Vec::new();
    for variant in &item.variants {
        if !matches!(variant.fields, syn::Fields::Unit) {
            return Ok(opaque(
                name,
                &format!("variant '{}' carries data", variant.ident),
            ));
        }
        let variant_attrs = extract_attributes(&variant.attrs)?;
        if variant_attrs.is_skipped {
            continue;
        }
        let value = match variant_attrs.rename {
            Some(rename) => rename,
            None => apply_rename_rule(&variant.ident.to_string(), attrs.rename_all.as_deref()),
        };
        values.push(value);
    }

    Ok(ParsedModel::Enum(ParsedEnum {
        name,
        values,
        extensions: attrs.extensions,
    }))
}

/// Applies a serde `rename_all` rule to a variant name.
fn apply_rename_rule(variant: &str, rule: Option<&str>) -> String {
    match rule {
        Some("lowercase") => variant.to_lowercase(),
        Some("UPPERCASE") => variant.to_uppercase(),
        Some("snake_case") => variant.to_snake_case(),
        Some("SCREAMING_SNAKE_CASE") => variant.to_shouty_snake_case(),
        Some("kebab-case") => variant.to_kebab_case(),
        Some("SCREAMING-KEBAB-CASE") => variant.to_shouty_kebab_case(),
        Some("camelCase") => variant.to_lower_camel_case(),
        Some("PascalCase") => variant.to_upper_camel_case(),
        _ => variant.to_string(),
    }
}

fn opaque(name: String, reason: &str) -> ParsedModel {
    ParsedModel::Opaque(OpaqueModel {
        name,
        reason: reason.to_string(),
    })
}
