//! # Attribute Operations
//!
//! internal logic for parsing `#[serde(...)]`, `#[oapi(...)]`, `#[oapi_ext(...)]`
//! and doc attributes.

use crate::error::{AppError, AppResult};
use crate::parser::models::Extensions;
use syn::meta::ParseNestedMeta;
use syn::{LitStr, Token};

/// Helper struct for attributes extracted from a single item or field.
#[derive(Default, Debug)]
pub struct AttrInfo {
    /// The serde rename value if present.
    pub rename: Option<String>,
    /// The serde `rename_all` rule if present (enums).
    pub rename_all: Option<String>,
    /// Whether the skip flag was found.
    pub is_skipped: bool,
    /// Raw `#[oapi("...")]` annotation string.
    pub annotation: Option<String>,
    /// Merged `#[oapi_ext(...)]` objects.
    pub extensions: Extensions,
    /// Joined `///` doc lines.
    pub description: Option<String>,
}

/// Analyzes attributes on a node to find `serde`, `oapi`, `oapi_ext` and doc
/// configurations.
pub fn extract_attributes(attrs: &[syn::Attribute]) -> AppResult<AttrInfo> {
    let mut info = AttrInfo::default();
    let mut doc_lines = Vec::new();

    for attr in attrs {
        let path = attr.path();
        if path.is_ident("serde") {
            if let Err(e) = parse_serde_meta(attr, &mut info) {
                log::debug!("ignoring unreadable #[serde] attribute: {}", e);
            }
        } else if path.is_ident("oapi") {
            let lit: syn::LitStr = attr.parse_args().map_err(|e| {
                AppError::InvalidAnnotation(format!("#[oapi] expects a string literal: {}", e))
            })?;
            info.annotation = Some(lit.value());
        } else if path.is_ident("oapi_ext") {
            let lit: syn::LitStr = attr.parse_args().map_err(|e| {
                AppError::InvalidAnnotation(format!("#[oapi_ext] expects a string literal: {}", e))
            })?;
            let parsed: Extensions = serde_json::from_str(&lit.value()).map_err(|e| {
                AppError::InvalidAnnotation(format!(
                    "#[oapi_ext] must hold a JSON object, got '{}': {}",
                    lit.value(),
                    e
                ))
            })?;
            info.extensions.extend(parsed);
        } else if path.is_ident("doc") {
            if let Some(line) = doc_line(&attr.meta) {
                doc_lines.push(line);
            }
        }
    }

    if !doc_lines.is_empty() {
        let joined = doc_lines.join("\n").trim().to_string();
        if !joined.is_empty() {
            info.description = Some(joined);
        }
    }

    Ok(info)
}

fn doc_line(meta: &syn::Meta) -> Option<String> {
    match meta {
        syn::Meta::NameValue(nv) => match &nv.value {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(s),
                ..
            }) => Some(s.value().trim().to_string()),
            _ => None,
        },
        _ => None,
    }
}

/// Reads `rename`, `rename_all` and `skip` out of one `#[serde(...)]`.
fn parse_serde_meta(attr: &syn::Attribute, info: &mut AttrInfo) -> syn::Result<()> {
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("rename") {
            if let Some(name) = rename_value(&meta)? {
                info.rename = Some(name);
            }
        } else if meta.path.is_ident("rename_all") {
            if let Some(rule) = rename_value(&meta)? {
                info.rename_all = Some(rule);
            }
        } else if meta.path.is_ident("skip") {
            info.is_skipped = true;
        } else {
            skip_meta_value(&meta)?;
        }
        Ok(())
    })
}

/// `key = "v"`, or `key(serialize = "v", deserialize = "w")` where the
/// serialized form is the one that reaches the document.
fn rename_value(meta: &ParseNestedMeta) -> syn::Result<Option<String>> {
    if meta.input.peek(Token![=]) {
        let lit: LitStr = meta.value()?.parse()?;
        return Ok(Some(lit.value()));
    }

    let mut serialized = None;
    if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("serialize") {
                let lit: LitStr = inner.value()?.parse()?;
                serialized = Some(lit.value());
            } else {
                skip_meta_value(&inner)?;
            }
            Ok(())
        })?;
    }
    Ok(serialized)
}

/// Consumes the value of a serde option we do not interpret.
fn skip_meta_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta_value(&inner))?;
    }
    Ok(())
}
