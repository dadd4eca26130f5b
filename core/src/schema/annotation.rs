//! # Field Annotations
//!
//! Parses the `key:value,key:value` micro-syntax carried by `#[oapi("...")]`.
//!
//! Recognized keys: `name`, `format`, `description`, `deprecated`, `default`,
//! `min`, `max`, `required`, `nullable`. Unknown keys are ignored.

use crate::error::{AppError, AppResult};
use crate::schema::descriptors::FieldDescriptor;
use serde_json::{Number, Value};

/// The recognized options of one annotation string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldAnnotation {
    /// Property name override.
    pub name: Option<String>,
    /// Format override.
    pub format: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Presence-only flag.
    pub deprecated: bool,
    /// Type-inferred default literal.
    pub default: Option<Value>,
    /// Lower bound; dropped when not a number.
    pub minimum: Option<f64>,
    /// Upper bound; dropped when not a number.
    pub maximum: Option<f64>,
    /// `required:true`.
    pub required: bool,
    /// `nullable:true`.
    pub nullable: bool,
}

impl FieldAnnotation {
    /// Parses a raw annotation string.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let options: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .collect();
        if options.is_empty() {
            return Err(AppError::InvalidAnnotation(format!(
                "empty option list in '{}'",
                raw
            )));
        }

        let mut annotation = Self::default();
        for option in options {
            let (key, value) = match option.split_once(':') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (option, ""),
            };
            if key.is_empty() {
                return Err(AppError::InvalidAnnotation(format!(
                    "option '{}' has no key in '{}'",
                    option, raw
                )));
            }
            match key {
                "name" => annotation.name = Some(value.to_string()),
                "format" => annotation.format = Some(value.to_string()),
                "description" => annotation.description = Some(value.to_string()),
                "deprecated" => annotation.deprecated = true,
                "default" => annotation.default = Some(infer_literal(value)),
                "min" => annotation.minimum = value.parse::<f64>().ok(),
                "max" => annotation.maximum = value.parse::<f64>().ok(),
                "required" => annotation.required = value == "true",
                "nullable" => annotation.nullable = value == "true",
                _ => log::debug!("ignoring unknown annotation key '{}'", key),
            }
        }
        Ok(annotation)
    }

    /// Copies the annotation metadata onto a classified descriptor.
    ///
    /// A declared `format` wins over the one implied by the type.
    pub fn apply(self, descriptor: &mut FieldDescriptor) {
        if let Some(name) = self.name {
            descriptor.name = name;
        }
        if self.format.is_some() {
            descriptor.format = self.format;
        }
        if self.description.is_some() {
            descriptor.description = self.description;
        }
        descriptor.deprecated |= self.deprecated;
        descriptor.required |= self.required;
        descriptor.nullable |= self.nullable;
        if self.default.is_some() {
            descriptor.default = self.default;
        }
        if self.minimum.is_some() {
            descriptor.minimum = self.minimum;
        }
        if self.maximum.is_some() {
            descriptor.maximum = self.maximum;
        }
    }
}

/// boolean -> integer -> floating-point -> string; first successful parse wins.
///
/// Booleans accept `1 t T TRUE true True` and `0 f F FALSE false False`,
/// so `default:1` is `true`.
pub fn infer_literal(value: &str) -> Value {
    if let Some(b) = parse_bool(value) {
        return Value::Bool(b);
    }
    if let Ok(i) = value.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Some(n) = value.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(value.to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
