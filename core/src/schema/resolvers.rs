//! # Enumeration & Extension Resolvers
//!
//! Capability traits checked once per model: a fixed value set turns into an
//! enum schema, vendor-extension metadata is merged verbatim.

use crate::parser::models::{Extensions, ParsedEnum, ParsedField, ParsedRecord};
use crate::schema::descriptors::SchemaDefinition;
use serde_json::Value;

/// A type whose legal values are an explicit, ordered literal list.
pub trait FixedValueSet {
    /// Schema name of the value set.
    fn value_set_name(&self) -> &str;

    /// Allowed literals, in documentation order.
    fn allowed_values(&self) -> Vec<Value>;
}

/// A record, enum or field carrying `x-...` style metadata.
pub trait VendorExtensions {
    /// Extension entries, passed through verbatim.
    fn vendor_extensions(&self) -> &Extensions;
}

impl FixedValueSet for ParsedEnum {
    fn value_set_name(&self) -> &str {
        &self.name
    }

    fn allowed_values(&self) -> Vec<Value> {
        self.values.iter().cloned().map(Value::String).collect()
    }
}

impl VendorExtensions for ParsedEnum {
    fn vendor_extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl VendorExtensions for ParsedRecord {
    fn vendor_extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl VendorExtensions for ParsedField {
    fn vendor_extensions(&self) -> &Extensions {
        &self.extensions
    }
}

/// Builds the enum schema of a fixed value set (string-typed for now).
pub fn resolve_enum<T>(model: &T) -> SchemaDefinition
where
    T: FixedValueSet + VendorExtensions,
{
    let mut definition =
        SchemaDefinition::enumeration(model.value_set_name(), model.allowed_values());
    merge_extensions(&mut definition.extensions, model);
    definition
}

/// Merges one channel of extension metadata into `target`.
///
/// Type-level and field-level metadata land in different targets and never
/// see each other.
pub fn merge_extensions<T: VendorExtensions + ?Sized>(target: &mut Extensions, source: &T) {
    for (key, value) in source.vendor_extensions() {
        target.insert(key.clone(), value.clone());
    }
}
