//! # Document Descriptors
//!
//! Plain declaration data handed to the assembler: one value per path,
//! parameter, response and header. Root types are Rust type expressions
//! resolved against the model set at build time.

use crate::error::AppError;
use crate::oas::document::ParamLocation;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Content type used when none is declared.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

/// Whole-document declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentModel {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// API description.
    #[serde(default)]
    pub description: Option<String>,
    /// Server URLs.
    #[serde(default)]
    pub servers: Vec<String>,
    /// Enables the HTTP bearer (JWT) security scheme.
    #[serde(default)]
    pub bearer_auth: bool,
    /// Tag definitions.
    #[serde(default)]
    pub tags: Vec<TagDescriptor>,
    /// Response injected as `default` into every path lacking one.
    #[serde(default)]
    pub default_response: Option<ResponseDescriptor>,
    /// Paths in declaration order.
    #[serde(default)]
    pub paths: Vec<PathDescriptor>,
}

/// Tag definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagDescriptor {
    /// Tag name.
    pub name: String,
    /// Tag description.
    #[serde(default)]
    pub description: Option<String>,
}

/// One operation on one route.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathDescriptor {
    /// Route string, e.g. `/users/{id}`.
    pub route: String,
    /// HTTP method; validated at build time.
    pub method: String,
    /// Grouping tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Short summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Long description; falls back to the summary.
    #[serde(default)]
    pub description: Option<String>,
    /// Operation identifier.
    #[serde(default)]
    pub operation_id: Option<String>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    /// Request body.
    #[serde(default)]
    pub request_body: Option<RequestBodyDescriptor>,
    /// Responses; a later entry for the same status replaces an earlier one.
    #[serde(default)]
    pub responses: Vec<ResponseDescriptor>,
}

/// A path or query parameter.
///
/// The value is either a model type (`model`) or a primitive (`type`).
/// Setting `component` makes the parameter a shared component referenced
/// by name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDescriptor {
    /// Parameter name.
    pub name: String,
    /// Location.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Whether the parameter is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Component name when shared.
    #[serde(default)]
    pub component: Option<String>,
    /// Rust type expression of the value.
    #[serde(default)]
    pub model: Option<String>,
    /// Primitive type name when no model is given.
    #[serde(default, rename = "type")]
    pub param_type: Option<String>,
    /// Primitive format.
    #[serde(default)]
    pub format: Option<String>,
    /// Primitive lower bound.
    #[serde(default)]
    pub minimum: Option<f64>,
    /// Primitive upper bound.
    #[serde(default)]
    pub maximum: Option<f64>,
    /// Primitive fixed value list.
    #[serde(default, rename = "enum")]
    pub enum_values: Vec<Value>,
}

/// Request body declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestBodyDescriptor {
    /// Rust type expression of the payload.
    #[serde(default)]
    pub model: Option<String>,
    /// Content type; `multipart/form-data` for form bodies.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Whether a body is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Raw request body object, used verbatim when no model is given.
    #[serde(default)]
    pub inline: Option<Value>,
}

/// HTTP status key of a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "StatusRepr")]
pub enum StatusCode {
    /// The `default` response.
    #[default]
    Default,
    /// A concrete status.
    Code(u16),
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCode::Default => write!(f, "default"),
            StatusCode::Code(code) => write!(f, "{}", code),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusRepr {
    Code(u16),
    Text(String),
}

impl TryFrom<StatusRepr> for StatusCode {
    type Error = AppError;

    fn try_from(repr: StatusRepr) -> Result<Self, Self::Error> {
        match repr {
            StatusRepr::Code(code) => Ok(StatusCode::Code(code)),
            StatusRepr::Text(text) if text == "default" => Ok(StatusCode::Default),
            StatusRepr::Text(text) => text
                .parse::<u16>()
                .map(StatusCode::Code)
                .map_err(|_| AppError::Parse(format!("invalid status code '{}'", text))),
        }
    }
}

/// One response declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseDescriptor {
    /// Status code or `default`.
    #[serde(default)]
    pub status: StatusCode,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Rust type expression of the payload.
    #[serde(default)]
    pub model: Option<String>,
    /// Content type of the payload.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Raw response object; bypasses derivation entirely.
    #[serde(default)]
    pub inline: Option<Value>,
    /// Primitive-only headers.
    #[serde(default)]
    pub headers: Vec<HeaderDescriptor>,
}

/// A primitive response header.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderDescriptor {
    /// Header name.
    pub name: String,
    /// Primitive type name.
    #[serde(rename = "type")]
    pub header_type: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_forms() {
        let response: ResponseDescriptor =
            serde_yaml::from_str("status: 200\ndescription: ok").unwrap();
        assert_eq!(response.status, StatusCode::Code(200));
        assert_eq!(response.content_type, DEFAULT_CONTENT_TYPE);

        let response: ResponseDescriptor =
            serde_yaml::from_str("status: default\ndescription: err").unwrap();
        assert_eq!(response.status, StatusCode::Default);

        let response: ResponseDescriptor = serde_yaml::from_str("status: '404'").unwrap();
        assert_eq!(response.status.to_string(), "404");

        assert!(serde_yaml::from_str::<ResponseDescriptor>("status: teapot").is_err());
    }

    #[test]
    fn test_parameter_keys() {
        let param: ParameterDescriptor = serde_yaml::from_str(
            "name: limit\nin: query\ntype: integer\nformat: int32\nminimum: 1\nenum: [1, 10]",
        )
        .unwrap();
        assert_eq!(param.location, ParamLocation::Query);
        assert_eq!(param.param_type.as_deref(), Some("integer"));
        assert_eq!(param.minimum, Some(1.0));
        assert_eq!(param.enum_values.len(), 2);
        assert!(!param.required);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(serde_yaml::from_str::<TagDescriptor>("name: a\ncolour: red").is_err());
    }
}
