#![deny(missing_docs)]

//! # OpenAPI Document Model
//!
//! Serde model of the emitted document. Only the subset the assembler
//! produces is modelled; `Deserialize` is used to validate raw inline
//! request/response payloads against the same shape.

use crate::error::AppError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Version string written to the `openapi` key.
pub const OPENAPI_VERSION: &str = "3.0.0";

/// `{scheme name: scopes}`.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Root of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApi {
    /// Always [`OPENAPI_VERSION`].
    pub openapi: String,
    /// Title and version.
    pub info: Info,
    /// Server list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// Global security requirements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
    /// Tag definitions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Path items keyed by route.
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
    /// Shared components.
    #[serde(default, skip_serializing_if = "Components::is_empty")]
    pub components: Components,
}

/// API information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// API description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Server entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Server URL.
    pub url: String,
}

/// Tag definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Tag description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// HTTP verbs a path item can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// PATCH
    Patch,
    /// CONNECT
    Connect,
    /// TRACE
    Trace,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Patch => "patch",
            Self::Connect => "connect",
            Self::Trace => "trace",
        };
        write!(f, "{}", verb)
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "put" => Ok(Self::Put),
            "post" => Ok(Self::Post),
            "delete" => Ok(Self::Delete),
            "options" => Ok(Self::Options),
            "patch" => Ok(Self::Patch),
            "connect" => Ok(Self::Connect),
            "trace" => Ok(Self::Trace),
            other => Err(AppError::UnsupportedMethod(format!(
                "method '{}' not supported",
                other
            ))),
        }
    }
}

/// Operations of one route, keyed by HTTP method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// PUT operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// POST operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// DELETE operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// OPTIONS operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// PATCH operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// CONNECT operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect: Option<Operation>,
    /// TRACE operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

impl PathItem {
    /// Sets the operation for `method`, returning the one it replaced.
    pub fn set_operation(&mut self, method: HttpMethod, operation: Operation) -> Option<Operation> {
        self.slot(method).replace(operation)
    }

    /// The operation registered for `method`.
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Connect => self.connect.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }

    fn slot(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Connect => &mut self.connect,
            HttpMethod::Trace => &mut self.trace,
        }
    }
}

/// One API operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Grouping tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Operation identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Parameters in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<RefOr<Parameter>>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code or `default`.
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

/// A `$ref` pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Target, e.g. `#/components/parameters/limit`.
    #[serde(rename = "$ref")]
    pub reference: String,
}

/// Either a reference or an inline value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// `$ref` to a component.
    Ref(Reference),
    /// Inline value.
    Item(T),
}

impl<T> RefOr<T> {
    /// Builds a reference.
    pub fn reference(target: impl Into<String>) -> Self {
        RefOr::Ref(Reference {
            reference: target.into(),
        })
    }
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Path segment.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
}

/// Parameter object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Location.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter is mandatory.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Value schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Payload per content type.
    pub content: BTreeMap<String, MediaType>,
    /// Whether a body is mandatory.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Members without a dedicated field (`x-*`, `links`, `example`, ...),
    /// kept verbatim.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Media type entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    /// Payload schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// Members without a dedicated field (`x-*`, `links`, `example`, ...),
    /// kept verbatim.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Response object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Description; required by the format.
    pub description: String,
    /// Response headers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, Header>,
    /// Payload per content type.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,
    /// Members without a dedicated field (`x-*`, `links`, `example`, ...),
    /// kept verbatim.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Response {
    /// A response carrying only a description.
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            headers: BTreeMap::new(),
            content: BTreeMap::new(),
            extensions: IndexMap::new(),
        }
    }
}

/// Response header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Value schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// Members without a dedicated field (`x-*`, `links`, `example`, ...),
    /// kept verbatim.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Reusable components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// Schemas keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, Schema>,
    /// Parameters keyed by component name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Parameter>,
    /// Security schemes keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub security_schemes: BTreeMap<String, SecurityScheme>,
}

impl Components {
    /// Whether no component of any kind is present.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty() && self.parameters.is_empty() && self.security_schemes.is_empty()
    }
}

/// Security scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    /// Scheme type, e.g. `http`.
    #[serde(rename = "type")]
    pub scheme_type: String,
    /// HTTP auth scheme, e.g. `bearer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// Bearer token format hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,
}

impl SecurityScheme {
    /// HTTP bearer authentication with JWT tokens.
    pub fn bearer_jwt() -> Self {
        Self {
            scheme_type: "http".to_string(),
            scheme: Some("bearer".to_string()),
            bearer_format: Some("JWT".to_string()),
        }
    }
}

/// Schema object, inline or as a `$ref`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    /// Reference to a component schema.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// `type`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// `format`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// `description`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `nullable`.
    #[serde(skip_serializing_if = "is_false")]
    pub nullable: bool,
    /// `deprecated`.
    #[serde(skip_serializing_if = "is_false")]
    pub deprecated: bool,
    /// `default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// `minimum`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Value>,
    /// `maximum`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Value>,
    /// `enum`.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    /// Array items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Object properties in declaration order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    /// Names of required properties.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Map value schema, or a plain allow/deny flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    /// Vendor extensions, flattened into the object.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// `additionalProperties`: either a boolean or a value schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` / `false`.
    Allowed(bool),
    /// Schema every extra member must satisfy.
    Schema(Box<Schema>),
}

impl Schema {
    /// A bare `$ref` schema.
    pub fn reference(target: impl Into<String>) -> Self {
        Self {
            reference: Some(target.into()),
            ..Self::default()
        }
    }

    /// A schema with only `type` (and optionally `format`) set.
    pub fn typed(schema_type: impl Into<String>, format: Option<String>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            format,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_method_parsing() {
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("connect".parse::<HttpMethod>().unwrap(), HttpMethod::Connect);
        assert!(matches!(
            "head".parse::<HttpMethod>().unwrap_err(),
            AppError::UnsupportedMethod(_)
        ));
    }

    #[test]
    fn test_set_operation_returns_replaced() {
        let mut item = PathItem::default();
        assert!(item.set_operation(HttpMethod::Get, Operation::default()).is_none());
        assert!(item.set_operation(HttpMethod::Get, Operation::default()).is_some());
        assert!(item.operation(HttpMethod::Get).is_some());
        assert!(item.operation(HttpMethod::Trace).is_none());
    }

    #[test]
    fn test_schema_serialization_shape() {
        let mut schema = Schema::typed("object", None);
        schema
            .properties
            .insert("zeta".into(), Schema::typed("integer", Some("int64".into())));
        schema
            .properties
            .insert("alpha".into(), Schema::reference("#/components/schemas/Other"));
        schema.required.push("zeta".into());
        schema.extensions.insert("x-order".into(), json!(1));

        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "type": "object",
                "properties": {
                    "zeta": {"type": "integer", "format": "int64"},
                    "alpha": {"$ref": "#/components/schemas/Other"}
                },
                "required": ["zeta"],
                "x-order": 1
            })
        );
        let keys: Vec<String> = serde_json::to_value(&schema).unwrap()["properties"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_ref_or_untagged() {
        let param: RefOr<Parameter> = RefOr::reference("#/components/parameters/limit");
        assert_eq!(
            serde_json::to_value(&param).unwrap(),
            json!({"$ref": "#/components/parameters/limit"})
        );
    }

    #[test]
    fn test_additional_properties_flag_or_schema() {
        let open: Schema =
            serde_json::from_value(json!({"type": "object", "additionalProperties": true}))
                .unwrap();
        assert_eq!(
            open.additional_properties,
            Some(AdditionalProperties::Allowed(true))
        );

        let typed: Schema = serde_json::from_value(
            json!({"type": "object", "additionalProperties": {"type": "string"}}),
        )
        .unwrap();
        assert_eq!(
            typed.additional_properties,
            Some(AdditionalProperties::Schema(Box::new(Schema::typed(
                "string", None
            ))))
        );
        assert_eq!(
            serde_json::to_value(&open).unwrap(),
            json!({"type": "object", "additionalProperties": true})
        );
    }

    #[test]
    fn test_response_keeps_unmodelled_members() {
        let raw = json!({
            "description": "ok",
            "x-internal": true,
            "links": {"self": {"operationId": "getItem"}},
            "content": {
                "application/json": {
                    "schema": {"type": "object"},
                    "example": {"id": 1}
                }
            }
        });
        let response: Response = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(response.extensions["x-internal"], json!(true));
        assert_eq!(serde_json::to_value(&response).unwrap(), raw);
    }

    #[test]
    fn test_response_requires_description() {
        let ok: Result<Response, _> = serde_json::from_value(json!({"description": "ok"}));
        assert!(ok.is_ok());
        let missing: Result<Response, _> = serde_json::from_value(json!({"content": {}}));
        assert!(missing.is_err());
    }
}
