//! # Document Assembler
//!
//! Turns a [`DocumentModel`] into an [`OpenApi`] document.
//!
//! Every build starts from an empty schema registry and an empty parameter
//! component map. Schemas are derived on first reference; the first error
//! aborts the build and no partial document is returned.

use crate::document::descriptors::{
    DocumentModel, HeaderDescriptor, ParameterDescriptor, PathDescriptor,
    RequestBodyDescriptor, ResponseDescriptor, StatusCode,
};
use crate::error::{AppError, AppResult};
use crate::oas::document::{
    Components, Header, HttpMethod, Info, MediaType, OpenApi, Operation, Parameter, PathItem,
    RefOr, RequestBody, Response, Schema, SecurityRequirement, SecurityScheme, Server, Tag,
    OPENAPI_VERSION,
};
use crate::oas::render::{bound, parameter_ref, render_components, render_field, schema_ref};
use crate::parser::models::ModelSet;
use crate::parser::types::TypeShape;
use crate::schema::descriptors::JsonType;
use crate::schema::registry::{SchemaDeriver, SchemaRegistry};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// Name of the bearer security scheme.
pub const BEARER_AUTH: &str = "bearerAuth";

/// Builds documents against a fixed model set.
pub struct DocumentAssembler<'a> {
    models: &'a ModelSet,
}

impl<'a> DocumentAssembler<'a> {
    /// Creates an assembler resolving root types against `models`.
    pub fn new(models: &'a ModelSet) -> Self {
        Self { models }
    }

    /// Assembles the full document.
    pub fn build(&self, model: &DocumentModel) -> AppResult<OpenApi> {
        let mut state = BuildState::new(self.models);

        let mut paths: BTreeMap<String, PathItem> = BTreeMap::new();
        for path in &model.paths {
            let context = format!("{} {}", path.method, path.route);
            let method: HttpMethod = path
                .method
                .parse()
                .map_err(|e: AppError| e.within(&path.route))?;
            let operation = state
                .operation(path, model.default_response.as_ref())
                .map_err(|e| e.within(&context))?;
            let item = paths.entry(path.route.clone()).or_default();
            if item.set_operation(method, operation).is_some() {
                log::warn!("{} declared more than once, keeping the last one", context);
            }
        }

        let mut components = Components {
            schemas: render_components(&state.schemas),
            parameters: state.parameters,
            security_schemes: BTreeMap::new(),
        };
        let mut security = Vec::new();
        if model.bearer_auth {
            let mut requirement = SecurityRequirement::new();
            requirement.insert(BEARER_AUTH.to_string(), Vec::new());
            security.push(requirement);
            components
                .security_schemes
                .insert(BEARER_AUTH.to_string(), SecurityScheme::bearer_jwt());
        }

        log::debug!(
            "assembled {} path(s), {} schema(s), {} parameter component(s)",
            paths.len(),
            components.schemas.len(),
            components.parameters.len()
        );

        Ok(OpenApi {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: model.title.clone(),
                version: model.version.clone(),
                description: model.description.clone(),
            },
            servers: model
                .servers
                .iter()
                .map(|url| Server { url: url.clone() })
                .collect(),
            security,
            tags: model
                .tags
                .iter()
                .map(|t| Tag {
                    name: t.name.clone(),
                    description: t.description.clone(),
                })
                .collect(),
            paths,
            components,
        })
    }

    /// Derives one root type on its own, returning its component name and
    /// every schema it needs.
    pub fn derive_schemas(&self, root: &str) -> AppResult<(String, BTreeMap<String, Schema>)> {
        let mut state = BuildState::new(self.models);
        let name = state.derive(root)?;
        Ok((name, render_components(&state.schemas)))
    }
}

struct BuildState<'a> {
    deriver: SchemaDeriver<'a>,
    schemas: SchemaRegistry,
    parameters: BTreeMap<String, Parameter>,
}

impl<'a> BuildState<'a> {
    fn new(models: &'a ModelSet) -> Self {
        Self {
            deriver: SchemaDeriver::new(models),
            schemas: SchemaRegistry::new(),
            parameters: BTreeMap::new(),
        }
    }

    fn derive(&mut self, expr: &str) -> AppResult<String> {
        let root = TypeShape::parse(expr)?;
        self.deriver.derive_and_register(&root, &mut self.schemas)
    }

    fn operation(
        &mut self,
        path: &PathDescriptor,
        default_response: Option<&ResponseDescriptor>,
    ) -> AppResult<Operation> {
        let mut parameters = Vec::with_capacity(path.parameters.len());
        for param in &path.parameters {
            parameters.push(self.parameter(param)?);
        }

        let request_body = match &path.request_body {
            Some(body) => Some(self.request_body(body)?),
            None => None,
        };

        let mut responses = BTreeMap::new();
        for response in &path.responses {
            let key = response.status.to_string();
            let built = self.response(response)?;
            if responses.insert(key.clone(), built).is_some() {
                log::warn!("response '{}' declared more than once on {}", key, path.route);
            }
        }
        let default_key = StatusCode::Default.to_string();
        if let Some(default) = default_response {
            if !responses.contains_key(&default_key) {
                let built = self.response(default)?;
                responses.insert(default_key.clone(), built);
            }
        }
        if responses.is_empty() {
            responses.insert(default_key, Response::described(""));
        }

        let description = path
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .or_else(|| path.summary.clone());

        Ok(Operation {
            tags: path.tags.clone(),
            summary: path.summary.clone(),
            description,
            operation_id: path.operation_id.clone(),
            parameters,
            request_body,
            responses,
        })
    }

    fn parameter(&mut self, param: &ParameterDescriptor) -> AppResult<RefOr<Parameter>> {
        let schema = self
            .parameter_schema(param)
            .map_err(|e| e.within(&format!("parameter '{}'", param.name)))?;
        let parameter = Parameter {
            name: param.name.clone(),
            location: param.location,
            description: param.description.clone(),
            required: param.required,
            schema: Some(schema),
        };

        match &param.component {
            Some(component) => {
                if let Some(previous) = self.parameters.get(component) {
                    if previous != &parameter {
                        log::warn!(
                            "parameter component '{}' redefined, keeping the last one",
                            component
                        );
                    }
                }
                self.parameters.insert(component.clone(), parameter);
                Ok(RefOr::reference(parameter_ref(component)))
            }
            None => Ok(RefOr::Item(parameter)),
        }
    }

    fn parameter_schema(&mut self, param: &ParameterDescriptor) -> AppResult<Schema> {
        if let Some(model) = &param.model {
            if param.param_type.is_some() {
                log::warn!(
                    "parameter '{}' declares both a model and a type, using the model",
                    param.name
                );
            }
            let shape = TypeShape::parse(model)?;
            let descriptor = self
                .deriver
                .classify_and_register(&shape, &mut self.schemas)?;
            return Ok(render_field(&descriptor));
        }

        let type_name = param.param_type.as_deref().ok_or_else(|| {
            AppError::UnsupportedShape("declares neither a model nor a type".to_string())
        })?;
        let json_type = primitive_type(type_name)?;
        Ok(Schema {
            minimum: param.minimum.and_then(bound),
            maximum: param.maximum.and_then(bound),
            enum_values: param.enum_values.clone(),
            ..Schema::typed(json_type.to_string(), param.format.clone())
        })
    }

    fn request_body(&mut self, body: &RequestBodyDescriptor) -> AppResult<RequestBody> {
        match (&body.model, &body.inline) {
            (Some(model), inline) => {
                if inline.is_some() {
                    log::warn!("request body has both a model and an inline payload, using the model");
                }
                let name = self.derive(model)?;
                let mut content = BTreeMap::new();
                content.insert(
                    body.content_type.clone(),
                    MediaType {
                        schema: Some(Schema::reference(schema_ref(&name))),
                        ..MediaType::default()
                    },
                );
                Ok(RequestBody {
                    description: None,
                    content,
                    required: body.required,
                    extensions: IndexMap::new(),
                })
            }
            (None, Some(inline)) => parse_inline(inline, "request body"),
            (None, None) => Err(AppError::General(
                "request body declares neither a model nor an inline payload".to_string(),
            )),
        }
    }

    fn response(&mut self, response: &ResponseDescriptor) -> AppResult<Response> {
        if let Some(inline) = &response.inline {
            return parse_inline(inline, &format!("response '{}'", response.status));
        }

        let mut built = Response::described(response.description.clone());
        if let Some(model) = &response.model {
            let name = self.derive(model)?;
            built.content.insert(
                response.content_type.clone(),
                MediaType {
                    schema: Some(Schema::reference(schema_ref(&name))),
                    ..MediaType::default()
                },
            );
        }
        for header in &response.headers {
            built.headers.insert(header.name.clone(), build_header(header)?);
        }
        Ok(built)
    }
}

fn build_header(header: &HeaderDescriptor) -> AppResult<Header> {
    let json_type = primitive_type(&header.header_type)
        .map_err(|e| e.within(&format!("header '{}'", header.name)))?;
    Ok(Header {
        schema: Some(Schema {
            description: header.description.clone(),
            ..Schema::typed(json_type.to_string(), None)
        }),
        extensions: IndexMap::new(),
    })
}

fn primitive_type(name: &str) -> AppResult<JsonType> {
    JsonType::from_name(name).ok_or_else(|| {
        AppError::UnsupportedShape(format!("'{}' is not a primitive type", name))
    })
}

/// Validates a raw payload against the document shape.
fn parse_inline<T: DeserializeOwned>(payload: &Value, what: &str) -> AppResult<T> {
    serde_json::from_value(payload.clone())
        .map_err(|e| AppError::MalformedInlinePayload(format!("{}: {}", what, e)))
}
