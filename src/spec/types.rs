use crate::schema::SchemaRef;
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Where a parameter lives in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// OpenAPI `in` value for this location.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One OpenAPI parameter object.
///
/// Path parameters produced by the translator are always `required`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterDescriptor {
    /// A required path parameter with the given schema fragment.
    #[must_use]
    pub fn path(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Path,
            required: true,
            schema,
            description: None,
        }
    }
}

/// Declared request body: the model to validate against and the media type it is
/// documented under.
#[derive(Debug, Clone)]
pub struct RequestBody {
    pub model: Option<SchemaRef>,
    pub content_type: String,
}

impl RequestBody {
    /// JSON body validated against `model`.
    #[must_use]
    pub fn json(model: SchemaRef) -> Self {
        Self {
            model: Some(model),
            content_type: "application/json".to_string(),
        }
    }

    /// Body documented under `content_type`; `model` may be absent for opaque payloads.
    #[must_use]
    pub fn new(model: Option<SchemaRef>, content_type: impl Into<String>) -> Self {
        Self {
            model,
            content_type: content_type.into(),
        }
    }
}

/// Response models keyed by exact HTTP status code.
///
/// A status may be declared without a model (e.g. `204`); it is documented but never
/// validated.
#[derive(Debug, Clone, Default)]
pub struct ResponseSchemas {
    codes: BTreeMap<u16, Option<SchemaRef>>,
}

impl ResponseSchemas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `status` with a model to validate against.
    #[must_use]
    pub fn with(mut self, status: u16, model: SchemaRef) -> Self {
        self.codes.insert(status, Some(model));
        self
    }

    /// Declare `status` without a body model.
    #[must_use]
    pub fn with_empty(mut self, status: u16) -> Self {
        self.codes.insert(status, None);
        self
    }

    /// True when at least one status carries a model.
    #[must_use]
    pub fn has_model(&self) -> bool {
        self.codes.values().any(Option::is_some)
    }

    /// Model registered for exactly `status`, if any.
    #[must_use]
    pub fn find_model(&self, status: u16) -> Option<&SchemaRef> {
        self.codes.get(&status).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn contains(&self, status: u16) -> bool {
        self.codes.contains_key(&status)
    }

    /// Declared statuses in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, Option<&SchemaRef>)> {
        self.codes.iter().map(|(code, model)| (*code, model.as_ref()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Everything known about one (rule, method) pair once startup is done.
///
/// Built by [`crate::spec::build_route_spec`]; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub method: Method,
    pub path_pattern: String,
    pub endpoint: String,
    pub normalized_path: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub query: Option<SchemaRef>,
    pub body: Option<RequestBody>,
    pub headers: Option<SchemaRef>,
    pub cookies: Option<SchemaRef>,
    pub responses: Option<ResponseSchemas>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl RouteSpec {
    /// `operationId` used in the assembled document.
    #[must_use]
    pub fn operation_id(&self) -> String {
        format!("{}_{}", self.method.as_str().to_lowercase(), self.endpoint)
    }

    /// True when any request section declares a schema.
    #[must_use]
    pub fn validates_request(&self) -> bool {
        self.query.is_some()
            || self.headers.is_some()
            || self.cookies.is_some()
            || self.body.as_ref().is_some_and(|b| b.model.is_some())
    }
}
