use super::coerce::coerce_pairs;
use crate::schema::{FieldError, SchemaRef, ValidationError};
use crate::server::HttpRequest;
use crate::spec::RequestBody;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Request sections in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Query,
    Body,
    Headers,
    Cookies,
}

impl Section {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Query => "query",
            Section::Body => "body",
            Section::Headers => "headers",
            Section::Cookies => "cookies",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first request section that failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("request {section} failed validation: {error}")]
pub struct RequestValidationError {
    pub section: Section,
    pub error: ValidationError,
}

/// Models declared for the request side of an endpoint.
#[derive(Debug, Clone, Default)]
pub struct RequestSchemas {
    pub query: Option<SchemaRef>,
    pub body: Option<RequestBody>,
    pub headers: Option<SchemaRef>,
    pub cookies: Option<SchemaRef>,
}

impl RequestSchemas {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_none()
            && self.headers.is_none()
            && self.cookies.is_none()
            && self.body.as_ref().and_then(|b| b.model.as_ref()).is_none()
    }
}

/// Validated request sections for one request.
///
/// A slot is `None` when its section declares no model. Created fresh for every request
/// and attached to it; never shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationContext {
    pub query: Option<Value>,
    pub body: Option<Value>,
    pub headers: Option<Value>,
    pub cookies: Option<Value>,
}

impl ValidationContext {
    /// Deserialize the validated query into `T`.
    pub fn query_as<T: DeserializeOwned>(&self) -> serde_json::Result<Option<T>> {
        typed(self.query.as_ref())
    }

    pub fn body_as<T: DeserializeOwned>(&self) -> serde_json::Result<Option<T>> {
        typed(self.body.as_ref())
    }

    pub fn headers_as<T: DeserializeOwned>(&self) -> serde_json::Result<Option<T>> {
        typed(self.headers.as_ref())
    }

    pub fn cookies_as<T: DeserializeOwned>(&self) -> serde_json::Result<Option<T>> {
        typed(self.cookies.as_ref())
    }
}

fn typed<T: DeserializeOwned>(value: Option<&Value>) -> serde_json::Result<Option<T>> {
    value.map(|v| T::deserialize(v)).transpose()
}

/// Validate `req` against `schemas`.
///
/// Sections are checked in the order query, body, headers, cookies; the first failing
/// section is returned and the rest are not checked.
pub fn validate_request(
    req: &HttpRequest,
    schemas: &RequestSchemas,
) -> Result<ValidationContext, RequestValidationError> {
    let fail = |section| move |error| RequestValidationError { section, error };

    let query = schemas
        .query
        .as_ref()
        .map(|model| model.parse(&coerce_pairs(&req.query_params, &model.describe(), false)))
        .transpose()
        .map_err(fail(Section::Query))?;

    let body = match schemas.body.as_ref().and_then(|b| b.model.as_ref()) {
        Some(model) => {
            let payload = body_payload(req, model.name()).map_err(fail(Section::Body))?;
            Some(model.parse(&payload).map_err(fail(Section::Body))?)
        }
        None => None,
    };

    let headers = schemas
        .headers
        .as_ref()
        .map(|model| model.parse(&coerce_pairs(&req.headers, &model.describe(), true)))
        .transpose()
        .map_err(fail(Section::Headers))?;

    let cookies = schemas
        .cookies
        .as_ref()
        .map(|model| model.parse(&coerce_pairs(&req.cookies, &model.describe(), false)))
        .transpose()
        .map_err(fail(Section::Cookies))?;

    debug!(
        query = query.is_some(),
        body = body.is_some(),
        headers = headers.is_some(),
        cookies = cookies.is_some(),
        "Request validated"
    );
    Ok(ValidationContext {
        query,
        body,
        headers,
        cookies,
    })
}

/// Body as the value handed to the body model.
///
/// JSON requests are decoded, and an empty body or a falsy JSON value (`null`, `false`,
/// `0`, `""`, `[]`) becomes `{}`. Anything else is passed through as a string of its bytes.
fn body_payload(req: &HttpRequest, model: &str) -> Result<Value, ValidationError> {
    if req.body.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    if req.is_json() {
        let value: Value = serde_json::from_slice(&req.body).map_err(|e| {
            ValidationError::new(
                model,
                vec![FieldError::new(Vec::new(), e.to_string(), "value_error.jsondecode")],
            )
        })?;
        Ok(if is_falsy(&value) {
            Value::Object(Map::new())
        } else {
            value
        })
    } else {
        Ok(Value::String(String::from_utf8_lossy(&req.body).into_owned()))
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}
