use crate::schema::ValidationError;
use crate::server::HandlerResponse;
use crate::spec::ResponseSchemas;
use serde_json::{json, Value};

/// Status of the generic response sent when a handler's response fails validation.
pub const RESPONSE_VALIDATION_STATUS: u16 = 500;

/// Body of the generic response sent when a handler's response fails validation.
#[must_use]
pub fn response_validation_body() -> Value {
    json!({ "message": "response validation error" })
}

/// A handler response that does not match the model declared for its status.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("response with status {status} failed validation: {error}")]
pub struct ResponseValidationError {
    pub status: u16,
    pub error: ValidationError,
}

/// What [`validate_response`] did when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCheck {
    /// Validation disabled, no models declared, or no model for this exact status.
    NotPerformed,
    Passed,
}

/// Check `response` against the model declared for its exact status code.
pub fn validate_response(
    response: &HandlerResponse,
    schemas: Option<&ResponseSchemas>,
    enabled: bool,
) -> Result<ResponseCheck, ResponseValidationError> {
    let Some(schemas) = schemas.filter(|s| enabled && s.has_model()) else {
        return Ok(ResponseCheck::NotPerformed);
    };
    let Some(model) = schemas.find_model(response.status) else {
        return Ok(ResponseCheck::NotPerformed);
    };
    model
        .parse(&response.body)
        .map(|_| ResponseCheck::Passed)
        .map_err(|error| ResponseValidationError {
            status: response.status,
            error,
        })
}
