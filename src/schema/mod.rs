//! # Schema Module
//!
//! The capability every request/response model exposes to the validation pipeline:
//! parse a raw JSON value into a validated value (or fail with field-level errors), and
//! describe itself as a JSON Schema fragment for the OpenAPI document.
//!
//! Two implementations ship with the crate:
//!
//! - [`JsonSchemaModel`] validates against a JSON Schema document with the `jsonschema`
//!   crate and returns the input unchanged.
//! - [`TypedModel`] additionally deserializes into a Rust type, so serde defaults and
//!   renames are applied to the value handed to handlers.
//!
//! Both are compiled once at startup and are `Send + Sync`; share them as [`SchemaRef`].

mod json;
mod typed;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub use json::JsonSchemaModel;
pub use typed::TypedModel;

/// A named model that can validate values and describe itself.
pub trait Schema: Send + Sync + fmt::Debug {
    /// Component name used in the OpenAPI document (`#/components/schemas/{name}`).
    fn name(&self) -> &str;

    /// Validate `raw` and return the value handlers should see.
    ///
    /// All field errors found are reported together.
    fn parse(&self, raw: &Value) -> Result<Value, ValidationError>;

    /// JSON Schema fragment for this model.
    fn describe(&self) -> Value;
}

/// Shared handle to a compiled model.
pub type SchemaRef = Arc<dyn Schema>;

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Path to the failing value, outermost first. Empty for the document root.
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(loc: Vec<String>, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc,
            msg: msg.into(),
            kind: kind.into(),
        }
    }
}

/// All field errors produced by one `parse` call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} validation error(s) for {model}", errors.len())]
pub struct ValidationError {
    pub model: String,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(model: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            model: model.into(),
            errors,
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The error list as the JSON array sent to clients.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.errors).unwrap_or(Value::Array(Vec::new()))
    }
}

/// A model definition that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("schema for model `{model}` does not compile: {message}")]
    Compile { model: String, message: String },
}

/// Split a JSON pointer (`/items/0/name`) into location segments.
pub(crate) fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}
