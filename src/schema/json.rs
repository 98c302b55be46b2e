use super::{pointer_segments, FieldError, Schema, SchemaError, ValidationError};
use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// A model defined by a JSON Schema document.
///
/// The schema is compiled once in [`JsonSchemaModel::new`]; `parse` collects every
/// violation and returns the input unchanged when there are none.
pub struct JsonSchemaModel {
    name: String,
    schema: Value,
    validator: Validator,
}

impl JsonSchemaModel {
    /// Compile `schema` under the component name `name`.
    pub fn new(name: impl Into<String>, schema: Value) -> Result<Self, SchemaError> {
        let name = name.into();
        let validator = compile(&name, &schema)?;
        debug!(model = %name, "Compiled JSON Schema model");
        Ok(Self {
            name,
            schema,
            validator,
        })
    }
}

impl fmt::Debug for JsonSchemaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaModel")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl Schema for JsonSchemaModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, raw: &Value) -> Result<Value, ValidationError> {
        check(&self.name, &self.validator, raw)?;
        Ok(raw.clone())
    }

    fn describe(&self) -> Value {
        self.schema.clone()
    }
}

pub(super) fn compile(name: &str, schema: &Value) -> Result<Validator, SchemaError> {
    jsonschema::validator_for(schema).map_err(|e| SchemaError::Compile {
        model: name.to_string(),
        message: e.to_string(),
    })
}

/// Run `validator` over `raw`, turning every violation into a [`FieldError`].
pub(super) fn check(name: &str, validator: &Validator, raw: &Value) -> Result<(), ValidationError> {
    let errors: Vec<FieldError> = validator
        .iter_errors(raw)
        .map(|e| {
            let mut loc = pointer_segments(&e.instance_path.to_string());
            let kind = match &e.kind {
                ValidationErrorKind::Required { property } => {
                    loc.push(property.to_string().trim_matches('"').to_string());
                    "value_error.missing"
                }
                ValidationErrorKind::Type { .. } => "type_error",
                ValidationErrorKind::Enum { .. } => "value_error.enum",
                ValidationErrorKind::Minimum { .. } => "value_error.number.not_ge",
                ValidationErrorKind::Maximum { .. } => "value_error.number.not_le",
                ValidationErrorKind::MinLength { .. } => "value_error.any_str.min_length",
                ValidationErrorKind::MaxLength { .. } => "value_error.any_str.max_length",
                ValidationErrorKind::Pattern { .. } => "value_error.str.regex",
                ValidationErrorKind::Format { .. } => "value_error.format",
                ValidationErrorKind::AdditionalProperties { .. } => "value_error.extra",
                _ => "value_error",
            };
            FieldError::new(loc, e.to_string(), kind)
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(name, errors))
    }
}
