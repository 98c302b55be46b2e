use super::json::{check, compile};
use super::{FieldError, Schema, SchemaError, ValidationError};
use jsonschema::Validator;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// A model backed by a Rust type.
///
/// `parse` first checks the documented fragment (so every field error is reported at
/// once), then deserializes into `T` and hands the re-serialized value to the handler.
/// Serde defaults therefore show up in the validated value.
pub struct TypedModel<T> {
    name: String,
    fragment: Value,
    validator: Validator,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedModel<T>
where
    T: DeserializeOwned + Serialize,
{
    /// `fragment` documents `T`; it is also the first validation pass.
    pub fn new(name: impl Into<String>, fragment: Value) -> Result<Self, SchemaError> {
        let name = name.into();
        let validator = compile(&name, &fragment)?;
        Ok(Self {
            name,
            fragment,
            validator,
            _marker: PhantomData,
        })
    }

    /// Deserialize an already validated value into `T`.
    pub fn to_typed(&self, value: &Value) -> Result<T, ValidationError> {
        serde_path_to_error::deserialize(value)
            .map_err(|e| ValidationError::new(&self.name, vec![serde_field_error(e)]))
    }
}

fn serde_field_error(err: serde_path_to_error::Error<serde_json::Error>) -> FieldError {
    use serde_path_to_error::Segment;

    let mut loc: Vec<String> = err
        .path()
        .iter()
        .filter_map(|segment| match segment {
            Segment::Seq { index } => Some(index.to_string()),
            Segment::Map { key } => Some(key.clone()),
            Segment::Enum { variant } => Some(variant.clone()),
            Segment::Unknown => None,
        })
        .collect();
    let msg = err.inner().to_string();
    let kind = match msg
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        Some(field) => {
            loc.push(field.to_string());
            "value_error.missing"
        }
        None => "type_error",
    };
    FieldError::new(loc, msg, kind)
}

impl<T> fmt::Debug for TypedModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedModel")
            .field("name", &self.name)
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T> Schema for TypedModel<T>
where
    T: DeserializeOwned + Serialize,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, raw: &Value) -> Result<Value, ValidationError> {
        check(&self.name, &self.validator, raw)?;
        let typed = self.to_typed(raw)?;
        serde_json::to_value(&typed).map_err(|e| {
            ValidationError::new(
                &self.name,
                vec![FieldError::new(Vec::new(), e.to_string(), "value_error")],
            )
        })
    }

    fn describe(&self) -> Value {
        self.fragment.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Page {
        limit: u32,
        #[serde(default)]
        offset: u32,
    }

    fn page() -> TypedModel<Page> {
        TypedModel::new(
            "Page",
            json!({
                "type": "object",
                "properties": {
                    "limit": { "type": "integer", "minimum": 1 },
                    "offset": { "type": "integer", "minimum": 0 }
                },
                "required": ["limit"]
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_applies_serde_defaults() {
        let parsed = page().parse(&json!({ "limit": 10 })).unwrap();
        assert_eq!(parsed, json!({ "limit": 10, "offset": 0 }));
    }

    #[test]
    fn test_parse_reports_schema_errors_first() {
        let err = page().parse(&json!({ "limit": 0 })).unwrap_err();
        assert_eq!(err.errors()[0].loc, vec!["limit"]);
        assert_eq!(err.errors()[0].kind, "value_error.number.not_ge");
    }

    #[test]
    fn test_to_typed_locates_missing_fields() {
        let err = page().to_typed(&json!({})).unwrap_err();
        assert_eq!(err.errors()[0].loc, vec!["limit"]);
        assert_eq!(err.errors()[0].kind, "value_error.missing");
    }

    #[test]
    fn test_to_typed_locates_nested_type_errors() {
        #[derive(Debug, Serialize, Deserialize)]
        struct Outer {
            pages: Vec<Page>,
        }
        let model: TypedModel<Outer> = TypedModel::new("Outer", json!({})).unwrap();
        let err = model
            .to_typed(&json!({ "pages": [{ "limit": "ten" }] }))
            .unwrap_err();
        assert_eq!(err.errors()[0].loc, vec!["pages", "0", "limit"]);
        assert_eq!(err.errors()[0].kind, "type_error");
    }
}
