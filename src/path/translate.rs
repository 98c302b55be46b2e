use super::parse::{tokenize, ConverterArgs, PathToken};
use crate::spec::ParameterDescriptor;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Normalized OpenAPI path plus the parameters its variables describe.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSpec {
    /// Rule with every typed variable rewritten as `{name}`.
    pub normalized: String,
    /// One descriptor per typed variable, in order of appearance.
    pub parameters: Vec<ParameterDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("variable `{name}` is used more than once in rule `{rule}`")]
    DuplicateVariable { rule: String, name: String },
    #[error("unknown converter `{converter}` for variable `{name}` in rule `{rule}`")]
    UnknownConverter {
        rule: String,
        converter: String,
        name: String,
    },
}

/// Turns routing rules into OpenAPI paths and path parameters.
///
/// Holds only configuration; `translate` has no side effects besides logging, so the
/// same rule always yields the same [`PathSpec`].
#[derive(Debug, Clone, Default)]
pub struct PathTranslator {
    custom: BTreeMap<String, Value>,
    strict: bool,
}

impl PathTranslator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on unknown converters instead of keeping them as literal text.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Document an application-specific converter with a fixed schema fragment.
    #[must_use]
    pub fn with_converter(mut self, name: impl Into<String>, fragment: Value) -> Self {
        self.custom.insert(name.into(), fragment);
        self
    }

    /// True when `converter` has a schema (built in or registered).
    #[must_use]
    pub fn knows(&self, converter: &str) -> bool {
        self.custom.contains_key(converter) || builtin_schema(converter, &ConverterArgs::default()).is_some()
    }

    /// Schema fragment for one converter token, `None` when the converter is unknown.
    #[must_use]
    pub fn converter_schema(&self, converter: &str, args: &ConverterArgs) -> Option<Value> {
        builtin_schema(converter, args).or_else(|| self.custom.get(converter).cloned())
    }

    pub fn translate(&self, rule: &str) -> Result<PathSpec, TranslateError> {
        self.translate_tokens(rule, &tokenize(rule))
    }

    pub(crate) fn translate_tokens(
        &self,
        rule: &str,
        tokens: &[PathToken],
    ) -> Result<PathSpec, TranslateError> {
        let mut normalized = String::with_capacity(rule.len());
        let mut parameters = Vec::new();
        let mut seen = HashSet::new();

        for token in tokens {
            match token {
                PathToken::Literal(text) => normalized.push_str(text),
                PathToken::Variable {
                    converter,
                    args,
                    name,
                    ..
                } => {
                    if !seen.insert(name.as_str()) {
                        return Err(TranslateError::DuplicateVariable {
                            rule: rule.to_string(),
                            name: name.clone(),
                        });
                    }
                    let schema = match self.converter_schema(converter, args) {
                        Some(schema) => schema,
                        None if self.strict => {
                            return Err(TranslateError::UnknownConverter {
                                rule: rule.to_string(),
                                converter: converter.clone(),
                                name: name.clone(),
                            });
                        }
                        None => {
                            warn!(
                                rule = %rule,
                                converter = %converter,
                                variable = %name,
                                "Unknown path converter; documenting variable as a string"
                            );
                            json!({ "type": "string" })
                        }
                    };
                    normalized.push('{');
                    normalized.push_str(name);
                    normalized.push('}');
                    parameters.push(ParameterDescriptor::path(name.clone(), schema));
                }
            }
        }

        Ok(PathSpec {
            normalized,
            parameters,
        })
    }
}

fn builtin_schema(converter: &str, args: &ConverterArgs) -> Option<Value> {
    let schema = match converter {
        "any" => json!({
            "type": "array",
            "items": { "type": "string", "enum": args.positional },
        }),
        "int" => {
            let mut schema = object(json!({ "type": "integer", "format": "int32" }));
            if let Some(max) = args.get("max") {
                schema.insert("maximum".to_string(), max.clone());
            }
            if let Some(min) = args.get("min") {
                schema.insert("minimum".to_string(), min.clone());
            }
            Value::Object(schema)
        }
        "float" => json!({ "type": "number", "format": "float" }),
        "uuid" => json!({ "type": "string", "format": "uuid" }),
        "path" => json!({ "type": "string", "format": "path" }),
        "string" => {
            let mut schema = object(json!({ "type": "string" }));
            for prop in ["length", "maxLength", "minLength"] {
                if let Some(value) = args.get(prop) {
                    schema.insert(prop.to_string(), value.clone());
                }
            }
            Value::Object(schema)
        }
        "default" => json!({ "type": "string" }),
        _ => return None,
    };
    Some(schema)
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
