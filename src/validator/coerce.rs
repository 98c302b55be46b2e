//! String-to-JSON coercion for query, header and cookie values.
//!
//! These sections arrive as strings; the declared model's property types decide how
//! each value is decoded before validation. Values that do not decode stay strings so
//! the model reports a type error for them.

use serde_json::{Map, Value};
use std::sync::Arc;

fn property_type(schema: Option<&Value>) -> Option<&str> {
    schema.and_then(|s| s.get("type")).and_then(Value::as_str)
}

/// Decode one raw value according to its property schema.
#[must_use]
pub fn decode_value(raw: &str, schema: Option<&Value>) -> Value {
    match property_type(schema) {
        Some("integer") => raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        Some("number") => raw
            .parse::<f64>()
            .ok()
            .and_then(|f| serde_json::Number::from_f64(f).map(Value::Number))
            .unwrap_or_else(|| Value::String(raw.to_string())),
        Some("boolean") => raw
            .parse::<bool>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        Some("object") => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        }
        _ => Value::String(raw.to_string()),
    }
}

/// Build the JSON object validated for a string-valued section.
///
/// Repeated names collect into an array (also split on `,`) when the property is an
/// array; otherwise the first value wins. With `case_insensitive`, names are matched to
/// the model's property names ignoring ASCII case and renamed to them.
#[must_use]
pub fn coerce_pairs(pairs: &[(Arc<str>, String)], schema: &Value, case_insensitive: bool) -> Value {
    let properties = schema.get("properties").and_then(Value::as_object);
    let mut out = Map::new();

    for (name, raw) in pairs {
        let (key, prop) = match properties {
            Some(props) if case_insensitive => props
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(k, v)| (k.clone(), Some(v)))
                .unwrap_or_else(|| (name.to_string(), None)),
            Some(props) => (name.to_string(), props.get(name.as_ref())),
            None => (name.to_string(), None),
        };

        if property_type(prop) == Some("array") {
            let items = prop.and_then(|p| p.get("items"));
            let decoded = raw
                .split(',')
                .filter(|s| !s.is_empty())
                .map(|part| decode_value(part.trim(), items));
            if let Value::Array(values) = out.entry(key).or_insert_with(|| Value::Array(Vec::new()))
            {
                values.extend(decoded);
            }
        } else if !out.contains_key(&key) {
            out.insert(key, decode_value(raw, prop));
        }
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[(&str, &str)]) -> Vec<(Arc<str>, String)> {
        items
            .iter()
            .map(|(k, v)| (Arc::from(*k), v.to_string()))
            .collect()
    }

    #[test]
    fn test_primitives_follow_property_types() {
        let schema = json!({
            "properties": {
                "limit": { "type": "integer" },
                "ratio": { "type": "number" },
                "debug": { "type": "boolean" },
                "name": { "type": "string" }
            }
        });
        let value = coerce_pairs(
            &pairs(&[("limit", "10"), ("ratio", "0.5"), ("debug", "true"), ("name", "42")]),
            &schema,
            false,
        );
        assert_eq!(
            value,
            json!({ "limit": 10, "ratio": 0.5, "debug": true, "name": "42" })
        );
    }

    #[test]
    fn test_undecodable_values_stay_strings() {
        let schema = json!({ "properties": { "x": { "type": "integer" } } });
        let value = coerce_pairs(&pairs(&[("x", "notanint")]), &schema, false);
        assert_eq!(value, json!({ "x": "notanint" }));
    }

    #[test]
    fn test_arrays_collect_repeats_and_commas() {
        let schema = json!({
            "properties": { "ids": { "type": "array", "items": { "type": "integer" } } }
        });
        let value = coerce_pairs(&pairs(&[("ids", "1,2"), ("ids", "3")]), &schema, false);
        assert_eq!(value, json!({ "ids": [1, 2, 3] }));
    }

    #[test]
    fn test_first_value_wins_for_scalars() {
        let value = coerce_pairs(&pairs(&[("q", "a"), ("q", "b")]), &json!({}), false);
        assert_eq!(value, json!({ "q": "a" }));
    }

    #[test]
    fn test_case_insensitive_names_take_property_spelling() {
        let schema = json!({ "properties": { "X-Token": { "type": "string" } } });
        let value = coerce_pairs(&pairs(&[("x-token", "abc")]), &schema, true);
        assert_eq!(value, json!({ "X-Token": "abc" }));
    }
}
