use crate::path::{tokenize, ConverterArgs, PathToken};
use crate::server::ParamVec;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

const UUID_PATTERN: &str =
    "[A-Fa-f0-9]{8}-[A-Fa-f0-9]{4}-[A-Fa-f0-9]{4}-[A-Fa-f0-9]{4}-[A-Fa-f0-9]{12}";

#[derive(Debug, Clone)]
struct Capture {
    name: Arc<str>,
    min: Option<i64>,
    max: Option<i64>,
}

impl Capture {
    fn accepts(&self, value: &str) -> bool {
        if self.min.is_none() && self.max.is_none() {
            return true;
        }
        let Ok(n) = value.parse::<i64>() else {
            return false;
        };
        self.min.is_none_or(|min| n >= min) && self.max.is_none_or(|max| n <= max)
    }
}

/// A rule compiled into an anchored regex plus per-variable checks.
#[derive(Debug, Clone)]
pub struct RuleMatcher {
    regex: Regex,
    captures: Vec<Capture>,
}

impl RuleMatcher {
    pub fn compile(rule: &str) -> Result<Self, regex::Error> {
        let mut pattern = String::with_capacity(rule.len() * 2);
        pattern.push('^');
        let mut captures = Vec::new();

        for token in tokenize(rule) {
            match token {
                PathToken::Literal(text) => pattern.push_str(&regex::escape(&text)),
                PathToken::Variable {
                    converter,
                    args,
                    name,
                    ..
                } => {
                    pattern.push('(');
                    pattern.push_str(&converter_pattern(&converter, &args));
                    pattern.push(')');
                    let bound = |key: &str| args.get(key).and_then(Value::as_i64);
                    let (min, max) = if converter == "int" {
                        (bound("min"), bound("max"))
                    } else {
                        (None, None)
                    };
                    captures.push(Capture {
                        name: Arc::from(name),
                        min,
                        max,
                    });
                }
            }
        }
        pattern.push('$');

        Ok(Self {
            regex: Regex::new(&pattern)?,
            captures,
        })
    }

    /// Path parameters when `path` matches, in rule order.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<ParamVec> {
        let caps = self.regex.captures(path)?;
        let mut params = ParamVec::new();
        for (i, capture) in self.captures.iter().enumerate() {
            let value = caps.get(i + 1)?.as_str();
            if !capture.accepts(value) {
                return None;
            }
            params.push((Arc::clone(&capture.name), value.to_string()));
        }
        Some(params)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Regex body for one converter. Unregistered converters match a single segment.
fn converter_pattern(converter: &str, args: &ConverterArgs) -> String {
    match converter {
        "int" => r"\d+".to_string(),
        "float" => r"\d+\.\d+".to_string(),
        "uuid" => UUID_PATTERN.to_string(),
        "path" => "[^/].*?".to_string(),
        "any" => {
            let choices: Vec<String> = args
                .positional
                .iter()
                .map(|v| regex::escape(&plain(v)))
                .collect();
            if choices.is_empty() {
                // Nothing to choose from, so nothing matches.
                return r"\b\B".to_string();
            }
            format!("(?:{})", choices.join("|"))
        }
        "string" => {
            let len = |key: &str| args.get(key).and_then(Value::as_u64);
            match (len("length"), len("minLength"), len("maxLength")) {
                (Some(n), _, _) => format!("[^/]{{{n}}}"),
                (None, None, None) => "[^/]+".to_string(),
                (None, min, max) => format!(
                    "[^/]{{{},{}}}",
                    min.unwrap_or(1),
                    max.map(|m| m.to_string()).unwrap_or_default()
                ),
            }
        }
        _ => "[^/]+".to_string(),
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
