//! Rule tokenizer.
//!
//! A rule is literal text interleaved with converter tokens of the form
//! `<converter(args):name>` or `<name>`. Text that looks like the start of a token but
//! does not complete one stays literal.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

static RULE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(
        r"<(?:(?P<converter>[A-Za-z_][A-Za-z0-9_]*)(?:\((?P<args>[^)]*)\))?:)?(?P<variable>[A-Za-z_][A-Za-z0-9_]*)>",
    )
    .expect("valid rule token regex")
});

/// Converter name used for `<name>` tokens.
pub const DEFAULT_CONVERTER: &str = "default";

/// Arguments of a converter token, e.g. `int(min=1, max=10)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConverterArgs {
    pub positional: Vec<Value>,
    pub keyword: BTreeMap<String, Value>,
}

impl ConverterArgs {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

/// One piece of a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum PathToken {
    Literal(String),
    Variable {
        converter: String,
        args: ConverterArgs,
        name: String,
    },
}

/// Split `rule` into literal runs and converter tokens, left to right.
///
/// Adjacent literal text is merged into a single [`PathToken::Literal`].
#[must_use]
pub fn tokenize(rule: &str) -> Vec<PathToken> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut last = 0;

    for caps in RULE_TOKEN.captures_iter(rule) {
        let Some(whole) = caps.get(0) else { continue };
        literal.push_str(&rule[last..whole.start()]);
        last = whole.end();

        if !literal.is_empty() {
            tokens.push(PathToken::Literal(std::mem::take(&mut literal)));
        }
        let converter = caps
            .name("converter")
            .map_or(DEFAULT_CONVERTER, |m| m.as_str())
            .to_string();
        let args = caps
            .name("args")
            .map(|m| parse_converter_args(m.as_str()))
            .unwrap_or_default();
        let name = caps
            .name("variable")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        tokens.push(PathToken::Variable {
            converter,
            args,
            name,
        });
    }

    literal.push_str(&rule[last..]);
    if !literal.is_empty() {
        tokens.push(PathToken::Literal(literal));
    }
    tokens
}

/// Parse the text between a converter's parentheses.
///
/// Items are comma separated; `name=value` items are keyword arguments. Commas inside
/// quoted strings do not split.
#[must_use]
pub fn parse_converter_args(raw: &str) -> ConverterArgs {
    let mut args = ConverterArgs::default();
    for item in split_args(raw) {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        match keyword_split(item) {
            Some((key, value)) => {
                args.keyword.insert(key.to_string(), pythonize(value.trim()));
            }
            None => args.positional.push(pythonize(item)),
        }
    }
    args
}

fn split_args(raw: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in raw.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, ',') => {
                items.push(&raw[start..i]);
                start = i + 1;
            }
            (None, _) => {}
        }
    }
    items.push(&raw[start..]);
    items
}

fn keyword_split(item: &str) -> Option<(&str, &str)> {
    let (key, value) = item.split_once('=')?;
    let key = key.trim();
    let is_ident = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    is_ident.then_some((key, value))
}

/// Interpret one argument literal: constants, integers, floats, quoted strings, and
/// bare words (kept as strings).
fn pythonize(value: &str) -> Value {
    match value {
        "True" => return Value::Bool(true),
        "False" => return Value::Bool(false),
        "None" => return Value::Null,
        _ => {}
    }
    if let Ok(i) = value.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = value.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| value.strip_prefix(*q).and_then(|v| v.strip_suffix(*q)));
    Value::String(unquoted.unwrap_or(value).to_string())
}
