use super::request::HeaderVec;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Response produced by a handler or by the pipeline itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResponse {
    pub status: u16,
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// JSON response with `content-type: application/json`.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    #[must_use]
    pub fn ok_json(body: Value) -> Self {
        Self::json(200, body)
    }

    /// Plain-text response; the body is stored as a JSON string.
    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "text/plain".to_string()));
        Self {
            status,
            headers,
            body: Value::String(body.into()),
        }
    }

    /// `{"error": message}` with the given status.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name.to_ascii_lowercase()), value));
    }
}

/// Conversion of handler return values into a [`HandlerResponse`].
pub trait IntoResponse {
    fn into_response(self) -> HandlerResponse;
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> HandlerResponse {
        self
    }
}

/// A bare JSON value is a `200` JSON response.
impl IntoResponse for Value {
    fn into_response(self) -> HandlerResponse {
        HandlerResponse::ok_json(self)
    }
}

impl IntoResponse for (u16, Value) {
    fn into_response(self) -> HandlerResponse {
        HandlerResponse::json(self.0, self.1)
    }
}

impl IntoResponse for String {
    fn into_response(self) -> HandlerResponse {
        HandlerResponse::text(200, self)
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> HandlerResponse {
        HandlerResponse::text(200, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_coerces_to_ok_json() {
        let resp = json!({ "id": 1 }).into_response();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.get_header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_tuple_keeps_status() {
        let resp = (201, json!({ "id": 1 })).into_response();
        assert_eq!(resp.status, 201);
        assert_eq!(resp.body["id"], 1);
    }

    #[test]
    fn test_text_body_is_string() {
        let resp = "pong".into_response();
        assert_eq!(resp.body, Value::String("pong".to_string()));
        assert_eq!(resp.get_header("content-type"), Some("text/plain"));
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut resp = HandlerResponse::ok_json(json!({}));
        resp.set_header("Content-Type", "application/problem+json".to_string());
        assert_eq!(resp.headers.len(), 1);
        assert_eq!(resp.get_header("content-type"), Some("application/problem+json"));
    }
}
