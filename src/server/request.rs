use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::validator::ValidationContext;
use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;

/// Parameters stored inline before spilling to the heap.
pub const MAX_INLINE_PARAMS: usize = 8;
/// Headers/cookies stored inline before spilling to the heap.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Ordered name/value pairs; repeated names are kept.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;
/// Ordered header or cookie pairs. Header names are stored lowercase.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// An in-flight request as seen by the validation pipeline and handlers.
///
/// The host fills in method, path, query, headers, cookies and body; routing fills
/// `path_params` and `endpoint`; the pipeline attaches `context` once request
/// validation succeeds.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub request_id: RequestId,
    pub method: Method,
    /// Path without the query string.
    pub path: String,
    pub query_params: ParamVec,
    pub headers: HeaderVec,
    pub cookies: HeaderVec,
    pub body: Vec<u8>,
    pub path_params: ParamVec,
    /// Endpoint name of the matched rule.
    pub endpoint: Option<String>,
    pub context: Option<ValidationContext>,
}

impl HttpRequest {
    /// Build a request for `target`, which may carry a query string (`/users?limit=10`).
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };
        Self {
            request_id: RequestId::new(),
            method,
            path: if path.is_empty() { "/" } else { path }.to_string(),
            query_params: query.map(parse_query_string).unwrap_or_default(),
            headers: HeaderVec::new(),
            cookies: HeaderVec::new(),
            body: Vec::new(),
            path_params: ParamVec::new(),
            endpoint: None,
            context: None,
        }
    }

    /// Append a header. `Cookie` headers are also parsed into `cookies`, and a valid
    /// `x-request-id` replaces the generated id.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        if name == "cookie" {
            self.cookies.extend(parse_cookies(&value));
        }
        if name == REQUEST_ID_HEADER {
            self.request_id = RequestId::from_header_or_new(Some(&value));
        }
        self.headers.push((Arc::from(name), value));
        self
    }

    #[must_use]
    pub fn with_body(mut self, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        self.headers.retain(|(k, _)| k.as_ref() != "content-type");
        self.headers
            .push((Arc::from("content-type"), content_type.to_string()));
        self.body = body.into();
        self
    }

    /// Serialize `value` as the body with `content-type: application/json`.
    #[must_use]
    pub fn with_json(self, value: &serde_json::Value) -> Self {
        let bytes = value.to_string().into_bytes();
        self.with_body("application/json", bytes)
    }

    /// Header value by name (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// First query value for `name`.
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn get_cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Media type without parameters (`application/json; charset=utf-8` → `application/json`).
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.get_header("content-type")
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.eq_ignore_ascii_case("application/json"))
    }

    /// Validated sections, present once request validation has run and passed.
    #[must_use]
    pub fn context(&self) -> Option<&ValidationContext> {
        self.context.as_ref()
    }
}

/// Parse a `Cookie` header value into name/value pairs.
#[must_use]
pub fn parse_cookies(header: &str) -> HeaderVec {
    header
        .split(';')
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            if name.is_empty() {
                return None;
            }
            let raw = parts.next().unwrap_or("").trim().trim_matches('"');
            let value = urlencoding::decode(raw)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            Some((Arc::from(name), value))
        })
        .collect()
}

/// Parse an `application/x-www-form-urlencoded` query string, keeping repeats.
#[must_use]
pub fn parse_query_string(query: &str) -> ParamVec {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
        .collect()
}
