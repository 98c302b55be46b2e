use super::matcher::RuleMatcher;
use super::static_files::{StaticFiles, STATIC_ENDPOINT};
use crate::dispatcher::{handler, HandlerRef};
use crate::server::{HandlerResponse, HttpRequest, IntoResponse, ParamVec};
use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Rule of the built-in static file route.
pub const STATIC_RULE: &str = "/static/<path:filename>";

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("rule `{rule}` does not compile to a matcher: {source}")]
    InvalidRule {
        rule: String,
        #[source]
        source: regex::Error,
    },
    #[error("endpoint `{0}` is already bound to a different handler")]
    EndpointConflict(String),
}

/// One registered rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub rule: String,
    pub endpoint: String,
    /// Declared methods plus `HEAD` (when `GET` is present) and `OPTIONS`.
    pub methods: Vec<Method>,
    automatic_options: bool,
    matcher: RuleMatcher,
}

impl Rule {
    #[must_use]
    pub fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    fn allow_header(&self) -> String {
        self.methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Result of resolving a request against the route table.
#[derive(Debug)]
pub enum Resolution<'a> {
    Found {
        rule: &'a Rule,
        path_params: ParamVec,
    },
    /// The path matched rules, none of which accept the method.
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// Minimal in-process route table: rules with converters, endpoint names and method sets.
///
/// Rules are matched in registration order. `HEAD` is served by the `GET` handler with
/// the body dropped; `OPTIONS` is answered automatically unless declared.
pub struct App {
    rules: Vec<Rule>,
    view_functions: HashMap<String, HandlerRef>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Route table containing only the static file rule (with no directory to serve).
    #[must_use]
    pub fn new() -> Self {
        let mut app = Self {
            rules: Vec::new(),
            view_functions: HashMap::new(),
        };
        if let Err(e) = app.add_url_rule(
            STATIC_RULE,
            STATIC_ENDPOINT,
            &[Method::GET],
            Arc::new(StaticFiles::default()),
        ) {
            error!(error = %e, "Failed to register static route");
        }
        app
    }

    /// Serve files below `dir` from the static rule.
    #[must_use]
    pub fn with_static_folder(mut self, dir: impl Into<PathBuf>) -> Self {
        self.view_functions.insert(
            STATIC_ENDPOINT.to_string(),
            Arc::new(StaticFiles::new(Some(dir.into()))),
        );
        self
    }

    /// Register `rule` for `methods`, bound to `endpoint`.
    ///
    /// Several rules may share an endpoint as long as they share its handler.
    pub fn add_url_rule(
        &mut self,
        rule: &str,
        endpoint: &str,
        methods: &[Method],
        handler: HandlerRef,
    ) -> Result<(), RouterError> {
        if let Some(existing) = self.view_functions.get(endpoint) {
            if !Arc::ptr_eq(existing, &handler) {
                return Err(RouterError::EndpointConflict(endpoint.to_string()));
            }
        }
        let matcher = RuleMatcher::compile(rule).map_err(|source| RouterError::InvalidRule {
            rule: rule.to_string(),
            source,
        })?;

        let mut all: Vec<Method> = Vec::with_capacity(methods.len() + 2);
        for m in methods {
            if !all.contains(m) {
                all.push(m.clone());
            }
        }
        if all.contains(&Method::GET) && !all.contains(&Method::HEAD) {
            all.push(Method::HEAD);
        }
        let automatic_options = !all.contains(&Method::OPTIONS);
        if automatic_options {
            all.push(Method::OPTIONS);
        }

        info!(
            rule = %rule,
            endpoint = %endpoint,
            methods = ?all,
            pattern = %matcher.as_str(),
            "Rule registered"
        );
        self.rules.push(Rule {
            rule: rule.to_string(),
            endpoint: endpoint.to_string(),
            methods: all,
            automatic_options,
            matcher,
        });
        self.view_functions.insert(endpoint.to_string(), handler);
        Ok(())
    }

    /// Register a closure for `rule`.
    pub fn route<F, R>(
        &mut self,
        rule: &str,
        methods: &[Method],
        endpoint: &str,
        f: F,
    ) -> Result<(), RouterError>
    where
        F: Fn(&HttpRequest) -> anyhow::Result<R> + Send + Sync + 'static,
        R: IntoResponse + 'static,
    {
        self.add_url_rule(rule, endpoint, methods, Arc::new(handler(f)))
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn view_function(&self, endpoint: &str) -> Option<&HandlerRef> {
        self.view_functions.get(endpoint)
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_> {
        let mut allowed: Vec<Method> = Vec::new();
        for rule in &self.rules {
            let Some(path_params) = rule.matcher.matches(path) else {
                continue;
            };
            if rule.allows(method) {
                return Resolution::Found { rule, path_params };
            }
            for m in &rule.methods {
                if !allowed.contains(m) {
                    allowed.push(m.clone());
                }
            }
        }
        if allowed.is_empty() {
            Resolution::NotFound
        } else {
            Resolution::MethodNotAllowed(allowed)
        }
    }

    /// Route and run one request.
    ///
    /// Handler errors are logged and answered with `500 {"error": "Internal Server Error"}`.
    pub fn handle(&self, mut req: HttpRequest) -> HandlerResponse {
        let (rule, path_params) = match self.resolve(&req.method, &req.path) {
            Resolution::Found { rule, path_params } => (rule, path_params),
            Resolution::MethodNotAllowed(allowed) => {
                debug!(method = %req.method, path = %req.path, "Method not allowed");
                let mut resp = HandlerResponse::error(405, "Method Not Allowed");
                let allow: Vec<&str> = allowed.iter().map(Method::as_str).collect();
                resp.set_header("allow", allow.join(", "));
                return resp;
            }
            Resolution::NotFound => {
                debug!(method = %req.method, path = %req.path, "No rule matched");
                return HandlerResponse::error(404, "Not Found");
            }
        };

        if req.method == Method::OPTIONS && rule.automatic_options {
            let mut resp = HandlerResponse::json(200, Value::Null);
            resp.set_header("allow", rule.allow_header());
            return resp;
        }

        req.path_params = path_params;
        req.endpoint = Some(rule.endpoint.clone());

        let Some(view) = self.view_functions.get(&rule.endpoint) else {
            error!(endpoint = %rule.endpoint, "No handler bound to endpoint");
            return HandlerResponse::error(500, "Internal Server Error");
        };

        match view.call(&mut req) {
            Ok(mut resp) => {
                if req.method == Method::HEAD {
                    resp.body = Value::Null;
                }
                resp
            }
            Err(e) => {
                error!(
                    request_id = %req.request_id,
                    endpoint = %rule.endpoint,
                    error = %format!("{e:#}"),
                    "Handler failed"
                );
                HandlerResponse::error(500, "Internal Server Error")
            }
        }
    }
}
