//! # Gate Module
//!
//! [`SpecGate`] ties the pieces together for an application: it owns the
//! configuration, wraps handlers with the validation pipeline, and mounts the generated
//! OpenAPI document on the route table.
//!
//! ```rust
//! use specgate::dispatcher::{handler, Endpoint};
//! use specgate::gate::SpecGate;
//! use specgate::router::App;
//! use specgate::schema::JsonSchemaModel;
//! use specgate::server::HttpRequest;
//! use http::Method;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let gate = SpecGate::default();
//! let query = JsonSchemaModel::new(
//!     "Search",
//!     json!({ "type": "object", "properties": { "q": { "type": "string" } }, "required": ["q"] }),
//! )
//! .unwrap();
//!
//! let mut app = App::new();
//! let search = gate.validate(Endpoint::new().query(Arc::new(query)), handler(|_req| Ok(json!([]))));
//! app.add_url_rule("/search", "search", &[Method::GET], Arc::new(search)).unwrap();
//! let document = gate.register(&mut app).unwrap();
//! assert!(document["paths"]["/search"]["get"].is_object());
//!
//! let resp = app.handle(HttpRequest::new(Method::GET, "/apidoc/openapi.json"));
//! assert_eq!(resp.body["openapi"], "3.0.3");
//! assert_eq!(app.handle(HttpRequest::new(Method::GET, "/search")).status, 422);
//! ```

use crate::config::GateConfig;
use crate::dispatcher::{Endpoint, Handler, Hook, Pipeline, ValidatedHandler};
use crate::path::{PathTranslator, TranslateError};
use crate::router::{App, RouteEnumerator, RouterError};
use crate::server::HandlerResponse;
use crate::spec::{build_document, build_route_spec, RouteSpec};
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Endpoint name of the document route.
pub const OPENAPI_ENDPOINT: &str = "openapi";

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error(transparent)]
    Router(#[from] RouterError),
}

/// Configuration, path translation and validation pipeline for one application.
///
/// Default hooks and converters must be set before handlers are wrapped with
/// [`SpecGate::validate`]; already wrapped handlers keep the pipeline they were
/// created with.
#[derive(Clone)]
pub struct SpecGate {
    config: GateConfig,
    translator: PathTranslator,
    pipeline: Arc<Pipeline>,
}

impl Default for SpecGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

impl SpecGate {
    #[must_use]
    pub fn new(config: GateConfig) -> Self {
        let pipeline = Pipeline {
            validation_error_code: config.validation_error_code,
            validate_responses: config.validate_responses,
            before: None,
            after: None,
        };
        Self {
            translator: PathTranslator::new().strict(config.strict_converters),
            config,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Before hook for endpoints that declare none.
    #[must_use]
    pub fn with_before(mut self, hook: impl Hook + 'static) -> Self {
        Arc::make_mut(&mut self.pipeline).before = Some(Arc::new(hook));
        self
    }

    /// After hook for endpoints that declare none.
    #[must_use]
    pub fn with_after(mut self, hook: impl Hook + 'static) -> Self {
        Arc::make_mut(&mut self.pipeline).after = Some(Arc::new(hook));
        self
    }

    /// Document an application-specific path converter.
    #[must_use]
    pub fn with_converter(mut self, name: impl Into<String>, fragment: Value) -> Self {
        self.translator = self.translator.with_converter(name, fragment);
        self
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    #[must_use]
    pub fn translator(&self) -> &PathTranslator {
        &self.translator
    }

    /// Wrap `handler` so every call runs through the validation pipeline.
    pub fn validate(&self, endpoint: Endpoint, handler: impl Handler + 'static) -> ValidatedHandler {
        ValidatedHandler::new(endpoint, Arc::new(handler), Arc::clone(&self.pipeline))
    }

    /// One [`RouteSpec`] per documented (rule, method) of `app`.
    pub fn route_specs(&self, app: &App) -> Result<Vec<RouteSpec>, TranslateError> {
        let routes = RouteEnumerator::from_config(&self.config).enumerate(app, &self.translator)?;
        Ok(routes.iter().map(build_route_spec).collect())
    }

    pub fn build_document(&self, app: &App) -> Result<Value, TranslateError> {
        Ok(build_document(&self.config, &self.route_specs(app)?))
    }

    /// Build the document once and serve it from `GET {spec_url}`.
    pub fn register(&self, app: &mut App) -> Result<Arc<Value>, GateError> {
        let document = Arc::new(self.build_document(app)?);
        let served = Arc::clone(&document);
        let url = self.config.spec_url();
        app.route(&url, &[Method::GET], OPENAPI_ENDPOINT, move |_req| {
            Ok(HandlerResponse::ok_json(Value::clone(&served)))
        })?;
        info!(
            spec_url = %url,
            paths = document["paths"].as_object().map_or(0, |p| p.len()),
            "Document registered"
        );
        Ok(document)
    }
}
