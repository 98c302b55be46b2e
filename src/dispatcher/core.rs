use crate::schema::SchemaRef;
use crate::server::{HandlerResponse, HttpRequest, IntoResponse};
use crate::spec::{RequestBody, ResponseSchemas};
use crate::validator::{
    response_validation_body, validate_request, validate_response, RequestSchemas,
    RequestValidationError, ResponseValidationError, RESPONSE_VALIDATION_STATUS,
};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info_span, warn};

/// Everything a hook can observe at its point in the pipeline.
///
/// The before hook sees `response` and `request_error` only when request validation
/// failed; the after hook always sees the final response and, when response validation
/// failed, the `response_error`.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub request: &'a HttpRequest,
    pub response: Option<&'a HandlerResponse>,
    pub request_error: Option<&'a RequestValidationError>,
    pub response_error: Option<&'a ResponseValidationError>,
}

/// Observer invoked before or after the handler.
///
/// A hook cannot change the flow of the pipeline; an `Err` is propagated to the caller.
pub trait Hook: Send + Sync {
    fn call(&self, ctx: &HookContext<'_>) -> anyhow::Result<()>;
}

impl<F> Hook for F
where
    F: Fn(&HookContext<'_>) -> anyhow::Result<()> + Send + Sync,
{
    fn call(&self, ctx: &HookContext<'_>) -> anyhow::Result<()> {
        self(ctx)
    }
}

pub type HookRef = Arc<dyn Hook>;

/// Turn a closure into a [`Hook`] with its argument type inferred.
pub fn hook<F>(f: F) -> F
where
    F: Fn(&HookContext<'_>) -> anyhow::Result<()> + Send + Sync,
{
    f
}

/// Application code bound to a route.
pub trait Handler: Send + Sync {
    fn call(&self, req: &mut HttpRequest) -> anyhow::Result<HandlerResponse>;

    /// Validation and documentation declared for this handler, if any.
    fn endpoint(&self) -> Option<&Endpoint> {
        None
    }
}

impl<F, R> Handler for F
where
    F: Fn(&HttpRequest) -> anyhow::Result<R> + Send + Sync,
    R: IntoResponse,
{
    fn call(&self, req: &mut HttpRequest) -> anyhow::Result<HandlerResponse> {
        self(req).map(IntoResponse::into_response)
    }
}

/// Turn a closure into a [`Handler`], letting the compiler infer its argument and error types.
///
/// ```
/// use specgate::dispatcher::handler;
/// use serde_json::json;
///
/// let ping = handler(|_req| Ok(json!({ "pong": true })));
/// # let _ = ping;
/// ```
pub fn handler<F, R>(f: F) -> F
where
    F: Fn(&HttpRequest) -> anyhow::Result<R> + Send + Sync,
    R: IntoResponse,
{
    f
}

pub type HandlerRef = Arc<dyn Handler>;

/// Declared models, hooks and documentation for one handler.
#[derive(Clone, Default)]
pub struct Endpoint {
    pub request: RequestSchemas,
    pub responses: Option<ResponseSchemas>,
    pub before: Option<HookRef>,
    pub after: Option<HookRef>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl Endpoint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(mut self, model: SchemaRef) -> Self {
        self.request.query = Some(model);
        self
    }

    /// JSON body model.
    #[must_use]
    pub fn json(self, model: SchemaRef) -> Self {
        self.body(RequestBody::json(model))
    }

    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.request.body = Some(body);
        self
    }

    #[must_use]
    pub fn headers(mut self, model: SchemaRef) -> Self {
        self.request.headers = Some(model);
        self
    }

    #[must_use]
    pub fn cookies(mut self, model: SchemaRef) -> Self {
        self.request.cookies = Some(model);
        self
    }

    #[must_use]
    pub fn responses(mut self, responses: ResponseSchemas) -> Self {
        self.responses = Some(responses);
        self
    }

    #[must_use]
    pub fn before(mut self, hook: impl Hook + 'static) -> Self {
        self.before = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn after(mut self, hook: impl Hook + 'static) -> Self {
        self.after = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("request", &self.request)
            .field("responses", &self.responses)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("summary", &self.summary)
            .field("description", &self.description)
            .field("tags", &self.tags)
            .finish()
    }
}

/// The per-request validate → before → handler → validate → after sequence.
///
/// Holds only settings and gate-level default hooks, so one pipeline serves every
/// endpoint concurrently.
#[derive(Clone)]
pub struct Pipeline {
    pub validation_error_code: u16,
    pub validate_responses: bool,
    pub before: Option<HookRef>,
    pub after: Option<HookRef>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            validation_error_code: 422,
            validate_responses: true,
            before: None,
            after: None,
        }
    }
}

impl Pipeline {
    /// Run `handler` for `req` under the validation declared by `endpoint`.
    ///
    /// Validation failures become responses: the configured status with the field-error
    /// list for the request side, `500 {"message": "response validation error"}` for the
    /// response side. Handler and hook errors are returned unchanged.
    pub fn run(
        &self,
        endpoint: &Endpoint,
        handler: &dyn Handler,
        req: &mut HttpRequest,
    ) -> anyhow::Result<HandlerResponse> {
        let span = info_span!(
            "validate",
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            endpoint = req.endpoint.as_deref().unwrap_or_default(),
        );
        let _entered = span.enter();

        let before = endpoint.before.as_ref().or(self.before.as_ref());
        let after = endpoint.after.as_ref().or(self.after.as_ref());

        match validate_request(req, &endpoint.request) {
            Ok(ctx) => req.context = Some(ctx),
            Err(err) => {
                warn!(
                    section = %err.section,
                    model = %err.error.model,
                    error_count = err.error.errors().len(),
                    status = self.validation_error_code,
                    "Request validation failed"
                );
                let response =
                    HandlerResponse::json(self.validation_error_code, err.error.to_json());
                if let Some(hook) = before {
                    hook.call(&HookContext {
                        request: req,
                        response: Some(&response),
                        request_error: Some(&err),
                        response_error: None,
                    })?;
                }
                return Ok(response);
            }
        }

        if let Some(hook) = before {
            hook.call(&HookContext {
                request: req,
                response: None,
                request_error: None,
                response_error: None,
            })?;
        }

        let start = Instant::now();
        let mut response = handler.call(req)?;
        debug!(
            status = response.status,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Handler complete"
        );

        let response_error = match validate_response(
            &response,
            endpoint.responses.as_ref(),
            self.validate_responses,
        ) {
            Ok(check) => {
                debug!(?check, status = response.status, "Response checked");
                None
            }
            Err(err) => {
                error!(
                    status = err.status,
                    model = %err.error.model,
                    errors = %err.error.to_json(),
                    "Response validation failed"
                );
                response =
                    HandlerResponse::json(RESPONSE_VALIDATION_STATUS, response_validation_body());
                Some(err)
            }
        };

        if let Some(hook) = after {
            hook.call(&HookContext {
                request: req,
                response: Some(&response),
                request_error: None,
                response_error: response_error.as_ref(),
            })?;
        }
        Ok(response)
    }
}

/// A handler wrapped with the validation pipeline.
#[derive(Clone)]
pub struct ValidatedHandler {
    endpoint: Arc<Endpoint>,
    inner: HandlerRef,
    pipeline: Arc<Pipeline>,
}

impl ValidatedHandler {
    pub fn new(endpoint: Endpoint, inner: HandlerRef, pipeline: Arc<Pipeline>) -> Self {
        Self {
            endpoint: Arc::new(endpoint),
            inner,
            pipeline,
        }
    }
}

impl Handler for ValidatedHandler {
    fn call(&self, req: &mut HttpRequest) -> anyhow::Result<HandlerResponse> {
        self.pipeline.run(&self.endpoint, self.inner.as_ref(), req)
    }

    fn endpoint(&self) -> Option<&Endpoint> {
        Some(&self.endpoint)
    }
}
