//! # Dispatcher Module
//!
//! The per-request validation pipeline that sits between routing and application
//! handlers.
//!
//! ## Request Flow
//!
//! 1. Request validation (query → body → headers → cookies). On success the
//!    [`ValidationContext`](crate::validator::ValidationContext) is attached to the
//!    request; on failure an error response is built (status 422 by default, body is the
//!    field-error list).
//! 2. The before hook runs. After a request validation failure it receives the error
//!    response and the error, and the pipeline stops there.
//! 3. The handler runs and its return value becomes a [`HandlerResponse`](crate::server::HandlerResponse).
//! 4. If the endpoint declares response models and response validation is enabled, the
//!    body is checked against the model for its exact status. A mismatch replaces the
//!    response with `500 {"message": "response validation error"}`.
//! 5. The after hook runs with the final response and any response error.
//!
//! ## Error Handling
//!
//! Validation failures are turned into responses. Errors returned by handlers or hooks
//! are propagated unchanged; the host route table logs them and answers with a generic
//! `500`.
//!
//! ## Example
//!
//! ```rust
//! use specgate::dispatcher::{handler, Endpoint, Handler, Pipeline, ValidatedHandler};
//! use specgate::schema::JsonSchemaModel;
//! use specgate::server::HttpRequest;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let query = JsonSchemaModel::new(
//!     "Paging",
//!     json!({ "type": "object", "properties": { "limit": { "type": "integer" } } }),
//! )
//! .unwrap();
//! let list = ValidatedHandler::new(
//!     Endpoint::new().query(Arc::new(query)),
//!     Arc::new(handler(|req| Ok(req.context().and_then(|c| c.query.clone()).unwrap_or_default()))),
//!     Arc::new(Pipeline::default()),
//! );
//!
//! let mut req = HttpRequest::new(http::Method::GET, "/pets?limit=oops");
//! assert_eq!(list.call(&mut req).unwrap().status, 422);
//! ```

mod core;

pub use core::{
    handler, hook, Endpoint, Handler, HandlerRef, Hook, HookContext, HookRef, Pipeline,
    ValidatedHandler,
};
