//! # specgate
//!
//! **specgate** sits between a rule-based HTTP routing layer and application handlers.
//! It documents routes as an OpenAPI 3 document and validates every request (and
//! optionally every response) against declared models before and after the handler
//! runs.
//!
//! ## Architecture
//!
//! - **[`path`]** - Translates rules such as `/users/<int(min=1):id>` into OpenAPI paths
//!   and path parameter schemas
//! - **[`schema`]** - The `Schema` capability and its JSON Schema / serde-backed models
//! - **[`validator`]** - Request (query, body, headers, cookies) and response validation
//! - **[`dispatcher`]** - The per-request validate → hook → handler → validate → hook pipeline
//! - **[`router`]** - A minimal in-process route table and the route enumerator
//! - **[`spec`]** - Route metadata and OpenAPI document assembly
//! - **[`gate`]** - [`SpecGate`], the application-facing entry point
//! - **[`config`]** - Gate configuration from defaults, YAML and environment
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `specgate` command-line tool
//!
//! ### Request Flow
//!
//! ```text
//! App::handle ─▶ resolve rule ─▶ ValidatedHandler ─▶ Pipeline::run
//!                                                     ├─ validate_request ──✗──▶ 422 + before hook
//!                                                     ├─ before hook
//!                                                     ├─ handler
//!                                                     ├─ validate_response ─✗──▶ 500
//!                                                     └─ after hook
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use specgate::dispatcher::{handler, Endpoint};
//! use specgate::schema::JsonSchemaModel;
//! use specgate::spec::ResponseSchemas;
//! use specgate::{App, HttpRequest, SpecGate};
//! use http::Method;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let gate = SpecGate::default();
//! let user = JsonSchemaModel::new(
//!     "User",
//!     json!({ "type": "object", "properties": { "id": { "type": "integer" } }, "required": ["id"] }),
//! )
//! .unwrap();
//!
//! let mut app = App::new();
//! let get_user = gate.validate(
//!     Endpoint::new().responses(ResponseSchemas::new().with(200, Arc::new(user))),
//!     handler(|req| Ok(json!({ "id": req.get_path_param("id").unwrap_or("0").parse::<i64>()? }))),
//! );
//! app.add_url_rule("/users/<int:id>", "get_user", &[Method::GET], Arc::new(get_user))
//!     .unwrap();
//! gate.register(&mut app).unwrap();
//!
//! let resp = app.handle(HttpRequest::new(Method::GET, "/users/7"));
//! assert_eq!(resp.body, json!({ "id": 7 }));
//! ```

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod gate;
pub mod ids;
pub mod logging;
pub mod path;
pub mod router;
pub mod schema;
pub mod server;
pub mod spec;
pub mod validator;

pub use config::GateConfig;
pub use dispatcher::{Endpoint, Handler, Hook, HookContext};
pub use gate::{GateError, SpecGate};
pub use path::{PathSpec, PathTranslator};
pub use router::App;
pub use server::{HandlerResponse, HttpRequest};
pub use validator::ValidationContext;
