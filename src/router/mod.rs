//! # Router Module
//!
//! A minimal in-process route table and the enumerator that walks it.
//!
//! ## Overview
//!
//! [`App`] holds rules written in converter syntax (`/users/<int(min=1):id>`), each bound
//! to an endpoint name, a method set and a [`Handler`](crate::dispatcher::Handler). It
//! compiles every rule to an anchored regex at registration, adds `HEAD` for `GET` rules
//! and answers `OPTIONS` automatically. A `/static/<path:filename>` rule is always
//! present.
//!
//! [`RouteEnumerator`] walks the registered rules at startup, skips documentation and
//! static routes, and yields `(rule, method, handler)` triples with their translated
//! [`PathSpec`](crate::path::PathSpec).
//!
//! ## Example
//!
//! ```rust
//! use specgate::router::App;
//! use specgate::server::HttpRequest;
//! use http::Method;
//! use serde_json::json;
//!
//! let mut app = App::new();
//! app.route("/pets/<int:id>", &[Method::GET], "get_pet", |req| {
//!     Ok(json!({ "id": req.get_path_param("id") }))
//! })
//! .unwrap();
//!
//! let resp = app.handle(HttpRequest::new(Method::GET, "/pets/7"));
//! assert_eq!(resp.body["id"], "7");
//! assert_eq!(app.handle(HttpRequest::new(Method::DELETE, "/pets/7")).status, 405);
//! ```

mod core;
mod enumerate;
mod matcher;
mod static_files;

pub use core::{App, Resolution, Rule, RouterError, STATIC_RULE};
pub use enumerate::{EnumeratedRoute, RouteEnumerator};
pub use matcher::RuleMatcher;
pub use static_files::{StaticFiles, STATIC_ENDPOINT};
