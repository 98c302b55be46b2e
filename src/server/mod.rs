//! # Server Module
//!
//! Request and response types shared by the host route table, the validation pipeline
//! and handlers. The crate does not own sockets: whatever HTTP server hosts the
//! application converts its native request into an [`HttpRequest`] and writes the
//! returned [`HandlerResponse`] back out.

mod request;
mod response;

pub use request::{
    parse_cookies, parse_query_string, HeaderVec, HttpRequest, ParamVec, MAX_INLINE_HEADERS,
    MAX_INLINE_PARAMS,
};
pub use response::{HandlerResponse, IntoResponse};
