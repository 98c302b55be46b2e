//! # Spec Module
//!
//! Route metadata and OpenAPI document assembly.
//!
//! At startup every enumerated (rule, method, handler) triple is turned into a
//! [`RouteSpec`] by [`build_route_spec`]; [`build_document`] then assembles the
//! OpenAPI document served from the configured spec URL. Both run once; the results are
//! shared read-only across request threads.

mod build;
mod document;
mod types;

pub use build::{build_route_spec, extract_parameters};
pub use document::{build_document, validation_error_schema, VALIDATION_ERROR_COMPONENT};
pub use types::{
    ParameterDescriptor, ParameterLocation, RequestBody, ResponseSchemas, RouteSpec,
};
