//! # Validator Module
//!
//! Request and response validation against declared models.
//!
//! ## Request side
//!
//! [`validate_request`] checks up to four sections of a request, always in the order
//! query → body → headers → cookies, and stops at the first section that fails. Query,
//! header and cookie values arrive as strings and are decoded using the model's
//! property types before validation (see [`coerce`]). A JSON body is decoded from its
//! bytes; other bodies are passed through as a string.
//!
//! ## Response side
//!
//! [`validate_response`] looks up the model registered for the response's exact status
//! code and validates the body. The pipeline replaces a failing response with
//! `500 {"message": "response validation error"}`.

pub mod coerce;
mod request;
mod response;

pub use request::{
    validate_request, RequestSchemas, RequestValidationError, Section, ValidationContext,
};
pub use response::{
    response_validation_body, validate_response, ResponseCheck, ResponseValidationError,
    RESPONSE_VALIDATION_STATUS,
};
