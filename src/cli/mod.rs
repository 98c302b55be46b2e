//! # CLI Module
//!
//! Command-line access to the path translator and the document assembler.
//!
//! ## Commands
//!
//! ### `translate`
//!
//! Print the OpenAPI path and parameters for one rule:
//!
//! ```bash
//! specgate translate '/users/<int(min=1):id>'
//! ```
//!
//! Options:
//! - `--strict` - Fail on unknown converters
//!
//! ### `spec`
//!
//! Assemble the OpenAPI document for a YAML route manifest (see [`RouteManifest`]):
//!
//! ```bash
//! specgate spec --routes routes.yaml --config specgate.yaml --output openapi.json
//! ```
//!
//! Logging goes to stderr and is configured with the `SPECGATE_LOG_*` variables.

mod commands;
mod manifest;


pub use commands::{run_cli, Cli, Commands};
pub use manifest::{ManifestBody, ManifestModel, ManifestRoute, RouteManifest};
