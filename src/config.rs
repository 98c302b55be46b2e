//! # Configuration Module
//!
//! Gate-wide settings: document metadata, where the document is mounted, and how the
//! validation pipeline reports failures.
//!
//! ## Sources
//!
//! - [`GateConfig::default`]
//! - a YAML file via [`GateConfig::from_yaml_file`] (missing keys take defaults)
//! - environment variables via [`GateConfig::from_env`]
//!
//! ## Environment Variables
//!
//! | variable | field |
//! |----------|-------|
//! | `SPECGATE_TITLE` | `title` |
//! | `SPECGATE_VERSION` | `version` |
//! | `SPECGATE_OPENAPI_VERSION` | `openapi_version` |
//! | `SPECGATE_DOC_PATH` | `doc_path` |
//! | `SPECGATE_FILENAME` | `filename` |
//! | `SPECGATE_STATIC_PATH` | `static_path` |
//! | `SPECGATE_VALIDATION_ERROR_CODE` | `validation_error_code` |
//! | `SPECGATE_VALIDATE_RESPONSES` | `validate_responses` |
//! | `SPECGATE_STRICT_CONVERTERS` | `strict_converters` |
//!
//! ```rust
//! use specgate::config::GateConfig;
//!
//! let config = GateConfig::default();
//! assert_eq!(config.spec_url(), "/apidoc/openapi.json");
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid value `{value}` for {var}")]
    InvalidEnv { var: &'static str, value: String },
    #[error("validation_error_code must be a 4xx or 5xx status, got {0}")]
    InvalidStatus(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub title: String,
    pub version: String,
    pub openapi_version: String,
    /// Documentation mount, without slashes.
    pub doc_path: String,
    /// File name of the JSON document under `doc_path`.
    pub filename: String,
    /// Prefix of static file rules; never documented.
    pub static_path: String,
    /// Status of request validation error responses.
    pub validation_error_code: u16,
    pub validate_responses: bool,
    /// Reject unknown path converters instead of documenting them as literal text.
    pub strict_converters: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            title: "Service API".to_string(),
            version: "0.1.0".to_string(),
            openapi_version: "3.0.3".to_string(),
            doc_path: "apidoc".to_string(),
            filename: "openapi.json".to_string(),
            static_path: "/static".to_string(),
            validation_error_code: 422,
            validate_responses: true,
            strict_converters: false,
        }
    }
}

impl GateConfig {
    /// URL the document is served from: `/{doc_path}/{filename}`.
    #[must_use]
    pub fn spec_url(&self) -> String {
        format!("/{}/{}", self.doc_path.trim_matches('/'), self.filename)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;
        config.validate()
    }

    /// Defaults overridden by any `SPECGATE_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `SPECGATE_*` variables on top of `self`.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        override_string("SPECGATE_TITLE", &mut self.title);
        override_string("SPECGATE_VERSION", &mut self.version);
        override_string("SPECGATE_OPENAPI_VERSION", &mut self.openapi_version);
        override_string("SPECGATE_DOC_PATH", &mut self.doc_path);
        override_string("SPECGATE_FILENAME", &mut self.filename);
        override_string("SPECGATE_STATIC_PATH", &mut self.static_path);
        override_parsed(
            "SPECGATE_VALIDATION_ERROR_CODE",
            &mut self.validation_error_code,
        )?;
        override_parsed("SPECGATE_VALIDATE_RESPONSES", &mut self.validate_responses)?;
        override_parsed("SPECGATE_STRICT_CONVERTERS", &mut self.strict_converters)?;
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !(400..=599).contains(&self.validation_error_code) {
            return Err(ConfigError::InvalidStatus(self.validation_error_code));
        }
        Ok(self)
    }
}

fn override_string(var: &'static str, field: &mut String) {
    if let Ok(value) = env::var(var) {
        *field = value;
    }
}

fn override_parsed<T: FromStr>(var: &'static str, field: &mut T) -> Result<(), ConfigError> {
    if let Ok(value) = env::var(var) {
        *field = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { var, value })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GateConfig::default();
        assert_eq!(config.title, "Service API");
        assert_eq!(config.openapi_version, "3.0.3");
        assert_eq!(config.validation_error_code, 422);
        assert!(config.validate_responses);
        assert!(!config.strict_converters);
    }

    #[test]
    fn test_spec_url_trims_slashes() {
        let config = GateConfig {
            doc_path: "/docs/".to_string(),
            filename: "spec.json".to_string(),
            ..GateConfig::default()
        };
        assert_eq!(config.spec_url(), "/docs/spec.json");
    }

    #[test]
    fn test_yaml_file_fills_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "title: Pets\nvalidation_error_code: 400").unwrap();
        let config = GateConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.title, "Pets");
        assert_eq!(config.validation_error_code, 400);
        assert_eq!(config.doc_path, "apidoc");
    }

    #[test]
    fn test_yaml_file_errors() {
        assert!(matches!(
            GateConfig::from_yaml_file("/nonexistent/specgate.yaml"),
            Err(ConfigError::Read { .. })
        ));

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "validation_error_code: [not, a, number]").unwrap();
        assert!(matches!(
            GateConfig::from_yaml_file(bad.path()),
            Err(ConfigError::Parse { .. })
        ));

        let mut status = tempfile::NamedTempFile::new().unwrap();
        writeln!(status, "validation_error_code: 200").unwrap();
        assert!(matches!(
            GateConfig::from_yaml_file(status.path()),
            Err(ConfigError::InvalidStatus(200))
        ));
    }
}
