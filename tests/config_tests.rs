//! Environment-driven configuration.
//!
//! Environment variables are process-global, so every case lives in one test.

use specgate::config::{ConfigError, GateConfig};
use specgate::logging::{LogConfig, LogFormat};
use std::env;

const GATE_VARS: [&str; 5] = [
    "SPECGATE_TITLE",
    "SPECGATE_DOC_PATH",
    "SPECGATE_VALIDATION_ERROR_CODE",
    "SPECGATE_VALIDATE_RESPONSES",
    "SPECGATE_STRICT_CONVERTERS",
];

const LOG_VARS: [&str; 4] = [
    "SPECGATE_LOG_LEVEL",
    "SPECGATE_LOG_FORMAT",
    "SPECGATE_LOG_ASYNC",
    "SPECGATE_LOG_TARGET_FILTER",
];

fn clear() {
    for var in GATE_VARS.iter().chain(LOG_VARS.iter()) {
        env::remove_var(var);
    }
}

#[test]
fn test_env_overrides() {
    clear();
    assert_eq!(GateConfig::from_env().unwrap(), GateConfig::default());
    assert_eq!(LogConfig::from_env(), LogConfig::default());

    env::set_var("SPECGATE_TITLE", "Pets");
    env::set_var("SPECGATE_DOC_PATH", "docs");
    env::set_var("SPECGATE_VALIDATION_ERROR_CODE", "400");
    env::set_var("SPECGATE_VALIDATE_RESPONSES", "false");
    env::set_var("SPECGATE_STRICT_CONVERTERS", "true");
    let config = GateConfig::from_env().unwrap();
    assert_eq!(config.title, "Pets");
    assert_eq!(config.spec_url(), "/docs/openapi.json");
    assert_eq!(config.validation_error_code, 400);
    assert!(!config.validate_responses);
    assert!(config.strict_converters);

    env::set_var("SPECGATE_VALIDATION_ERROR_CODE", "abc");
    match GateConfig::from_env() {
        Err(ConfigError::InvalidEnv { var, value }) => {
            assert_eq!(var, "SPECGATE_VALIDATION_ERROR_CODE");
            assert_eq!(value, "abc");
        }
        other => panic!("expected InvalidEnv, got {other:?}"),
    }

    env::set_var("SPECGATE_VALIDATION_ERROR_CODE", "200");
    assert!(matches!(
        GateConfig::from_env(),
        Err(ConfigError::InvalidStatus(200))
    ));

    env::set_var("SPECGATE_LOG_LEVEL", "debug");
    env::set_var("SPECGATE_LOG_FORMAT", "pretty");
    env::set_var("SPECGATE_LOG_ASYNC", "true");
    env::set_var("SPECGATE_LOG_TARGET_FILTER", "specgate::router=trace");
    let log = LogConfig::from_env();
    assert_eq!(log.log_level, "debug");
    assert_eq!(log.format, LogFormat::Pretty);
    assert!(log.async_logging);
    assert_eq!(log.target_filter.as_deref(), Some("specgate::router=trace"));

    clear();
}
