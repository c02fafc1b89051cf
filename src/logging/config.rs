//! Environment-driven logging configuration

use super::events::LogLevel;
use crate::config::constants::compile_time;
use std::env;

/// Minimum log level, from `CCA_LOG_LEVEL` (error|warn|info|debug).
/// Defaults to `info`.
pub fn get_min_log_level() -> LogLevel {
    match env::var("CCA_LOG_LEVEL").ok().as_deref() {
        Some("error") => LogLevel::Error,
        Some("warn") => LogLevel::Warning,
        Some("debug") => LogLevel::Debug,
        _ => LogLevel::Info,
    }
}

/// Structured (JSON) output, from `CCA_LOG_FORMAT=json`.
pub fn use_structured_logging() -> bool {
    matches!(env::var("CCA_LOG_FORMAT").ok().as_deref(), Some("json"))
}

/// Per-file error buffer size for the collector.
pub fn get_error_buffer_size() -> usize {
    compile_time::logging::MAX_EVENTS_PER_FILE
}

/// Validate the logging configuration at startup.
pub fn validate_config() -> Result<(), String> {
    if let Ok(level) = env::var("CCA_LOG_LEVEL") {
        if !matches!(level.as_str(), "error" | "warn" | "info" | "debug") {
            return Err(format!("invalid CCA_LOG_LEVEL value: {}", level));
        }
    }
    if let Ok(format) = env::var("CCA_LOG_FORMAT") {
        if !matches!(format.as_str(), "text" | "json") {
            return Err(format!("invalid CCA_LOG_FORMAT value: {}", format));
        }
    }
    Ok(())
}

/// Summary of the active logging configuration.
pub fn get_config_summary() -> String {
    format!(
        "Logging: level={}, format={}, buffer={}",
        get_min_log_level().as_str(),
        if use_structured_logging() {
            "json"
        } else {
            "text"
        },
        get_error_buffer_size()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // With no override, level defaults to Info and validation passes
        if std::env::var("CCA_LOG_LEVEL").is_err() {
            assert_eq!(get_min_log_level(), LogLevel::Info);
        }
        assert!(validate_config().is_ok() || std::env::var("CCA_LOG_LEVEL").is_ok());
    }

    #[test]
    fn test_summary_mentions_level() {
        assert!(get_config_summary().contains("Logging: level="));
    }
}
