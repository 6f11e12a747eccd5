//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// A single rule a configuration value broke.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("error_marker must not be empty")]
    EmptyErrorMarker,

    /// A numeric marker would be indistinguishable from a result
    #[error("error_marker '{0}' must not parse as a number")]
    NumericErrorMarker(String),

    #[error("storage_key must not be empty")]
    EmptyStorageKey,

    #[error("storage_key '{0}' must not contain path separators")]
    StorageKeyHasSeparator(String),

    #[error("reset_delay_ms must be greater than zero")]
    ZeroResetDelay,
}

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Every violation found, not just the first
    #[error("Invalid config: {}", format_violations(.0))]
    Invalid(Vec<ConfigViolation>),
}

fn format_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
