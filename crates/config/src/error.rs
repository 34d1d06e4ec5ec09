//! Error types for configuration operations.
//!
//! This module defines the error types that can occur during configuration
//! loading, parsing, and credential resolution.

use std::path::PathBuf;

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required configuration value is absent or empty.
    #[error("missing required configuration value: {name}")]
    MissingValue {
        /// The name of the missing value (e.g. `GITHUB_PAT`).
        name: String,
    },

    /// A configuration value is present but cannot be used.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue {
        /// The name of the offending value.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Failed to read a configuration file.
    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON5 configuration.
    #[error("failed to parse config: {0}")]
    ParseJson5(#[from] serde_json5::Error),

    /// Failed to determine home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
