//! Configuration error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Failed to read key file {path}: {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid API base URL")]
    InvalidBaseUrl,

    #[error("API base URL must use HTTPS outside loopback hosts")]
    BaseUrlMustBeHttps,

    #[error("Signature scheme version must be a positive integer")]
    InvalidSignVersion,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Secret identifier must be visible ASCII")]
    InvalidSecretId,

    #[error("{0} holds key material of the wrong kind")]
    KeyInWrongSlot(&'static str),

    #[error("Invalid {field}: {reason}")]
    InvalidKey { field: &'static str, reason: String },
}
