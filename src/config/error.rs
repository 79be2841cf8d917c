//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Items per page must be between 1 and {max}")]
    InvalidItemsPerPage { max: usize },

    #[error("Invalid channel endpoint (expected ws://, wss://, http:// or https://)")]
    InvalidChannelEndpoint,

    #[error("Invalid connect timeout")]
    InvalidConnectTimeout,

    #[error("Invalid row source base URL format")]
    InvalidBaseUrl,

    #[error("Invalid request timeout")]
    InvalidRequestTimeout,

    #[error("Invalid log filter directive: {0}")]
    InvalidLogFilter(String),
}
