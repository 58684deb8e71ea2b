//! Error handling for the Saucier core library

use thiserror::Error;

/// Result type alias for Saucier operations
pub type Result<T> = std::result::Result<T, SaucierError>;

/// Main error type for Saucier operations
#[derive(Error, Debug)]
pub enum SaucierError {
    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),

    /// Validation errors, rejected before any I/O
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Upstream responded with a non-success HTTP status
    #[error("Upstream API error ({status}): {message}")]
    UpstreamStatus { status: u16, message: String },

    /// Upstream could not be reached (connection or timeout failure)
    #[error("Upstream unreachable: {message}")]
    UpstreamUnreachable { message: String },

    /// Cache store errors; absorbed by the cache layer, never surfaced
    /// to request handlers
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// Network connectivity errors
    #[error("Network error: {message}")]
    Network { message: String },

    /// Invalid state errors
    #[error("Invalid state: {message}")]
    InvalidState { message: String },
}

impl SaucierError {
    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an upstream status error
    pub fn upstream_status<S: Into<String>>(status: u16, message: S) -> Self {
        Self::UpstreamStatus {
            status,
            message: message.into(),
        }
    }

    /// Create an upstream unreachable error
    pub fn upstream_unreachable<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnreachable {
            message: message.into(),
        }
    }

    /// Create a cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state<S: Into<String>>(message: S) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// HTTP status code equivalent for this error
    ///
    /// Validation failures map to 400, upstream status errors carry the
    /// upstream's own status code, everything else is an internal failure.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::UpstreamStatus { status, .. } => *status,
            _ => 500,
        }
    }
}
