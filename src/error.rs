//! Error types for the prediction client.

use crate::form::ValidationError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Everything that can go wrong between reading the form and rendering a result.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A required field is missing or malformed; no request was sent.
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The prediction service could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("Request timeout - the prediction service took too long to respond")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered successfully but reported an error in the payload.
    #[error("Prediction service error: {0}")]
    Backend(String),

    /// The response body did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// A newer submission superseded this one.
    #[error("Request superseded by a newer submission")]
    Cancelled,

    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// True when the error was raised locally before any request was issued.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// True for failures of the remote call itself.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout | Self::Status { .. } | Self::Backend(_) | Self::Decode(_)
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else if e.is_connect() {
            Self::Network(format!("Connection error - unable to reach the service: {}", e))
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {}", e))
    }
}
