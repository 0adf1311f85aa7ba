//! Error types for the scoring service gateway.
//!
//! Network, timeout, status, and malformed-body errors are transport
//! failures. `Serialization` and `Configuration` are raised locally before
//! anything reaches the wire. The stream controller ends the run on any of
//! them and never retries.

use thiserror::Error;

/// Errors that can occur when talking to the scoring service.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection could not be established or was dropped.
    #[error("network error: {0}")]
    Network(String),

    /// The HTTP client's request timeout elapsed.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// The service answered with a non-success status.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Response body, if any.
        message: String,
    },

    /// The response body lacked the structure the endpoint promises.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        /// Endpoint path, e.g. `/transactions/ingest`.
        endpoint: String,
        /// What was wrong with the body.
        reason: String,
    },

    /// Request body could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Client could not be built from its configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a malformed response error.
    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for failures that happened while exchanging a request.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::Api { .. } | Self::MalformedResponse { .. }
        )
    }

    /// HTTP status of an `Api` error.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
