//! Error types for the HTTP client.

use quiqy::{GatewayError, ValidationError};

/// Errors that can occur while talking to the gateway.
///
/// Transport failures are kept distinct from gateway rejections so callers
/// can tell "gateway unreachable" apart from "gateway said no".
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection, TLS, or timeout failure; the request may never have
    /// reached the gateway.
    #[error("HTTP error: {context}: {source}")]
    Transport {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// A success response carried no body or a body that is not valid JSON.
    #[error("Failed to decode JSON response: {context}: {source}")]
    Decode {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// Failed to read an error response's body.
    #[error("Failed to read response body: {context}: {source}")]
    BodyRead {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The gateway rejected the request with an HTTP error status.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// The request failed local validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// Returns the typed gateway error, if that is what this is.
    #[must_use]
    pub const fn as_gateway(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(error) => Some(error),
            _ => None,
        }
    }
}
