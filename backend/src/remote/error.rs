//! Remote platform error types
//!
//! Errors are classified once, where the HTTP call is made, so callers never
//! have to sniff error message text.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by the remote agent platform client
#[derive(Error, Debug)]
pub enum RemoteError {
    /// No API key was configured for the platform
    #[error("LETTA_API_KEY environment variable is required")]
    MissingApiKey,

    /// The platform rejected the API key (HTTP 401/403)
    #[error("Remote API rejected the API key (HTTP {status}): {body}")]
    Unauthorized {
        /// HTTP status code
        status: u16,
        /// Response body returned by the platform
        body: String,
    },

    /// Quota, billing or rate limit exhausted (HTTP 402/429)
    #[error("Remote API quota exceeded (HTTP {status}): {body}")]
    QuotaExceeded {
        /// HTTP status code
        status: u16,
        /// Response body returned by the platform
        body: String,
    },

    /// Connection could not be established or was dropped
    #[error("Unable to connect to remote API: {0}")]
    Network(String),

    /// The call did not complete within its timeout
    #[error("Remote call timed out after {0} seconds")]
    Timeout(u64),

    /// Agent or block does not exist on the platform (HTTP 404)
    #[error("Remote resource not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("Remote API returned error status {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body returned by the platform
        body: String,
    },

    /// Response body could not be decoded
    #[error("Failed to decode remote API response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: StatusCode, body: String) -> Self {
        let code = status.as_u16();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                RemoteError::Unauthorized { status: code, body }
            }
            StatusCode::PAYMENT_REQUIRED | StatusCode::TOO_MANY_REQUESTS => {
                RemoteError::QuotaExceeded { status: code, body }
            }
            StatusCode::NOT_FOUND => RemoteError::NotFound(body),
            _ => RemoteError::Api { status: code, body },
        }
    }

    /// Classify a transport-level reqwest error
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            RemoteError::Timeout(timeout.as_secs())
        } else if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            RemoteError::from_status(status, err.to_string())
        } else {
            RemoteError::Network(err.to_string())
        }
    }

    /// True if the resource is missing on the platform
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound(_))
    }
}
