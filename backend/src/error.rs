//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` and produce the failure envelope
//! `{success: false, error, timestamp}`.

use crate::coordinator::CoordinatorError;
use crate::remote::RemoteError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can occur while handling a request are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// The agent platform call failed
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Agents have not been initialized in this process
    #[error("No active workflow. Initialize agents first.")]
    NotInitialized,

    /// Request body or query was invalid
    #[error("{0}")]
    BadRequest(String),

    /// No shared block has the requested label
    #[error("Unknown memory block: {0}")]
    UnknownBlock(String),

    /// Error occurred during agent id persistence
    #[error("Persistence error: {0}")]
    Persistence(#[from] crate::state::PersistenceError),
}

impl From<CoordinatorError> for AppError {
    fn from(err: CoordinatorError) -> Self {
        match err {
            CoordinatorError::Remote(e) => AppError::Remote(e),
            CoordinatorError::NotInitialized => AppError::NotInitialized,
            CoordinatorError::InvalidInput(msg) => AppError::BadRequest(msg),
            CoordinatorError::UnknownBlock(label) => AppError::UnknownBlock(label),
            CoordinatorError::Persistence(e) => AppError::Persistence(e),
        }
    }
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Remote(remote) => match remote {
                RemoteError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
                RemoteError::QuotaExceeded { .. } => StatusCode::PAYMENT_REQUIRED,
                RemoteError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
                RemoteError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                RemoteError::MissingApiKey
                | RemoteError::NotFound(_)
                | RemoteError::Api { .. }
                | RemoteError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::NotInitialized => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownBlock(_) => StatusCode::NOT_FOUND,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "Request failed: {}", error_message);
        } else {
            tracing::warn!(status = status.as_u16(), "Request rejected: {}", error_message);
        }

        let body = Json(json!({
            "success": false,
            "error": error_message,
            "timestamp": Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}
