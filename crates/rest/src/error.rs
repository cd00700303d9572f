//! Error types for the audit-event API.
//!
//! Storage errors from the persistence layer are mapped to HTTP status codes
//! and rendered as a small JSON error document:
//!
//! | Storage Error | HTTP Status | Code |
//! |--------------|-------------|------|
//! | Tenant / Validation | 400 | invalid |
//! | Backend Reported | 502 | backend-error |
//! | Backend Unavailable / ConnectionFailed / Transport | 503 | unavailable |
//! | Backend Cancelled / DeadlineExceeded | 504 | timeout |
//! | Backend Serialization | 500 | exception |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hermes_persistence::error::{BackendError, StorageError};
use serde_json::Value;
use std::fmt;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Invalid request parameters or tenant (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Event not found (HTTP 404).
    NotFound {
        /// The event ID.
        id: String,
    },

    /// The search backend answered with an error (HTTP 502).
    BadGateway {
        /// Error message.
        message: String,
        /// Error payload reported by the backend.
        details: Value,
    },

    /// The search backend could not be reached (HTTP 503).
    ServiceUnavailable {
        /// Error message.
        message: String,
    },

    /// The query was cancelled or ran past its deadline (HTTP 504).
    GatewayTimeout {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::NotFound { id } => write!(f, "Event not found: {}", id),
            RestError::BadGateway { message, .. } => write!(f, "Backend error: {}", message),
            RestError::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {}", message)
            }
            RestError::GatewayTimeout { message } => write!(f, "Timeout: {}", message),
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            RestError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RestError::GatewayTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            RestError::BadRequest { .. } => "invalid",
            RestError::NotFound { .. } => "not-found",
            RestError::BadGateway { .. } => "backend-error",
            RestError::ServiceUnavailable { .. } => "unavailable",
            RestError::GatewayTimeout { .. } => "timeout",
            RestError::InternalError { .. } => "exception",
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        if let RestError::BadGateway { details, .. } = self {
            body["error"]["details"] = details;
        }
        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Tenant(e) => RestError::BadRequest {
                message: e.to_string(),
            },
            StorageError::Validation(e) => RestError::BadRequest {
                message: e.to_string(),
            },
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        let message = err.to_string();
        match err {
            BackendError::Reported { details, .. } => RestError::BadGateway { message, details },
            BackendError::Unavailable { .. }
            | BackendError::ConnectionFailed { .. }
            | BackendError::Transport { .. } => RestError::ServiceUnavailable { message },
            BackendError::Cancelled { .. } | BackendError::DeadlineExceeded { .. } => {
                RestError::GatewayTimeout { message }
            }
            BackendError::Serialization { .. } => RestError::InternalError { message },
        }
    }
}

/// Result type for REST handlers.
pub type RestResult<T> = Result<T, RestError>;
