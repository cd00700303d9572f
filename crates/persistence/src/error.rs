//! Error types for the persistence layer.
//!
//! Errors are grouped by where they originate: invalid caller input is reported
//! as [`TenantError`] or [`ValidationError`] before any network call is made,
//! while everything that happens once a backend is involved is a [`BackendError`].
//! Backend errors further separate failures the search engine *reported* (with
//! an HTTP status and a details payload) from transport, decode and
//! cancellation failures.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use serde_json::Value;
use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Tenant validation errors
    #[error(transparent)]
    Tenant(#[from] TenantError),

    /// Filter validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns `true` if the error was caused by caller input rather than the backend.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, StorageError::Tenant(_) | StorageError::Validation(_))
    }
}

/// Errors raised while validating the tenant identifier of a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TenantError {
    /// The tenant identifier was present but empty.
    #[error("tenant ID cannot be empty")]
    EmptyTenantId,

    /// The tenant identifier was the reserved placeholder value.
    #[error("tenant ID '{tenant_id}' is not valid for queries")]
    UnavailableTenantId { tenant_id: String },

    /// The tenant identifier cannot be used to address an index.
    #[error("tenant ID '{tenant_id}' is invalid: {reason}")]
    InvalidTenantId { tenant_id: String, reason: String },
}

/// Errors raised while validating a filter before it reaches a backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A filter parameter could not be interpreted.
    #[error("invalid filter parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    /// The requested page size exceeds what the backend can serve.
    #[error("limit {requested} exceeds the maximum of {max}")]
    LimitExceeded { requested: u64, max: u64 },

    /// An attribute query was issued without an attribute name.
    #[error("attribute name cannot be empty")]
    EmptyAttributeName,
}

/// Errors originating from a search backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is not configured or has been shut down.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// The client handle could not be constructed. Retried on the next call.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// The search engine answered with an error status and a structured body.
    #[error("{backend_name} returned status {status}: {}", error_reason(.details))]
    Reported {
        backend_name: String,
        status: u16,
        details: Value,
    },

    /// The request never produced a usable response (network, TLS, timeout).
    #[error("transport error talking to {backend_name}: {message}")]
    Transport {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A request body could not be encoded or a response could not be decoded.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// The caller cancelled the query before it completed.
    #[error("query against {backend_name} was cancelled")]
    Cancelled { backend_name: String },

    /// The caller's deadline passed before the query completed.
    #[error("query against {backend_name} exceeded its deadline")]
    DeadlineExceeded { backend_name: String },
}

impl BackendError {
    /// Builds a [`BackendError::Transport`] from any error type.
    pub fn transport<E>(backend_name: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        BackendError::Transport {
            backend_name: backend_name.to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Builds a [`BackendError::Reported`] from a status code and the raw response body.
    ///
    /// JSON bodies are unwrapped to their `error` member when present; anything
    /// else is kept as a JSON string so the details are never lost.
    pub fn reported(backend_name: &str, status: u16, body: &str) -> Self {
        let details = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(mut map)) => match map.remove("error") {
                Some(error) => error,
                None => Value::Object(map),
            },
            Ok(other) => other,
            Err(_) => Value::String(body.to_string()),
        };
        BackendError::Reported {
            backend_name: backend_name.to_string(),
            status,
            details,
        }
    }

    /// Like [`BackendError::reported`], for a body that may have failed to read.
    ///
    /// A read failure is kept in the details as `{"reason": ...}`.
    pub fn reported_body<E>(backend_name: &str, status: u16, body: Result<String, E>) -> Self
    where
        E: std::fmt::Display,
    {
        match body {
            Ok(text) => Self::reported(backend_name, status, &text),
            Err(e) => {
                tracing::warn!(
                    backend = backend_name,
                    status = status,
                    "failed to read error response body: {}",
                    e
                );
                BackendError::Reported {
                    backend_name: backend_name.to_string(),
                    status,
                    details: serde_json::json!({
                        "reason": format!("failed to read error response body: {e}"),
                    }),
                }
            }
        }
    }

    /// Returns `true` if the error is a cancellation or deadline expiry.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            BackendError::Cancelled { .. } | BackendError::DeadlineExceeded { .. }
        )
    }
}

/// Extracts a short human-readable reason from a backend error payload.
fn error_reason(details: &Value) -> String {
    match details {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("reason")
            .or_else(|| map.get("type"))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| details.to_string()),
        other => other.to_string(),
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::Serialization {
            message: err.to_string(),
        })
    }
}
