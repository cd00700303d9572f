//! Health check endpoint handler.
//!
//! Provides a simple health check endpoint for monitoring and load balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hermes_persistence::core::AuditStorage;
use tracing::debug;

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// Reports the process as up without querying the backend, so a slow
/// cluster does not take the API out of a load balancer.
///
/// # HTTP Request
///
/// `GET /health`
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: AuditStorage + 'static,
{
    debug!("Processing health check request");

    let health_response = serde_json::json!({
        "status": "healthy",
        "backend": state.storage().backend_name(),
        "kind": state.storage().kind().to_string(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (StatusCode::OK, Json(health_response)).into_response()
}
