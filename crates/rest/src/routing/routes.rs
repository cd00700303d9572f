//! Audit-event API routes.

use axum::{Router, routing::get};
use hermes_persistence::core::AuditStorage;

use crate::handlers;
use crate::state::AppState;

/// Creates all API routes.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `GET /v1/events` - List events
/// - `GET /v1/events/{event_id}` - Read one event
/// - `GET /v1/attributes/{query_name}` - Distinct attribute values
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: AuditStorage + 'static,
{
    Router::new()
        .route("/health", get(handlers::health_handler::<S>))
        .route("/v1/events", get(handlers::list_events_handler::<S>))
        .route("/v1/events/{event_id}", get(handlers::get_event_handler::<S>))
        .route(
            "/v1/attributes/{query_name}",
            get(handlers::attributes_handler::<S>),
        )
        .with_state(state)
}
