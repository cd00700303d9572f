//! Event listing and lookup handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use hermes_persistence::core::AuditStorage;
use hermes_persistence::error::ValidationError;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::{EventQueryParams, TenantExtractor};
use crate::state::AppState;

/// Handler for listing events.
///
/// # HTTP Request
///
/// `GET /v1/events?outcome=!success&time=gte:2017-11-01T00:00:00Z&sort=action:desc&limit=50`
///
/// # Response
///
/// - `200 OK` - `{"events": [...], "total": n}`
/// - `400 Bad Request` - Malformed parameters, tenant, or a limit above the backend's maximum
pub async fn list_events_handler<S>(
    State(state): State<AppState<S>>,
    tenant: TenantExtractor,
    Query(params): Query<EventQueryParams>,
) -> RestResult<Response>
where
    S: AuditStorage + 'static,
{
    let filter = params.into_filter().map_err(|e| RestError::BadRequest {
        message: e.to_string(),
    })?;

    let max = state.storage().max_limit();
    if max > 0 && filter.limit > max {
        return Err(RestError::BadRequest {
            message: ValidationError::LimitExceeded {
                requested: filter.limit,
                max,
            }
            .to_string(),
        });
    }

    debug!(tenant = %tenant, offset = filter.offset, limit = filter.limit, "Listing events");

    let page = state
        .storage()
        .get_events(&state.query_context(), &filter, tenant.scope())
        .await?;

    Ok(Json(page).into_response())
}

/// Handler for reading a single event.
///
/// # HTTP Request
///
/// `GET /v1/events/{event_id}`
///
/// # Response
///
/// - `200 OK` - The event
/// - `404 Not Found` - No visible event has this ID
pub async fn get_event_handler<S>(
    State(state): State<AppState<S>>,
    tenant: TenantExtractor,
    Path(event_id): Path<String>,
) -> RestResult<Response>
where
    S: AuditStorage + 'static,
{
    debug!(tenant = %tenant, event_id = %event_id, "Reading event");

    let event = state
        .storage()
        .get_event(&state.query_context(), &event_id, tenant.scope())
        .await?;

    match event {
        Some(event) => Ok(Json(event).into_response()),
        None => Err(RestError::NotFound { id: event_id }),
    }
}
