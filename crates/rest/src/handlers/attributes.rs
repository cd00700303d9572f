//! Attribute value handler, used to populate filter pickers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use hermes_persistence::core::AuditStorage;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{AttributeQueryParams, TenantExtractor};
use crate::state::AppState;

/// Handler for listing the distinct values of an attribute.
///
/// # HTTP Request
///
/// `GET /v1/attributes/{query_name}?limit=100&max_depth=2`
///
/// `max_depth` truncates slash-separated values such as type URIs; `0` or
/// absent leaves them whole.
///
/// # Response
///
/// - `200 OK` - Sorted JSON array of strings
pub async fn attributes_handler<S>(
    State(state): State<AppState<S>>,
    tenant: TenantExtractor,
    Path(query_name): Path<String>,
    Query(params): Query<AttributeQueryParams>,
) -> RestResult<Response>
where
    S: AuditStorage + 'static,
{
    let filter = params.into_filter(query_name);
    debug!(
        tenant = %tenant,
        attribute = %filter.query_name,
        max_depth = filter.max_depth,
        "Listing attribute values"
    );

    let values = state
        .storage()
        .get_attributes(&state.query_context(), &filter, tenant.scope())
        .await?;

    Ok(Json(values).into_response())
}
