//! Query-string parameters for the event and attribute endpoints.
//!
//! Scalar filters are passed through verbatim (a leading `!` negates them).
//! Two parameters carry a small syntax of their own:
//!
//! - `time=gte:2017-11-01T00:00:00Z,lt:2017-11-02T00:00:00Z`
//! - `sort=outcome,time:asc`

use hermes_persistence::error::ValidationError;
use hermes_persistence::types::{
    AttributeFilter, EventFilter, SortDirection, SortSpec, TimeOperator,
};
use serde::Deserialize;

/// Parameters of `GET /v1/events`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventQueryParams {
    pub observer_type: String,
    pub target_type: String,
    pub target_id: String,
    pub initiator_type: String,
    pub initiator_id: String,
    pub initiator_name: String,
    pub action: String,
    pub outcome: String,
    pub request_path: String,
    pub time: Option<String>,
    pub search: String,
    pub sort: Option<String>,
    pub offset: u64,
    pub limit: u64,
}

impl EventQueryParams {
    /// Builds the persistence filter, rejecting malformed `time` or `sort`.
    pub fn into_filter(self) -> Result<EventFilter, ValidationError> {
        let mut filter = EventFilter {
            observer_type: self.observer_type,
            target_type: self.target_type,
            target_id: self.target_id,
            initiator_type: self.initiator_type,
            initiator_id: self.initiator_id,
            initiator_name: self.initiator_name,
            action: self.action,
            outcome: self.outcome,
            request_path: self.request_path,
            search: self.search,
            offset: self.offset,
            limit: self.limit,
            ..EventFilter::default()
        };

        if let Some(time) = self.time.as_deref() {
            for (op, value) in parse_time(time)? {
                filter = filter.with_time(op, value);
            }
        }
        if let Some(sort) = self.sort.as_deref() {
            filter.sort = parse_sort(sort)?;
        }
        Ok(filter)
    }
}

/// Parameters of `GET /v1/attributes/{query_name}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AttributeQueryParams {
    pub limit: u64,
    pub max_depth: u64,
}

impl AttributeQueryParams {
    pub fn into_filter(self, query_name: impl Into<String>) -> AttributeFilter {
        AttributeFilter::new(query_name)
            .with_limit(self.limit)
            .with_max_depth(self.max_depth)
    }
}

fn invalid(parameter: &str, message: String) -> ValidationError {
    ValidationError::InvalidParameter {
        parameter: parameter.to_string(),
        message,
    }
}

/// Parses `op:value[,op:value]`. Values may contain colons.
pub fn parse_time(raw: &str) -> Result<Vec<(TimeOperator, String)>, ValidationError> {
    let mut bounds = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (op, value) = part
            .split_once(':')
            .ok_or_else(|| invalid("time", format!("expected op:value, got '{part}'")))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(invalid("time", format!("missing value for '{op}'")));
        }
        bounds.push((op.trim().parse::<TimeOperator>()?, value.to_string()));
    }
    Ok(bounds)
}

/// Parses `field[:asc|desc][,...]`. The direction defaults to ascending.
pub fn parse_sort(raw: &str) -> Result<Vec<SortSpec>, ValidationError> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|part| -> Result<SortSpec, ValidationError> {
            match part.split_once(':') {
                Some((field, direction)) => {
                    let direction = direction.trim().parse::<SortDirection>()?;
                    Ok(SortSpec::new(field.trim(), direction))
                }
                None => Ok(SortSpec::asc(part)),
            }
        })
        .collect()
}
