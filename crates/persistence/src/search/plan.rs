//! Backend-agnostic query plans.
//!
//! A plan is the fully resolved form of a filter: numeric inputs clamped,
//! negations split out, logical names mapped to indexed fields, the default
//! sort key appended and tenant scoping applied. Backend adapters only
//! serialize a plan into their native request; none of them re-derives these
//! rules.

use std::collections::BTreeMap;

use crate::error::{StorageResult, ValidationError};
use crate::tenant::TenantScope;
use crate::types::{AttributeFilter, EventFilter, FieldFilter, SortDirection, TimeOperator};

use super::field_mapping::FieldMapping;
use super::index::IndexLayout;
use super::normalize::{
    normalize_attribute_limit, normalize_event_limit, normalize_max_depth, normalize_offset,
};

/// Name of the terms aggregation used for attribute queries.
pub const ATTRIBUTE_AGGREGATION: &str = "attributes";

/// Document field holding the event identifier.
pub const ID_FIELD: &str = "id";

/// Exact-match clause on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermClause {
    /// Name the caller used; kept for in-memory evaluation.
    pub logical: String,
    /// Indexed field the backend matches on.
    pub field: String,
    pub value: String,
}

/// Conjunctive range on the event time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeClause {
    pub field: String,
    pub bounds: BTreeMap<TimeOperator, String>,
}

/// One resolved sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub logical: String,
    pub field: String,
    pub direction: SortDirection,
}

/// Resolved event listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQueryPlan {
    /// Index name or pattern to search.
    pub index: String,
    /// Tenant restriction for consolidated layouts.
    pub tenant: Option<TermClause>,
    /// Non-scoring positive matches.
    pub filters: Vec<TermClause>,
    /// Non-scoring exclusions.
    pub exclusions: Vec<TermClause>,
    pub range: Option<RangeClause>,
    /// Free-text query; the only scoring clause.
    pub search: Option<String>,
    /// Sort keys, always ending with `time desc`.
    pub sort: Vec<SortKey>,
    pub from: u32,
    pub size: u32,
}

impl EventQueryPlan {
    /// Resolves a filter against a tenant scope and index layout.
    pub fn build(
        filter: &EventFilter,
        scope: &TenantScope,
        layout: &IndexLayout,
        mapping: &FieldMapping,
    ) -> StorageResult<Self> {
        let target = layout.target(scope)?;

        let mut filters = Vec::new();
        let mut exclusions = Vec::new();
        for (logical, raw) in filter.term_filters() {
            let Some(parsed) = FieldFilter::parse(raw) else {
                continue;
            };
            let clause = TermClause {
                logical: logical.to_string(),
                field: mapping.resolve(logical).to_string(),
                value: parsed.value().to_string(),
            };
            if parsed.is_negated() {
                exclusions.push(clause);
            } else {
                filters.push(clause);
            }
        }

        let range = (!filter.time.is_empty()).then(|| RangeClause {
            field: mapping.time_field().to_string(),
            bounds: filter.time.clone(),
        });

        let search = Some(filter.search.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let mut sort: Vec<SortKey> = filter
            .sort
            .iter()
            .filter(|spec| !spec.field.is_empty())
            .map(|spec| SortKey {
                logical: spec.field.clone(),
                field: mapping.resolve(&spec.field).to_string(),
                direction: spec.direction,
            })
            .collect();
        sort.push(SortKey {
            logical: "time".to_string(),
            field: mapping.time_field().to_string(),
            direction: SortDirection::Desc,
        });

        Ok(Self {
            index: target.index,
            tenant: target.tenant_filter.map(tenant_clause),
            filters,
            exclusions,
            range,
            search,
            sort,
            from: normalize_offset(filter.offset),
            size: normalize_event_limit(filter.limit),
        })
    }
}

/// Resolved single-event lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLookupPlan {
    pub index: String,
    pub tenant: Option<TermClause>,
    pub id: String,
}

impl EventLookupPlan {
    pub fn build(event_id: &str, scope: &TenantScope, layout: &IndexLayout) -> StorageResult<Self> {
        let id = event_id.trim();
        if id.is_empty() {
            return Err(ValidationError::InvalidParameter {
                parameter: "event_id".to_string(),
                message: "event ID cannot be empty".to_string(),
            }
            .into());
        }
        let target = layout.target(scope)?;
        Ok(Self {
            index: target.index,
            tenant: target.tenant_filter.map(tenant_clause),
            id: id.to_string(),
        })
    }
}

/// Resolved attribute aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeQueryPlan {
    pub index: String,
    pub tenant: Option<TermClause>,
    /// Logical attribute name.
    pub logical: String,
    /// Indexed field the terms aggregation runs on.
    pub field: String,
    /// Number of buckets requested.
    pub size: u32,
    /// Truncation depth for slash-separated values. `None` keeps values whole.
    pub max_depth: Option<u32>,
}

impl AttributeQueryPlan {
    pub fn build(
        filter: &AttributeFilter,
        scope: &TenantScope,
        layout: &IndexLayout,
        mapping: &FieldMapping,
    ) -> StorageResult<Self> {
        let logical = filter.query_name.trim();
        if logical.is_empty() {
            return Err(ValidationError::EmptyAttributeName.into());
        }
        let target = layout.target(scope)?;
        Ok(Self {
            index: target.index,
            tenant: target.tenant_filter.map(tenant_clause),
            logical: logical.to_string(),
            field: mapping.resolve(logical).to_string(),
            size: normalize_attribute_limit(filter.limit),
            max_depth: normalize_max_depth(filter.max_depth),
        })
    }
}

fn tenant_clause((field, value): (String, String)) -> TermClause {
    TermClause {
        logical: field.clone(),
        field,
        value,
    }
}
