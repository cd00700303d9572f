//! In-memory backend for tests and local development.
//!
//! Evaluates the same query plans the search-engine adapters serialize, so
//! filter semantics (negation, time ranges, default sort, pagination windows,
//! attribute truncation) can be exercised without a cluster. Tenant scoping
//! follows the consolidated layout: an event is visible to a tenant when the
//! tenant appears in [`Event::tenant_ids`].
//!
//! Free-text search is a case-insensitive substring match over the event's
//! JSON, a stand-in for a real query-string parser.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::{AuditStorage, BackendKind, QueryContext, execute};
use crate::error::{BackendError, StorageResult};
use crate::search::results::{RawBucket, compare_field_values};
use crate::search::{
    AttributeQueryPlan, EventLookupPlan, EventQueryPlan, FieldMapping, IndexLayout, RangeClause,
    TermClause, attribute_values, compare_events,
};
use crate::tenant::TenantScope;
use crate::types::{AttributeFilter, Event, EventFilter, EventPage, TimeOperator};

const BACKEND_NAME: &str = "memory";

/// Event store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    events: RwLock<Vec<Event>>,
    max_limit: u64,
}

impl MemoryBackend {
    /// Creates an empty backend without a result window limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding the given events.
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: RwLock::new(events),
            max_limit: 0,
        }
    }

    /// Loads events from a JSON file containing an array of CADF events.
    pub fn from_json_file(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BackendError::Unavailable {
            backend_name: BACKEND_NAME.to_string(),
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        let events: Vec<Event> = serde_json::from_str(&content)?;
        tracing::info!(path = %path.display(), count = events.len(), "Loaded event fixture");
        Ok(Self::with_events(events))
    }

    /// Sets the value reported by [`AuditStorage::max_limit`].
    pub fn with_max_limit(mut self, max_limit: u64) -> Self {
        self.max_limit = max_limit;
        self
    }

    /// Adds an event.
    pub fn insert(&self, event: Event) {
        self.events.write().push(event);
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    fn layout() -> IndexLayout {
        IndexLayout::default()
    }

    /// Events visible under a tenant restriction, in insertion order.
    fn visible(&self, tenant: Option<&TermClause>) -> Vec<Event> {
        self.events
            .read()
            .iter()
            .filter(|event| tenant.is_none_or(|t| event.tenant_ids().contains(&t.value.as_str())))
            .cloned()
            .collect()
    }

    fn run_event_query(&self, plan: &EventQueryPlan) -> EventPage {
        let mut matched: Vec<Event> = self
            .visible(plan.tenant.as_ref())
            .into_iter()
            .filter(|event| matches_plan(event, plan))
            .collect();
        matched.sort_by(|a, b| compare_events(a, b, &plan.sort));

        let total = matched.len() as u64;
        let events = matched
            .into_iter()
            .skip(plan.from as usize)
            .take(plan.size as usize)
            .collect();
        EventPage::new(events, total)
    }

    fn run_lookup(&self, plan: &EventLookupPlan) -> Option<Event> {
        self.visible(plan.tenant.as_ref())
            .into_iter()
            .find(|event| event.id == plan.id)
    }

    fn run_aggregation(&self, plan: &AttributeQueryPlan) -> Vec<String> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for event in self.visible(plan.tenant.as_ref()) {
            if let Some(value) = event.field_value(&plan.logical).filter(|v| !v.is_empty()) {
                *counts.entry(value.to_string()).or_default() += 1;
            }
        }

        // Terms aggregations return the most frequent keys first.
        let mut buckets: Vec<RawBucket> = counts
            .into_iter()
            .map(|(key, doc_count)| RawBucket {
                key: key.into(),
                doc_count,
            })
            .collect();
        buckets.sort_by(|a, b| {
            b.doc_count
                .cmp(&a.doc_count)
                .then_with(|| a.key.as_str().cmp(&b.key.as_str()))
        });
        buckets.truncate(plan.size as usize);
        attribute_values(&buckets, plan.max_depth)
    }
}

fn term_matches(event: &Event, clause: &TermClause) -> bool {
    event.field_value(&clause.logical) == Some(clause.value.as_str())
}

fn range_matches(event: &Event, range: &RangeClause) -> bool {
    let Some(time) = event.field_value("time") else {
        return false;
    };
    range.bounds.iter().all(|(op, bound)| {
        let ordering = compare_field_values("time", time, bound);
        match op {
            TimeOperator::Lt => ordering == Ordering::Less,
            TimeOperator::Lte => ordering != Ordering::Greater,
            TimeOperator::Gt => ordering == Ordering::Greater,
            TimeOperator::Gte => ordering != Ordering::Less,
        }
    })
}

fn search_matches(event: &Event, search: &str) -> bool {
    serde_json::to_string(event)
        .map(|json| json.to_lowercase().contains(&search.to_lowercase()))
        .unwrap_or(false)
}

fn matches_plan(event: &Event, plan: &EventQueryPlan) -> bool {
    plan.filters.iter().all(|c| term_matches(event, c))
        && !plan.exclusions.iter().any(|c| term_matches(event, c))
        && plan.range.as_ref().is_none_or(|r| range_matches(event, r))
        && plan.search.as_deref().is_none_or(|s| search_matches(event, s))
}

#[async_trait]
impl AuditStorage for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn get_events(
        &self,
        ctx: &QueryContext,
        filter: &EventFilter,
        tenant: &TenantScope,
    ) -> StorageResult<EventPage> {
        let plan = EventQueryPlan::build(filter, tenant, &Self::layout(), FieldMapping::cadf())?;
        execute(ctx, BACKEND_NAME, async { Ok(self.run_event_query(&plan)) }).await
    }

    async fn get_event(
        &self,
        ctx: &QueryContext,
        event_id: &str,
        tenant: &TenantScope,
    ) -> StorageResult<Option<Event>> {
        let plan = EventLookupPlan::build(event_id, tenant, &Self::layout())?;
        execute(ctx, BACKEND_NAME, async { Ok(self.run_lookup(&plan)) }).await
    }

    async fn get_attributes(
        &self,
        ctx: &QueryContext,
        filter: &AttributeFilter,
        tenant: &TenantScope,
    ) -> StorageResult<Vec<String>> {
        let plan =
            AttributeQueryPlan::build(filter, tenant, &Self::layout(), FieldMapping::cadf())?;
        execute(ctx, BACKEND_NAME, async { Ok(self.run_aggregation(&plan)) }).await
    }

    fn max_limit(&self) -> u64 {
        self.max_limit
    }
}
