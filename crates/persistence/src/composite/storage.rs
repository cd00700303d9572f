//! Hybrid storage reading two backends during a migration.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{AuditStorage, BackendKind, QueryContext};
use crate::error::StorageResult;
use crate::search::normalize::{
    INT32_MAX, normalize_attribute_limit, normalize_event_limit, normalize_offset,
};
use crate::search::{EventQueryPlan, FieldMapping, IndexLayout};
use crate::tenant::TenantScope;
use crate::types::{AttributeFilter, Event, EventFilter, EventPage};

use super::merger::{merge_attribute_values, merge_pages};

/// Reads from a primary and a secondary backend and merges the results.
///
/// Used while events are being copied from an old cluster to a new one: the
/// new cluster is the primary, the old one the secondary. Both are queried
/// concurrently. A failure of either backend fails the call, so no event is
/// silently left out.
pub struct HybridStorage {
    primary: Arc<dyn AuditStorage>,
    secondary: Arc<dyn AuditStorage>,
}

impl std::fmt::Debug for HybridStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridStorage")
            .field("primary", &self.primary.backend_name())
            .field("secondary", &self.secondary.backend_name())
            .finish()
    }
}

impl HybridStorage {
    pub fn new(primary: Arc<dyn AuditStorage>, secondary: Arc<dyn AuditStorage>) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &Arc<dyn AuditStorage> {
        &self.primary
    }

    pub fn secondary(&self) -> &Arc<dyn AuditStorage> {
        &self.secondary
    }
}

#[async_trait]
impl AuditStorage for HybridStorage {
    fn backend_name(&self) -> &'static str {
        "hybrid"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Hybrid
    }

    async fn get_events(
        &self,
        ctx: &QueryContext,
        filter: &EventFilter,
        tenant: &TenantScope,
    ) -> StorageResult<EventPage> {
        let offset = normalize_offset(filter.offset);
        let limit = normalize_event_limit(filter.limit);

        // Each backend must return everything up to the end of the requested
        // page, since the page may be made of events from either side.
        let window = EventFilter {
            offset: 0,
            limit: (u64::from(offset) + u64::from(limit)).min(u64::from(INT32_MAX)),
            ..filter.clone()
        };

        let (primary, secondary) = tokio::join!(
            self.primary.get_events(ctx, &window, tenant),
            self.secondary.get_events(ctx, &window, tenant),
        );
        let (primary, secondary) = (primary?, secondary?);

        let sort =
            EventQueryPlan::build(filter, tenant, &IndexLayout::default(), FieldMapping::cadf())?
                .sort;
        let merged = merge_pages(primary, secondary, &sort, offset as usize, limit as usize);
        tracing::debug!(
            primary = self.primary.backend_name(),
            secondary = self.secondary.backend_name(),
            duplicates = merged.duplicates,
            total = merged.page.total,
            "merged hybrid event page"
        );
        Ok(merged.page)
    }

    async fn get_event(
        &self,
        ctx: &QueryContext,
        event_id: &str,
        tenant: &TenantScope,
    ) -> StorageResult<Option<Event>> {
        if let Some(event) = self.primary.get_event(ctx, event_id, tenant).await? {
            return Ok(Some(event));
        }
        self.secondary.get_event(ctx, event_id, tenant).await
    }

    async fn get_attributes(
        &self,
        ctx: &QueryContext,
        filter: &AttributeFilter,
        tenant: &TenantScope,
    ) -> StorageResult<Vec<String>> {
        let (primary, secondary) = tokio::join!(
            self.primary.get_attributes(ctx, filter, tenant),
            self.secondary.get_attributes(ctx, filter, tenant),
        );
        let limit = normalize_attribute_limit(filter.limit) as usize;
        Ok(merge_attribute_values(primary?, secondary?, limit))
    }

    /// The smaller of the two configured limits, ignoring unlimited ones.
    fn max_limit(&self) -> u64 {
        match (self.primary.max_limit(), self.secondary.max_limit()) {
            (0, other) | (other, 0) => other,
            (a, b) => a.min(b),
        }
    }
}
