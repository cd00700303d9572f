//! AuditStorage implementation for Elasticsearch.

use async_trait::async_trait;

use crate::core::{AuditStorage, BackendKind, QueryContext, execute};
use crate::error::StorageResult;
use crate::search::{AttributeQueryPlan, EventLookupPlan, EventQueryPlan};
use crate::tenant::TenantScope;
use crate::types::{AttributeFilter, Event, EventFilter, EventPage};

use super::backend::{BACKEND_NAME, ElasticsearchBackend};
use super::query;

#[async_trait]
impl AuditStorage for ElasticsearchBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Elasticsearch
    }

    async fn get_events(
        &self,
        ctx: &QueryContext,
        filter: &EventFilter,
        tenant: &TenantScope,
    ) -> StorageResult<EventPage> {
        let plan = EventQueryPlan::build(
            filter,
            tenant,
            &self.config().index_layout,
            self.mapping(),
        )?;
        let body = query::event_search(&plan);
        let response = execute(ctx, BACKEND_NAME, self.search(&plan.index, body)).await?;
        response.into_page()
    }

    async fn get_event(
        &self,
        ctx: &QueryContext,
        event_id: &str,
        tenant: &TenantScope,
    ) -> StorageResult<Option<Event>> {
        let plan = EventLookupPlan::build(event_id, tenant, &self.config().index_layout)?;
        let body = query::event_lookup(&plan);
        let response = execute(ctx, BACKEND_NAME, self.search(&plan.index, body)).await?;
        let event = response.into_first_event()?;
        if event.is_none() {
            tracing::debug!(event_id = %plan.id, "Event not found in Elasticsearch");
        }
        Ok(event)
    }

    async fn get_attributes(
        &self,
        ctx: &QueryContext,
        filter: &AttributeFilter,
        tenant: &TenantScope,
    ) -> StorageResult<Vec<String>> {
        let plan = AttributeQueryPlan::build(
            filter,
            tenant,
            &self.config().index_layout,
            self.mapping(),
        )?;
        let body = query::attribute_aggregation(&plan);
        let response = execute(ctx, BACKEND_NAME, self.search(&plan.index, body)).await?;
        Ok(response.into_attribute_values(plan.max_depth))
    }

    fn max_limit(&self) -> u64 {
        self.config().max_result_window
    }
}
