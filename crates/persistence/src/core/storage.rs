//! Core audit storage trait.
//!
//! This module defines the [`AuditStorage`] trait, the single capability set
//! every backend implements. Callers hold an `Arc<dyn AuditStorage>` (or a
//! concrete type) and never branch on which search engine is deployed.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::tenant::TenantScope;
use crate::types::{AttributeFilter, Event, EventFilter, EventPage};

use super::QueryContext;

/// Identifies the type of search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Elasticsearch, queried through the typed client.
    Elasticsearch,
    /// OpenSearch, queried over plain HTTP + JSON.
    OpenSearch,
    /// In-process event store for tests and local development.
    Memory,
    /// Two backends read side by side during a migration.
    Hybrid,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Elasticsearch => write!(f, "elasticsearch"),
            BackendKind::OpenSearch => write!(f, "opensearch"),
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Read access to stored audit events.
///
/// Every operation takes a [`TenantScope`], which can only be built from a
/// validated tenant identifier, and a [`QueryContext`] carrying the caller's
/// cancellation and deadline.
///
/// # Example
///
/// ```ignore
/// use hermes_persistence::core::{AuditStorage, QueryContext};
/// use hermes_persistence::tenant::TenantScope;
/// use hermes_persistence::types::EventFilter;
///
/// async fn failed_logins<S: AuditStorage>(storage: &S) -> StorageResult<u64> {
///     let filter = EventFilter {
///         action: "authenticate".to_string(),
///         outcome: "failure".to_string(),
///         ..EventFilter::default()
///     };
///     let page = storage
///         .get_events(&QueryContext::new(), &filter, &TenantScope::All)
///         .await?;
///     Ok(page.total)
/// }
/// ```
#[async_trait]
pub trait AuditStorage: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Returns the backend type.
    fn kind(&self) -> BackendKind;

    /// Lists events matching a filter, one page at a time.
    ///
    /// The page holds at most the normalized limit, starting at the normalized
    /// offset, sorted by the requested keys and then by time descending.
    async fn get_events(
        &self,
        ctx: &QueryContext,
        filter: &EventFilter,
        tenant: &TenantScope,
    ) -> StorageResult<EventPage>;

    /// Fetches one event by ID.
    ///
    /// Returns `Ok(None)` when no event matches; that is not an error.
    async fn get_event(
        &self,
        ctx: &QueryContext,
        event_id: &str,
        tenant: &TenantScope,
    ) -> StorageResult<Option<Event>>;

    /// Lists the distinct values of an attribute, truncated and sorted.
    async fn get_attributes(
        &self,
        ctx: &QueryContext,
        filter: &AttributeFilter,
        tenant: &TenantScope,
    ) -> StorageResult<Vec<String>>;

    /// The largest result window the backend serves, `0` if unlimited.
    fn max_limit(&self) -> u64;
}

#[async_trait]
impl<T: AuditStorage + ?Sized> AuditStorage for Arc<T> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn kind(&self) -> BackendKind {
        (**self).kind()
    }

    async fn get_events(
        &self,
        ctx: &QueryContext,
        filter: &EventFilter,
        tenant: &TenantScope,
    ) -> StorageResult<EventPage> {
        (**self).get_events(ctx, filter, tenant).await
    }

    async fn get_event(
        &self,
        ctx: &QueryContext,
        event_id: &str,
        tenant: &TenantScope,
    ) -> StorageResult<Option<Event>> {
        (**self).get_event(ctx, event_id, tenant).await
    }

    async fn get_attributes(
        &self,
        ctx: &QueryContext,
        filter: &AttributeFilter,
        tenant: &TenantScope,
    ) -> StorageResult<Vec<String>> {
        (**self).get_attributes(ctx, filter, tenant).await
    }

    fn max_limit(&self) -> u64 {
        (**self).max_limit()
    }
}
