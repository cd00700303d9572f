//! Hybrid storage over two in-memory backends.

mod common;

use std::sync::Arc;

use common::*;
use hermes_persistence::backends::memory::MemoryBackend;
use hermes_persistence::composite::HybridStorage;
use hermes_persistence::core::{AuditStorage, BackendKind, QueryContext};
use hermes_persistence::tenant::TenantScope;
use hermes_persistence::types::{AttributeFilter, EventFilter};

/// Old cluster holds everything, the new one the two newest events with a
/// changed action so the copy that wins is visible.
fn migrating() -> HybridStorage {
    let all = fixture_events();
    let copied = all
        .iter()
        .filter(|e| e.id == FAILURE_NEWER || e.id == SUCCESS_NEWER)
        .cloned()
        .map(|mut e| {
            e.action = format!("{}/migrated", e.action);
            e
        })
        .collect();

    HybridStorage::new(
        Arc::new(MemoryBackend::with_events(copied).with_max_limit(200)),
        Arc::new(MemoryBackend::with_events(all).with_max_limit(500)),
    )
}

#[tokio::test]
async fn test_events_are_merged_without_duplicates() {
    let storage = migrating();
    let page = storage
        .get_events(&QueryContext::new(), &EventFilter::default(), &TenantScope::All)
        .await
        .unwrap();

    assert_eq!(page.total, 4);
    assert_eq!(
        event_ids(&page.events),
        vec![FAILURE_NEWER, SUCCESS_NEWER, SUCCESS_OLDER, FAILURE_OLDER]
    );
    assert!(page.events[0].action.ends_with("/migrated"));
    assert!(!page.events[2].action.ends_with("/migrated"));
}

#[tokio::test]
async fn test_pagination_over_merged_results() {
    let storage = migrating();
    let filter = EventFilter::default().with_page(1, 2);
    let page = storage
        .get_events(&QueryContext::new(), &filter, &TenantScope::All)
        .await
        .unwrap();
    assert_eq!(event_ids(&page.events), vec![SUCCESS_NEWER, SUCCESS_OLDER]);
}

#[tokio::test]
async fn test_get_event_falls_back_to_secondary() {
    let storage = migrating();
    let ctx = QueryContext::new();

    let copied = storage
        .get_event(&ctx, SUCCESS_NEWER, &TenantScope::All)
        .await
        .unwrap()
        .unwrap();
    assert!(copied.action.ends_with("/migrated"));

    let old = storage
        .get_event(&ctx, FAILURE_OLDER, &TenantScope::All)
        .await
        .unwrap();
    assert!(old.is_some());

    let missing = storage
        .get_event(&ctx, "missing", &TenantScope::All)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_attributes_are_unioned() {
    let storage = migrating();
    let values = storage
        .get_attributes(&QueryContext::new(), &AttributeFilter::new("action"), &TenantScope::All)
        .await
        .unwrap();
    assert_eq!(
        values,
        vec![
            "authenticate",
            "authenticate/migrated",
            "create/role_assignment",
            "create/role_assignment/migrated",
        ]
    );
}

#[tokio::test]
async fn test_cancellation_fails_the_merge() {
    let storage = migrating();
    let ctx = QueryContext::new();
    ctx.cancel();
    let err = storage
        .get_events(&ctx, &EventFilter::default(), &TenantScope::All)
        .await
        .unwrap_err();
    assert!(!err.is_invalid_input());
}

#[test]
fn test_reports_hybrid_kind_and_smallest_limit() {
    let storage = migrating();
    assert_eq!(storage.kind(), BackendKind::Hybrid);
    assert_eq!(storage.backend_name(), "hybrid");
    assert_eq!(storage.max_limit(), 200);
}
