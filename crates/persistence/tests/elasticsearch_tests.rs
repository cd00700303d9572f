//! Elasticsearch backend tests against a canned HTTP server.
//!
//! Run with: `cargo test -p hermes-persistence --features elasticsearch -- elasticsearch`

#![cfg(feature = "elasticsearch")]

mod common;

use axum::http::StatusCode;
use common::*;
use hermes_persistence::backends::elasticsearch::{ElasticsearchBackend, ElasticsearchConfig};
use hermes_persistence::core::{AuditStorage, BackendKind, QueryContext};
use hermes_persistence::error::{BackendError, StorageError};
use hermes_persistence::search::IndexLayout;
use hermes_persistence::tenant::{TenantId, TenantScope};
use hermes_persistence::types::{AttributeFilter, EventFilter};
use serde_json::{Value, json};

fn backend(url: &str) -> ElasticsearchBackend {
    ElasticsearchBackend::new(ElasticsearchConfig {
        nodes: vec![url.to_string()],
        ..Default::default()
    })
}

// ============================================================================
// Backend Configuration Tests
// ============================================================================

#[test]
fn test_elasticsearch_config_defaults() {
    let config = ElasticsearchConfig::default();
    assert_eq!(config.nodes, vec!["http://localhost:9200".to_string()]);
    assert_eq!(config.index_layout, IndexLayout::default());
    assert_eq!(config.max_result_window, 10000);
    assert!(config.auth.is_none());
}

#[test]
fn test_backend_creation() {
    let backend = ElasticsearchBackend::new(ElasticsearchConfig::default());
    assert_eq!(backend.kind(), BackendKind::Elasticsearch);
    assert_eq!(backend.backend_name(), "elasticsearch");
    assert_eq!(backend.max_limit(), 10000);
}

// ============================================================================
// Round Trips
// ============================================================================

#[tokio::test]
async fn test_get_events_sends_query_and_decodes_hits() {
    let server = CannedServer::start(StatusCode::OK, hits_body(&fixture_json()[..2])).await;
    let filter = EventFilter {
        outcome: "!failure".to_string(),
        ..EventFilter::default()
    };
    let scope = TenantScope::Tenant(TenantId::parse(PROJECT_A).unwrap());

    let page = backend(&server.url)
        .get_events(&QueryContext::new(), &filter, &scope)
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(event_ids(&page.events), vec![SUCCESS_OLDER, FAILURE_NEWER]);

    let request = server.last_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/hermes/_search");
    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(
        body["query"],
        json!({"bool": {
            "filter": [{"term": {"tenant_ids": PROJECT_A}}],
            "must_not": [{"term": {"outcome.keyword": "failure"}}]
        }})
    );
    assert_eq!(body["sort"], json!([{"eventTime": {"order": "desc"}}]));
    assert_eq!(body["size"], json!(10));
}

#[tokio::test]
async fn test_get_event_with_no_hits_is_none() {
    let server = CannedServer::start(StatusCode::OK, hits_body(&[])).await;
    let event = backend(&server.url)
        .get_event(&QueryContext::new(), SUCCESS_NEWER, &TenantScope::All)
        .await
        .unwrap();
    assert!(event.is_none());
}

#[tokio::test]
async fn test_attribute_buckets_are_truncated() {
    let body = json!({
        "hits": {"total": {"value": 3}, "hits": []},
        "aggregations": {"attributes": {"buckets": [
            {"key": "compute/server/a", "doc_count": 5},
            {"key": "network/floatingip", "doc_count": 2},
            {"key": "compute/server/b", "doc_count": 1}
        ]}}
    });
    let server = CannedServer::start(StatusCode::OK, body.to_string()).await;
    let values = backend(&server.url)
        .get_attributes(
            &QueryContext::new(),
            &AttributeFilter::new("target_type").with_max_depth(2),
            &TenantScope::All,
        )
        .await
        .unwrap();
    assert_eq!(values, vec!["compute/server", "network/floatingip"]);

    let body: Value = serde_json::from_str(&server.last_request().body).unwrap();
    assert_eq!(body["size"], json!(0));
    assert_eq!(
        body["aggs"]["attributes"]["terms"]["field"],
        json!("target.typeURI.keyword")
    );
}

// ============================================================================
// Error Classification
// ============================================================================

#[tokio::test]
async fn test_reported_error_keeps_details() {
    let body = json!({
        "error": {"type": "parsing_exception", "reason": "unknown query [tem]"},
        "status": 400
    });
    let server = CannedServer::start(StatusCode::BAD_REQUEST, body.to_string()).await;
    let err = backend(&server.url)
        .get_events(&QueryContext::new(), &EventFilter::default(), &TenantScope::All)
        .await
        .unwrap_err();

    match err {
        StorageError::Backend(BackendError::Reported {
            status, details, ..
        }) => {
            assert_eq!(status, 400);
            assert_eq!(details["type"], "parsing_exception");
        }
        other => panic!("expected reported error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let url = refused_url().await;
    let err = backend(&url)
        .get_events(&QueryContext::new(), &EventFilter::default(), &TenantScope::All)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Backend(BackendError::Transport { .. })
    ));
}

#[tokio::test]
async fn test_malformed_body_is_serialization_error() {
    let server = CannedServer::start(StatusCode::OK, "not json").await;
    let err = backend(&server.url)
        .get_events(&QueryContext::new(), &EventFilter::default(), &TenantScope::All)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Backend(BackendError::Serialization { .. })
    ));
}

#[tokio::test]
async fn test_one_bad_hit_fails_the_page() {
    let mut sources = fixture_json();
    sources[1]["id"] = json!(42);
    let server = CannedServer::start(StatusCode::OK, hits_body(&sources)).await;
    let err = backend(&server.url)
        .get_events(&QueryContext::new(), &EventFilter::default(), &TenantScope::All)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Backend(BackendError::Serialization { .. })
    ));
}

#[tokio::test]
async fn test_cancelled_query_never_reaches_server() {
    let server = CannedServer::start(StatusCode::OK, hits_body(&[])).await;
    let ctx = QueryContext::new();
    ctx.cancel();
    let err = backend(&server.url)
        .get_events(&ctx, &EventFilter::default(), &TenantScope::All)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Backend(BackendError::Cancelled { .. })
    ));
    assert!(server.requests.lock().is_empty());
}
