//! Shared helpers for REST integration tests.

#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderName;
use axum_test::TestServer;
use hermes_persistence::backends::memory::MemoryBackend;
use hermes_persistence::core::{AuditStorage, BackendKind, QueryContext, execute};
use hermes_persistence::error::{BackendError, StorageResult};
use hermes_persistence::tenant::TenantScope;
use hermes_persistence::types::{AttributeFilter, Event, EventFilter, EventPage};
use hermes_rest::{ServerConfig, create_app_with_config};
use serde_json::json;

pub const X_TENANT_ID: HeaderName = HeaderName::from_static("x-tenant-id");

pub const PROJECT_A: &str = "a759dcc2a2384a76b0386bb985952373";
pub const PROJECT_B: &str = "ae63ddf2076d4342a56eb049e37a7621";

fn event(id: &str, time: &str, outcome: &str, target_type: &str, project: &str) -> Event {
    serde_json::from_value(json!({
        "id": id,
        "eventTime": time,
        "action": if outcome == "success" { "create/role_assignment" } else { "authenticate" },
        "outcome": outcome,
        "initiator": {"typeURI": "service/security/account/user", "name": "test_admin", "project_id": project},
        "target": {"typeURI": target_type, "id": format!("target-{id}")},
        "observer": {"typeURI": "service/security", "id": "keystone"},
        "tenant_ids": [project]
    }))
    .unwrap()
}

/// Two successes and two failures across two projects.
pub fn fixture_events() -> Vec<Event> {
    vec![
        event("e1", "2017-11-06T10:11:21Z", "success", "data/security/project", PROJECT_A),
        event("e2", "2017-11-06T10:17:40Z", "failure", "service/security/account/user", PROJECT_A),
        event("e3", "2017-11-06T10:15:56Z", "success", "data/security/role/assignment", PROJECT_B),
        event("e4", "2017-11-06T09:58:03Z", "failure", "service/security/account/user", PROJECT_B),
    ]
}

pub fn server_with(storage: impl AuditStorage + 'static, config: ServerConfig) -> TestServer {
    let app = create_app_with_config(storage, config);
    TestServer::new(app).expect("Failed to create test server")
}

pub fn fixture_server() -> TestServer {
    server_with(
        MemoryBackend::with_events(fixture_events()).with_max_limit(100),
        ServerConfig::for_testing(),
    )
}

/// How [`StubStorage`] answers every call.
#[derive(Debug, Clone, Copy)]
pub enum StubBehavior {
    /// The engine reports a 400 with a structured body.
    Rejects,
    /// The engine cannot be reached.
    Unreachable,
    /// The engine takes longer than any test deadline.
    Hangs,
}

/// Storage that fails in a chosen way.
#[derive(Debug)]
pub struct StubStorage(pub StubBehavior);

impl StubStorage {
    async fn answer<T>(&self, ctx: &QueryContext) -> StorageResult<T> {
        let behavior = self.0;
        execute(ctx, "stub", async move {
            match behavior {
                StubBehavior::Rejects => Err(BackendError::reported(
                    "stub",
                    400,
                    r#"{"error":{"type":"search_phase_execution_exception","reason":"all shards failed"},"status":400}"#,
                )
                .into()),
                StubBehavior::Unreachable => Err(BackendError::transport(
                    "stub",
                    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
                )
                .into()),
                StubBehavior::Hangs => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(BackendError::Unavailable {
                        backend_name: "stub".to_string(),
                        message: "woke up".to_string(),
                    }
                    .into())
                }
            }
        })
        .await
    }
}

#[async_trait]
impl AuditStorage for StubStorage {
    fn backend_name(&self) -> &'static str {
        "stub"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn get_events(
        &self,
        ctx: &QueryContext,
        _filter: &EventFilter,
        _tenant: &TenantScope,
    ) -> StorageResult<EventPage> {
        self.answer(ctx).await
    }

    async fn get_event(
        &self,
        ctx: &QueryContext,
        _event_id: &str,
        _tenant: &TenantScope,
    ) -> StorageResult<Option<Event>> {
        self.answer(ctx).await
    }

    async fn get_attributes(
        &self,
        ctx: &QueryContext,
        _filter: &AttributeFilter,
        _tenant: &TenantScope,
    ) -> StorageResult<Vec<String>> {
        self.answer(ctx).await
    }

    fn max_limit(&self) -> u64 {
        0
    }
}
