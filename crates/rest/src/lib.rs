//! # hermes-rest - Audit Event Query API
//!
//! This crate exposes CADF audit events stored in Elasticsearch or OpenSearch
//! over a small read-only HTTP API. Query translation, tenant isolation and
//! result normalization live in `hermes-persistence`; this crate decodes
//! requests, resolves the tenant and maps storage errors to HTTP statuses.
//!
//! ## Features
//!
//! - **Event Listing**: Exact-match and negated filters, time ranges, free-text search, sort and paging
//! - **Event Lookup**: Single events by ID
//! - **Attribute Values**: Distinct values for filter pickers, with path truncation
//! - **Multi-Tenant**: Tenant scope from the `X-Tenant-ID` header
//! - **Query Deadlines**: Every backend query runs under a configurable deadline
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hermes_rest::{create_app, ServerConfig};
//! use hermes_persistence::backends::memory::MemoryBackend;
//!
//! let backend = MemoryBackend::from_json_file("events.json")?;
//! let app = create_app(backend);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/v1/events` | List events matching a filter |
//! | GET | `/v1/events/{event_id}` | Read one event |
//! | GET | `/v1/attributes/{query_name}` | Distinct values of an attribute |
//! | GET | `/health` | Health check |
//!
//! ## Configuration
//!
//! See [`ServerConfig`] for all options. Every option can be set through a
//! `HERMES_*` environment variable.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::{IndexLayoutKind, ServerConfig, StorageDriver};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use hermes_persistence::core::AuditStorage;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// This is a convenience function that creates the app with default settings.
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> Router
where
    S: AuditStorage + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Example
///
/// ```rust
/// use hermes_rest::{create_app_with_config, ServerConfig};
/// use hermes_persistence::backends::memory::MemoryBackend;
///
/// let app = create_app_with_config(MemoryBackend::new(), ServerConfig::for_testing());
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: AuditStorage + 'static,
{
    info!(
        backend = storage.backend_name(),
        max_limit = storage.max_limit(),
        "Creating REST API server"
    );

    let state = AppState::new(Arc::new(storage), config.clone());
    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // The API is read-only
    cors = cors.allow_methods([Method::GET, Method::OPTIONS]);

    // Configure headers
    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` overrides
/// the level when set.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hermes={level},hermes_rest={level},hermes_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
