//! Hermes
//!
//! Serves CADF audit events from Elasticsearch or OpenSearch over HTTP.

use std::sync::Arc;

use clap::Parser;
use hermes_persistence::backends::memory::MemoryBackend;
use hermes_persistence::core::AuditStorage;
use hermes_rest::{ServerConfig, StorageDriver, create_app_with_config, init_logging};
use tracing::info;

/// Creates the Elasticsearch backend from the server configuration.
#[cfg(feature = "elasticsearch")]
fn create_elasticsearch_backend(config: &ServerConfig) -> anyhow::Result<Arc<dyn AuditStorage>> {
    use hermes_persistence::backends::elasticsearch::ElasticsearchBackend;

    let es_config = config.elasticsearch_config();
    info!(
        nodes = ?es_config.nodes,
        layout = ?es_config.index_layout,
        "Initializing Elasticsearch backend"
    );
    Ok(Arc::new(ElasticsearchBackend::new(es_config)))
}

/// Fallback when the elasticsearch feature is not enabled.
#[cfg(not(feature = "elasticsearch"))]
fn create_elasticsearch_backend(_config: &ServerConfig) -> anyhow::Result<Arc<dyn AuditStorage>> {
    anyhow::bail!(
        "The elasticsearch driver requires the 'elasticsearch' feature. \
         Build with: cargo build -p hermes --features elasticsearch"
    )
}

/// Creates the OpenSearch backend from the server configuration.
#[cfg(feature = "opensearch")]
fn create_opensearch_backend(config: &ServerConfig) -> anyhow::Result<Arc<dyn AuditStorage>> {
    use hermes_persistence::backends::opensearch::OpenSearchBackend;

    let os_config = config.opensearch_config();
    info!(
        url = %os_config.url,
        layout = ?os_config.index_layout,
        "Initializing OpenSearch backend"
    );
    Ok(Arc::new(OpenSearchBackend::new(os_config)))
}

/// Fallback when the opensearch feature is not enabled.
#[cfg(not(feature = "opensearch"))]
fn create_opensearch_backend(_config: &ServerConfig) -> anyhow::Result<Arc<dyn AuditStorage>> {
    anyhow::bail!(
        "The opensearch driver requires the 'opensearch' feature. \
         Build with: cargo build -p hermes --features opensearch"
    )
}

/// Creates the in-memory backend, seeded from the fixture file when one is set.
fn create_memory_backend(config: &ServerConfig) -> anyhow::Result<Arc<dyn AuditStorage>> {
    let backend = match &config.memory_fixture {
        Some(path) => {
            info!(fixture = %path.display(), "Initializing memory backend");
            MemoryBackend::from_json_file(path)?
        }
        None => {
            info!("Initializing empty memory backend");
            MemoryBackend::new()
        }
    };
    Ok(Arc::new(backend))
}

/// Builds the storage selected by the configured driver.
fn create_storage(config: &ServerConfig) -> anyhow::Result<Arc<dyn AuditStorage>> {
    match config.storage_driver {
        StorageDriver::Elasticsearch => create_elasticsearch_backend(config),
        StorageDriver::Opensearch => create_opensearch_backend(config),
        StorageDriver::Hybrid => {
            use hermes_persistence::composite::HybridStorage;

            let primary = create_opensearch_backend(config)?;
            let secondary = create_elasticsearch_backend(config)?;
            info!("Reading from OpenSearch with Elasticsearch fallback");
            Ok(Arc::new(HybridStorage::new(primary, secondary)))
        }
        StorageDriver::Memory => create_memory_backend(config),
    }
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        storage_driver = %config.storage_driver,
        default_tenant = config.default_tenant.as_deref().unwrap_or("*"),
        "Starting Hermes"
    );

    let storage = create_storage(&config)?;
    let app = create_app_with_config(storage, config.clone());
    serve(app, &config).await
}
