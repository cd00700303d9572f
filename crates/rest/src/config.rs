//! Server configuration for the audit-event API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HERMES_SERVER_PORT` | 8080 | Server port |
//! | `HERMES_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `HERMES_LOG_LEVEL` | info | Log level |
//! | `HERMES_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `HERMES_QUERY_TIMEOUT` | 20 | Deadline for backend queries (seconds) |
//! | `HERMES_ENABLE_CORS` | true | Enable CORS |
//! | `HERMES_CORS_ORIGINS` | * | Allowed origins |
//! | `HERMES_CORS_HEADERS` | Content-Type,Authorization,Accept,X-Tenant-ID | Allowed headers |
//! | `HERMES_DEFAULT_TENANT` | (none) | Tenant for requests without `X-Tenant-ID` |
//! | `HERMES_STORAGE_DRIVER` | elasticsearch | `elasticsearch`, `opensearch`, `hybrid` or `memory` |
//! | `HERMES_INDEX_LAYOUT` | consolidated | `consolidated` or `per-tenant` |
//! | `HERMES_INDEX_NAME` | hermes | Consolidated index name |
//! | `HERMES_TENANT_FIELD` | tenant_ids | Consolidated per-document tenant field |
//! | `HERMES_INDEX_PREFIX` | audit | Per-tenant index prefix |
//! | `HERMES_ELASTICSEARCH_URL` | http://localhost:9200 | Elasticsearch node |
//! | `HERMES_OPENSEARCH_URL` | http://localhost:9200 | OpenSearch URL |
//! | `HERMES_MEMORY_FIXTURE` | (none) | JSON event file for the memory driver |
//!
//! # Example
//!
//! ```rust
//! use hermes_rest::{ServerConfig, StorageDriver};
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     storage_driver: StorageDriver::Memory,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use hermes_persistence::search::IndexLayout;
use hermes_persistence::tenant::TenantScope;

/// Which storage the server reads audit events from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageDriver {
    /// A single Elasticsearch cluster.
    Elasticsearch,
    /// A single OpenSearch cluster.
    Opensearch,
    /// OpenSearch as primary and Elasticsearch as secondary, merged.
    Hybrid,
    /// In-process events, optionally loaded from a fixture file.
    Memory,
}

impl fmt::Display for StorageDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageDriver::Elasticsearch => write!(f, "elasticsearch"),
            StorageDriver::Opensearch => write!(f, "opensearch"),
            StorageDriver::Hybrid => write!(f, "hybrid"),
            StorageDriver::Memory => write!(f, "memory"),
        }
    }
}

/// How events are spread over indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IndexLayoutKind {
    /// One index, tenants separated by a document field.
    Consolidated,
    /// One index pattern per tenant.
    PerTenant,
}

/// Server configuration for the audit-event API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "hermes")]
#[command(about = "CADF audit event query server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "HERMES_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "HERMES_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "HERMES_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "HERMES_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Deadline for each backend query in seconds.
    #[arg(long, env = "HERMES_QUERY_TIMEOUT", default_value = "20")]
    pub query_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "HERMES_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "HERMES_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "HERMES_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept,X-Tenant-ID"
    )]
    pub cors_headers: String,

    /// Tenant for requests without an X-Tenant-ID header. Unset means all tenants.
    #[arg(long, env = "HERMES_DEFAULT_TENANT")]
    pub default_tenant: Option<String>,

    /// Storage driver.
    #[arg(long, env = "HERMES_STORAGE_DRIVER", value_enum, default_value = "elasticsearch")]
    pub storage_driver: StorageDriver,

    /// Index layout shared by the search backends.
    #[arg(long, env = "HERMES_INDEX_LAYOUT", value_enum, default_value = "consolidated")]
    pub index_layout: IndexLayoutKind,

    /// Index name for the consolidated layout.
    #[arg(long, env = "HERMES_INDEX_NAME", default_value = "hermes")]
    pub index_name: String,

    /// Document field holding tenant IDs in the consolidated layout.
    #[arg(long, env = "HERMES_TENANT_FIELD", default_value = "tenant_ids")]
    pub tenant_field: String,

    /// Index prefix for the per-tenant layout.
    #[arg(long, env = "HERMES_INDEX_PREFIX", default_value = "audit")]
    pub index_prefix: String,

    /// Elasticsearch node URL.
    #[arg(long, env = "HERMES_ELASTICSEARCH_URL", default_value = "http://localhost:9200")]
    pub elasticsearch_url: String,

    /// Elasticsearch username (basic auth, used with the password).
    #[arg(long, env = "HERMES_ELASTICSEARCH_USERNAME")]
    pub elasticsearch_username: Option<String>,

    /// Elasticsearch password.
    #[arg(long, env = "HERMES_ELASTICSEARCH_PASSWORD", hide_env_values = true)]
    pub elasticsearch_password: Option<String>,

    /// Largest result window Elasticsearch serves (0 for unlimited).
    #[arg(long, env = "HERMES_ELASTICSEARCH_MAX_RESULT_WINDOW", default_value = "10000")]
    pub elasticsearch_max_result_window: u64,

    /// Elasticsearch transport timeout in milliseconds.
    #[arg(long, env = "HERMES_ELASTICSEARCH_REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub elasticsearch_request_timeout_ms: u64,

    /// OpenSearch URL.
    #[arg(long, env = "HERMES_OPENSEARCH_URL", default_value = "http://localhost:9200")]
    pub opensearch_url: String,

    /// OpenSearch username (basic auth, used with the password).
    #[arg(long, env = "HERMES_OPENSEARCH_USERNAME")]
    pub opensearch_username: Option<String>,

    /// OpenSearch password.
    #[arg(long, env = "HERMES_OPENSEARCH_PASSWORD", hide_env_values = true)]
    pub opensearch_password: Option<String>,

    /// Largest result window OpenSearch serves (0 for unlimited).
    #[arg(long, env = "HERMES_OPENSEARCH_MAX_RESULT_WINDOW", default_value = "10000")]
    pub opensearch_max_result_window: u64,

    /// OpenSearch response timeout in milliseconds.
    #[arg(long, env = "HERMES_OPENSEARCH_RESPONSE_TIMEOUT_MS", default_value = "5000")]
    pub opensearch_response_timeout_ms: u64,

    /// JSON file with an array of events, loaded by the memory driver.
    #[arg(long, env = "HERMES_MEMORY_FIXTURE")]
    pub memory_fixture: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            query_timeout: 20,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_headers: "Content-Type,Authorization,Accept,X-Tenant-ID".to_string(),
            default_tenant: None,
            storage_driver: StorageDriver::Elasticsearch,
            index_layout: IndexLayoutKind::Consolidated,
            index_name: "hermes".to_string(),
            tenant_field: "tenant_ids".to_string(),
            index_prefix: "audit".to_string(),
            elasticsearch_url: "http://localhost:9200".to_string(),
            elasticsearch_username: None,
            elasticsearch_password: None,
            elasticsearch_max_result_window: 10000,
            elasticsearch_request_timeout_ms: 30000,
            opensearch_url: "http://localhost:9200".to_string(),
            opensearch_username: None,
            opensearch_password: None,
            opensearch_max_result_window: 10000,
            opensearch_response_timeout_ms: 5000,
            memory_fixture: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        Self::try_parse_from(["hermes"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the per-query deadline.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }

    /// Builds the index layout shared by both search backends.
    pub fn index_layout(&self) -> IndexLayout {
        match self.index_layout {
            IndexLayoutKind::Consolidated => {
                IndexLayout::consolidated(&self.index_name, &self.tenant_field)
            }
            IndexLayoutKind::PerTenant => IndexLayout::per_tenant(&self.index_prefix),
        }
    }

    /// Builds the Elasticsearch backend configuration.
    #[cfg(feature = "elasticsearch")]
    pub fn elasticsearch_config(&self) -> hermes_persistence::backends::elasticsearch::ElasticsearchConfig {
        use hermes_persistence::backends::elasticsearch::{ElasticsearchAuth, ElasticsearchConfig};

        let auth = match (&self.elasticsearch_username, &self.elasticsearch_password) {
            (Some(username), Some(password)) => Some(ElasticsearchAuth::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        };

        ElasticsearchConfig {
            nodes: vec![self.elasticsearch_url.clone()],
            index_layout: self.index_layout(),
            max_result_window: self.elasticsearch_max_result_window,
            request_timeout_ms: self.elasticsearch_request_timeout_ms,
            auth,
            ..Default::default()
        }
    }

    /// Builds the OpenSearch backend configuration.
    #[cfg(feature = "opensearch")]
    pub fn opensearch_config(&self) -> hermes_persistence::backends::opensearch::OpenSearchConfig {
        hermes_persistence::backends::opensearch::OpenSearchConfig {
            url: self.opensearch_url.clone(),
            username: self.opensearch_username.clone(),
            password: self.opensearch_password.clone(),
            index_layout: self.index_layout(),
            max_result_window: self.opensearch_max_result_window,
            response_timeout_ms: self.opensearch_response_timeout_ms,
            ..Default::default()
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.query_timeout == 0 {
            errors.push("Query timeout cannot be 0".to_string());
        }

        if self.query_timeout > self.request_timeout {
            errors.push("Query timeout cannot exceed request timeout".to_string());
        }

        if let Some(tenant) = &self.default_tenant
            && let Err(e) = TenantScope::parse(Some(tenant))
        {
            errors.push(format!("Default tenant is invalid: {}", e));
        }

        match self.index_layout {
            IndexLayoutKind::Consolidated => {
                if self.index_name.trim().is_empty() {
                    errors.push("Index name cannot be empty".to_string());
                }
                if self.tenant_field.trim().is_empty() {
                    errors.push("Tenant field cannot be empty".to_string());
                }
            }
            IndexLayoutKind::PerTenant => {
                if self.index_prefix.trim().is_empty() {
                    errors.push("Index prefix cannot be empty".to_string());
                }
                if self.default_tenant.as_deref().is_some_and(|t| t.contains('-')) {
                    errors.push(
                        "Default tenant cannot contain '-' with the per-tenant index layout"
                            .to_string(),
                    );
                }
            }
        }

        let uses_elasticsearch = matches!(
            self.storage_driver,
            StorageDriver::Elasticsearch | StorageDriver::Hybrid
        );
        let uses_opensearch = matches!(
            self.storage_driver,
            StorageDriver::Opensearch | StorageDriver::Hybrid
        );
        if uses_elasticsearch && self.elasticsearch_url.trim().is_empty() {
            errors.push("Elasticsearch URL cannot be empty".to_string());
        }
        if uses_opensearch && self.opensearch_url.trim().is_empty() {
            errors.push("OpenSearch URL cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0, the memory driver and no CORS.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            query_timeout: 2,
            enable_cors: false,
            storage_driver: StorageDriver::Memory,
            ..Default::default()
        }
    }
}
