//! Elasticsearch backend implementation.

use std::fmt::Debug;
use std::time::Duration;

use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::{Elasticsearch, SearchParts};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::error::{BackendError, StorageResult};
use crate::search::{FieldMapping, IndexLayout, RawSearchResponse};

use super::query::SearchRequest;

pub(crate) const BACKEND_NAME: &str = "elasticsearch";

/// Authentication configuration for Elasticsearch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElasticsearchAuth {
    /// Basic username/password authentication.
    Basic {
        /// The username for basic auth.
        username: String,
        /// The password for basic auth.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The bearer token.
        token: String,
    },
}

/// Configuration for the Elasticsearch backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Elasticsearch node URLs (e.g., `["http://localhost:9200"]`).
    /// Currently uses the first node (single-node connection pool).
    pub nodes: Vec<String>,

    /// Where events live and how tenants are separated.
    #[serde(default)]
    pub index_layout: IndexLayout,

    /// Maximum result window size (default: 10000). `0` means unlimited.
    #[serde(default = "default_max_result_window")]
    pub max_result_window: u64,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Optional authentication.
    #[serde(default)]
    pub auth: Option<ElasticsearchAuth>,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,
}

fn default_max_result_window() -> u64 {
    10000
}

fn default_request_timeout_ms() -> u64 {
    30000
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            nodes: vec!["http://localhost:9200".to_string()],
            index_layout: IndexLayout::default(),
            max_result_window: default_max_result_window(),
            request_timeout_ms: default_request_timeout_ms(),
            auth: None,
            disable_certificate_validation: false,
        }
    }
}

/// Elasticsearch backend for audit events.
///
/// The client is built on first use. A failed build is returned to the caller
/// that triggered it and retried by the next call.
pub struct ElasticsearchBackend {
    config: ElasticsearchConfig,
    mapping: &'static FieldMapping,
    client: OnceCell<Elasticsearch>,
}

impl Debug for ElasticsearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchBackend")
            .field("config", &self.config)
            .field("connected", &self.client.initialized())
            .finish_non_exhaustive()
    }
}

impl ElasticsearchBackend {
    /// Creates a new Elasticsearch backend. No connection is made yet.
    pub fn new(config: ElasticsearchConfig) -> Self {
        Self {
            config,
            mapping: FieldMapping::cadf(),
            client: OnceCell::new(),
        }
    }

    /// Builds the Elasticsearch client from configuration.
    fn build_client(config: &ElasticsearchConfig) -> StorageResult<Elasticsearch> {
        let url = config
            .nodes
            .first()
            .cloned()
            .unwrap_or_else(|| "http://localhost:9200".to_string());

        let parsed_url: elasticsearch::http::Url = url.parse().map_err(|e| {
            BackendError::ConnectionFailed {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("Invalid URL '{}': {}", url, e),
            }
        })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);

        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some(ref auth) = config.auth {
            builder = match auth {
                ElasticsearchAuth::Basic { username, password } => {
                    builder.auth(Credentials::Basic(username.clone(), password.clone()))
                }
                ElasticsearchAuth::Bearer { token } => {
                    builder.auth(Credentials::Bearer(token.clone()))
                }
            };
        }

        let transport = builder.build().map_err(|e| BackendError::ConnectionFailed {
            backend_name: BACKEND_NAME.to_string(),
            message: format!("Failed to build transport: {}", e),
        })?;

        tracing::info!(url = %url, "Elasticsearch client initialized");
        Ok(Elasticsearch::new(transport))
    }

    /// Returns the client, building it on first use.
    pub(crate) async fn client(&self) -> StorageResult<&Elasticsearch> {
        self.client
            .get_or_try_init(|| async { Self::build_client(&self.config) })
            .await
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &ElasticsearchConfig {
        &self.config
    }

    pub(crate) fn mapping(&self) -> &'static FieldMapping {
        self.mapping
    }

    /// Sends a `_search` request and decodes the response.
    ///
    /// Error statuses become [`BackendError::Reported`] with the parsed error
    /// body; client failures become [`BackendError::Transport`].
    pub(crate) async fn search(
        &self,
        index: &str,
        body: SearchRequest,
    ) -> StorageResult<RawSearchResponse> {
        let client = self.client().await?;

        tracing::debug!(
            index = index,
            body = %serde_json::to_value(&body).unwrap_or_default(),
            "Elasticsearch search"
        );

        let response = client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| BackendError::transport(BACKEND_NAME, e))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await;
            return Err(BackendError::reported_body(BACKEND_NAME, status.as_u16(), body).into());
        }

        let raw = response
            .json::<RawSearchResponse>()
            .await
            .map_err(|e| BackendError::Serialization {
                message: format!("Failed to parse search response: {}", e),
            })?;
        Ok(raw)
    }
}
