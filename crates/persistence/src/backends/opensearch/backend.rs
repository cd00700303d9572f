//! OpenSearch backend implementation.

use std::fmt::Debug;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::error::{BackendError, StorageResult};
use crate::search::{FieldMapping, IndexLayout, RawSearchResponse};

pub(crate) const BACKEND_NAME: &str = "opensearch";

/// Configuration for the OpenSearch backend.
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenSearchConfig {
    /// Base URL of the cluster (e.g., `"https://opensearch:9200"`).
    #[serde(default = "default_url")]
    pub url: String,

    /// Username for basic auth. Auth is only sent when a password is set too.
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Where events live and how tenants are separated.
    #[serde(default)]
    pub index_layout: IndexLayout,

    /// Maximum result window size (default: 10000). `0` means unlimited.
    #[serde(default = "default_max_result_window")]
    pub max_result_window: u64,

    /// Time allowed for the whole response in milliseconds (default: 5000).
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,

    /// Idle connections kept per host (default: 10).
    #[serde(default = "default_max_idle_per_host")]
    pub max_idle_per_host: usize,

    /// How long an idle connection is kept in milliseconds (default: 90000).
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,
}

fn default_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_max_result_window() -> u64 {
    10000
}

fn default_response_timeout_ms() -> u64 {
    5000
}

fn default_max_idle_per_host() -> usize {
    10
}

fn default_idle_timeout_ms() -> u64 {
    90000
}

impl Default for OpenSearchConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: None,
            password: None,
            index_layout: IndexLayout::default(),
            max_result_window: default_max_result_window(),
            response_timeout_ms: default_response_timeout_ms(),
            max_idle_per_host: default_max_idle_per_host(),
            idle_timeout_ms: default_idle_timeout_ms(),
            disable_certificate_validation: false,
        }
    }
}

impl Debug for OpenSearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSearchConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("index_layout", &self.index_layout)
            .field("max_result_window", &self.max_result_window)
            .field("response_timeout_ms", &self.response_timeout_ms)
            .finish_non_exhaustive()
    }
}

/// OpenSearch backend for audit events.
///
/// Talks to the `_search` API with plain HTTP + JSON. The HTTP client is built
/// on first use; a failed build is returned to that caller and retried by the
/// next one.
pub struct OpenSearchBackend {
    config: OpenSearchConfig,
    mapping: &'static FieldMapping,
    client: OnceCell<reqwest::Client>,
}

impl Debug for OpenSearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSearchBackend")
            .field("config", &self.config)
            .field("connected", &self.client.initialized())
            .finish_non_exhaustive()
    }
}

impl OpenSearchBackend {
    /// Creates a new OpenSearch backend. No connection is made yet.
    pub fn new(config: OpenSearchConfig) -> Self {
        Self {
            config,
            mapping: FieldMapping::cadf(),
            client: OnceCell::new(),
        }
    }

    fn build_client(config: &OpenSearchConfig) -> StorageResult<reqwest::Client> {
        reqwest::Url::parse(&config.url).map_err(|e| BackendError::ConnectionFailed {
            backend_name: BACKEND_NAME.to_string(),
            message: format!("Invalid URL '{}': {}", config.url, e),
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.response_timeout_ms))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .pool_idle_timeout(Duration::from_millis(config.idle_timeout_ms))
            .danger_accept_invalid_certs(config.disable_certificate_validation)
            .build()
            .map_err(|e| BackendError::ConnectionFailed {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        tracing::info!(url = %config.url, "OpenSearch client initialized");
        Ok(client)
    }

    /// Returns the client, building it on first use.
    pub(crate) async fn client(&self) -> StorageResult<&reqwest::Client> {
        self.client
            .get_or_try_init(|| async { Self::build_client(&self.config) })
            .await
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &OpenSearchConfig {
        &self.config
    }

    pub(crate) fn mapping(&self) -> &'static FieldMapping {
        self.mapping
    }

    fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.config.url.trim_end_matches('/'), index)
    }

    /// Posts a `_search` request and decodes the response.
    pub(crate) async fn search(&self, index: &str, body: Value) -> StorageResult<RawSearchResponse> {
        let client = self.client().await?;
        let url = self.search_url(index);

        tracing::debug!(url = %url, body = %body, "OpenSearch search");

        let mut request = client.post(&url).json(&body);
        if let (Some(username), Some(password)) = (&self.config.username, &self.config.password) {
            request = request.basic_auth(username, Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::transport(BACKEND_NAME, e))?;

        let status = response.status();
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
