//! Elasticsearch backend implementation.
//!
//! Queries are built as typed Query DSL structs ([`query`]) from the shared
//! plans in [`crate::search`] and submitted through the official
//! `elasticsearch` client.
//!
//! # Index Structure
//!
//! Depending on [`IndexLayout`](crate::search::IndexLayout), events are read
//! from one consolidated index (tenant isolation via the `tenant_ids`
//! document field) or from per-tenant index patterns `{prefix}-{tenant}-*`.
//!
//! # Example
//!
//! ```ignore
//! use hermes_persistence::backends::elasticsearch::{ElasticsearchBackend, ElasticsearchConfig};
//!
//! let config = ElasticsearchConfig {
//!     nodes: vec!["http://localhost:9200".to_string()],
//!     ..Default::default()
//! };
//! let backend = ElasticsearchBackend::new(config);
//! let page = backend.get_events(&QueryContext::new(), &filter, &TenantScope::All).await?;
//! ```

mod backend;
pub mod query;
mod storage;

pub use backend::{ElasticsearchAuth, ElasticsearchBackend, ElasticsearchConfig};
