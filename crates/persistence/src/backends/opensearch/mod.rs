//! OpenSearch backend implementation.
//!
//! OpenSearch is queried through its REST `_search` API with JSON bodies
//! built by [`query`] from the shared plans in [`crate::search`]. Index
//! addressing and tenant isolation follow the configured
//! [`IndexLayout`](crate::search::IndexLayout), exactly as for Elasticsearch.
//!
//! # Example
//!
//! ```ignore
//! use hermes_persistence::backends::opensearch::{OpenSearchBackend, OpenSearchConfig};
//!
//! let backend = OpenSearchBackend::new(OpenSearchConfig {
//!     url: "https://opensearch:9200".to_string(),
//!     username: Some("hermes".to_string()),
//!     password: Some(password),
//!     ..Default::default()
//! });
//! ```

mod backend;
pub mod query;
mod storage;

pub use backend::{OpenSearchBackend, OpenSearchConfig};
