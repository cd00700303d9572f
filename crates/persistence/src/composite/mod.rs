//! Hybrid storage for migration windows.
//!
//! While audit events are being moved from one search cluster to another,
//! neither cluster alone holds the complete trail. [`HybridStorage`] reads
//! both and merges the answers so callers see one consistent result:
//!
//! | Operation | Behaviour |
//! |-----------|-----------|
//! | `get_events` | Both queried concurrently, merged by [`merger::merge_pages`] |
//! | `get_event` | Primary first, secondary on a miss |
//! | `get_attributes` | Union of both, sorted and deduplicated |
//! | `max_limit` | Smallest non-zero limit |
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use hermes_persistence::composite::HybridStorage;
//!
//! let storage = HybridStorage::new(
//!     Arc::new(OpenSearchBackend::new(opensearch_config)),
//!     Arc::new(ElasticsearchBackend::new(elasticsearch_config)),
//! );
//! ```

pub mod merger;
mod storage;

pub use storage::HybridStorage;
