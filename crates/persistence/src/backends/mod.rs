//! Search backend implementations.
//!
//! Each backend implements [`AuditStorage`](crate::core::AuditStorage) on top
//! of the shared query plans in [`crate::search`]. The search-engine backends
//! are gated behind feature flags.
//!
//! # Available Backends
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Elasticsearch | `elasticsearch` | Official client, typed Query DSL |
//! | OpenSearch | `opensearch` | REST `_search` over HTTP + JSON |
//! | Memory | always | Evaluates plans in process, for tests and local fixtures |
//!
//! # Example
//!
//! ```
//! use hermes_persistence::backends::memory::MemoryBackend;
//! use hermes_persistence::core::AuditStorage;
//!
//! let backend = MemoryBackend::new().with_max_limit(1000);
//! assert_eq!(backend.max_limit(), 1000);
//! assert!(backend.is_empty());
//! ```

#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;

#[cfg(feature = "opensearch")]
pub mod opensearch;

pub mod memory;
