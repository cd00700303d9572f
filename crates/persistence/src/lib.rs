//! Hermes Persistence Layer
//!
//! This crate translates audit-event queries into search-engine requests and
//! normalizes the responses. Events follow the CADF (Cloud Auditing Data
//! Federation) format and are stored in Elasticsearch or OpenSearch.
//!
//! # Features
//!
//! - **Multiple Backends**: Elasticsearch, OpenSearch, and an in-memory backend
//! - **Hybrid Reads**: Query two clusters at once during a migration
//! - **Tenant Isolation**: Every query is scoped to a tenant or explicitly unscoped
//! - **Cancellation**: Queries honour a cancellation token and a deadline
//!
//! # Backend Features
//!
//! ```toml
//! [dependencies]
//! hermes-persistence = { version = "0.1", features = ["opensearch"] }
//! ```
//!
//! - `elasticsearch` (default) - official Elasticsearch client
//! - `opensearch` (default) - OpenSearch over its REST API
//!
//! # Architecture
//!
//! - [`tenant`] - Tenant identifiers and query scope
//! - [`types`] - CADF events and filter descriptions
//! - [`error`] - Error types for all operations
//! - [`core`] - The storage trait, query context and executor
//! - [`search`] - Field mapping, query plans and result normalization
//! - [`backends`] - Backend implementations
//! - [`composite`] - Hybrid storage over two backends
//!
//! # Quick Start
//!
//! ```
//! use hermes_persistence::backends::memory::MemoryBackend;
//! use hermes_persistence::core::{AuditStorage, QueryContext};
//! use hermes_persistence::tenant::TenantScope;
//! use hermes_persistence::types::{Event, EventFilter};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let backend = MemoryBackend::with_events(vec![Event {
//!     id: "7be6c4ff-b761-5f1f-b234-f5d41616c2cd".to_string(),
//!     outcome: "success".to_string(),
//!     ..Event::default()
//! }]);
//!
//! let filter = EventFilter {
//!     outcome: "success".to_string(),
//!     ..EventFilter::default()
//! };
//! let page = backend
//!     .get_events(&QueryContext::new(), &filter, &TenantScope::All)
//!     .await
//!     .unwrap();
//! assert_eq!(page.total, 1);
//! # });
//! ```
//!
//! # Tenants
//!
//! The tenant of a request is parsed into a [`TenantScope`](tenant::TenantScope).
//! An absent tenant means all tenants; an empty or reserved one is rejected.
//!
//! ```
//! use hermes_persistence::tenant::TenantScope;
//!
//! assert_eq!(TenantScope::parse(None).unwrap(), TenantScope::All);
//! assert!(TenantScope::parse(Some("")).is_err());
//! assert!(TenantScope::parse(Some("unavailable")).is_err());
//! assert!(TenantScope::parse(Some("p-1")).is_ok());
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod composite;
pub mod core;
pub mod error;
pub mod search;
pub mod tenant;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use tenant::{TenantId, TenantScope};
pub use types::{AttributeFilter, Event, EventFilter, EventPage};

pub use core::{AuditStorage, BackendKind, QueryContext};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
