//! Core storage traits and abstractions.
//!
//! - [`AuditStorage`] - The capability set every backend implements
//! - [`BackendKind`] - Which search engine a backend talks to
//! - [`QueryContext`] - Cancellation and deadline for one query
//! - [`execute`] - Runs a backend round trip under a query context
//!
//! # Request Flow
//!
//! ```text
//! EventFilter / AttributeFilter + TenantScope
//!     └── AuditStorage::get_*
//!             └── search::plan (mapping, normalization, default sort)
//!                     └── backend adapter (serialize plan)
//!                             └── executor::execute (cancellation, deadline)
//!                                     └── search::results (decode, truncate, dedup)
//! ```

pub mod context;
pub mod executor;
pub mod storage;

pub use context::QueryContext;
pub use executor::execute;
pub use storage::{AuditStorage, BackendKind};
