//! Request extractors.
//!
//! - [`TenantExtractor`] - Tenant scope from the `X-Tenant-ID` header
//! - [`EventQueryParams`], [`AttributeQueryParams`] - Query strings decoded
//!   into persistence filters

pub mod query;
pub mod tenant;

pub use query::{AttributeQueryParams, EventQueryParams};
pub use tenant::{TenantExtractor, X_TENANT_ID};
