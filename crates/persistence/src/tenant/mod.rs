//! Tenant scoping for audit-event queries.
//!
//! Audit events belong to a tenant (a project or domain). Every query carries a
//! [`TenantScope`] which is either unrestricted or limited to one validated
//! [`TenantId`]. How the scope is enforced depends on the index layout: the
//! consolidated layout adds a term filter on a per-document tenant field while
//! the per-tenant layout addresses a tenant-specific index pattern (see
//! [`crate::search::index`]).

mod id;
mod scope;

pub use id::{TenantId, UNAVAILABLE_TENANT};
pub use scope::TenantScope;
