//! Query scope derived from the caller's tenant.

use std::fmt;

use crate::error::TenantError;

use super::TenantId;

/// The set of tenants a query may read events from.
///
/// Backends only ever receive a `TenantScope`, never a raw string, so tenant
/// validation is guaranteed to happen before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantScope {
    /// No tenant restriction. Used by cloud-admin style callers.
    All,
    /// Only events belonging to this tenant.
    Tenant(TenantId),
}

impl TenantScope {
    /// Builds a scope from optional, untrusted input.
    ///
    /// An absent identifier means "no restriction"; a present one must pass
    /// [`TenantId::parse`].
    ///
    /// ```
    /// use hermes_persistence::tenant::TenantScope;
    ///
    /// assert_eq!(TenantScope::parse(None).unwrap(), TenantScope::All);
    /// assert!(TenantScope::parse(Some("")).is_err());
    /// assert!(TenantScope::parse(Some("p1")).unwrap().tenant().is_some());
    /// ```
    pub fn parse(tenant_id: Option<&str>) -> Result<Self, TenantError> {
        match tenant_id {
            None => Ok(TenantScope::All),
            Some(id) => TenantId::parse(id).map(TenantScope::Tenant),
        }
    }

    /// Returns the tenant this scope is restricted to, if any.
    pub fn tenant(&self) -> Option<&TenantId> {
        match self {
            TenantScope::All => None,
            TenantScope::Tenant(id) => Some(id),
        }
    }

    /// Returns `true` if events from the given tenant are visible in this scope.
    pub fn allows(&self, tenant_id: &str) -> bool {
        match self {
            TenantScope::All => true,
            TenantScope::Tenant(id) => id.as_str() == tenant_id,
        }
    }
}

impl From<TenantId> for TenantScope {
    fn from(id: TenantId) -> Self {
        TenantScope::Tenant(id)
    }
}

impl fmt::Display for TenantScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenantScope::All => write!(f, "*"),
            TenantScope::Tenant(id) => write!(f, "{id}"),
        }
    }
}
