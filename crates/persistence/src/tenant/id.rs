//! Tenant identifier type.
//!
//! This module defines the [`TenantId`] type, an opaque identifier naming the
//! project or domain whose audit events a query may see. A `TenantId` can only
//! be obtained through validation, so every value reaching a backend is known
//! to be non-empty and not the reserved placeholder.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::TenantError;

/// Placeholder written by event producers that could not determine the owning
/// tenant. It is never a valid query scope.
pub const UNAVAILABLE_TENANT: &str = "unavailable";

/// Characters that carry meaning in index names, index expressions or URL
/// paths. A tenant ID ends up in per-tenant index patterns, so none may appear.
const FORBIDDEN_CHARS: &[char] = &['*', ',', '/', '\\', '?', '#', '"', '<', '>', '|', ':'];

/// A validated tenant identifier.
///
/// # Examples
///
/// ```
/// use hermes_persistence::tenant::TenantId;
///
/// let tenant = TenantId::parse("b3b70c8271a845709f9a03030e705da7").unwrap();
/// assert_eq!(tenant.as_str(), "b3b70c8271a845709f9a03030e705da7");
///
/// assert!(TenantId::parse("").is_err());
/// assert!(TenantId::parse("unavailable").is_err());
/// assert!(TenantId::parse("*").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Validates and wraps a tenant identifier.
    ///
    /// Surrounding whitespace is trimmed before validation.
    pub fn parse(id: &str) -> Result<Self, TenantError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(TenantError::EmptyTenantId);
        }
        if id == UNAVAILABLE_TENANT {
            return Err(TenantError::UnavailableTenantId {
                tenant_id: id.to_string(),
            });
        }
        if let Some(c) = id
            .chars()
            .find(|c| c.is_whitespace() || FORBIDDEN_CHARS.contains(c))
        {
            return Err(invalid(id, format!("contains forbidden character {c:?}")));
        }
        if id.starts_with(['-', '_', '+']) {
            return Err(invalid(id, "must not start with '-', '_' or '+'".to_string()));
        }
        Ok(Self(id.to_string()))
    }

    /// Returns the tenant ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid(id: &str, reason: String) -> TenantError {
    TenantError::InvalidTenantId {
        tenant_id: id.to_string(),
        reason,
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TenantId({})", self.0)
    }
}

impl FromStr for TenantId {
    type Err = TenantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TenantId::parse(s)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
