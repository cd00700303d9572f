//! Index addressing and tenant enforcement.
//!
//! Two layouts are supported:
//!
//! - **Consolidated**: all tenants share one index and every document lists
//!   its owners in a tenant field. A tenant scope becomes a term filter.
//! - **Per-tenant**: each tenant has its own family of indices named
//!   `{prefix}-{tenant}-*`. A tenant scope selects the index pattern. Tenant
//!   IDs containing `-` are rejected in this layout, since `audit-p1-*` would
//!   also match the indices of tenant `p1-x`.

use serde::{Deserialize, Serialize};

use crate::error::TenantError;
use crate::tenant::TenantScope;

fn default_index() -> String {
    "hermes".to_string()
}

fn default_tenant_field() -> String {
    "tenant_ids".to_string()
}

fn default_prefix() -> String {
    "audit".to_string()
}

/// How events are laid out across indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum IndexLayout {
    /// One shared index, tenant isolation by document field.
    Consolidated {
        #[serde(default = "default_index")]
        index: String,
        #[serde(default = "default_tenant_field")]
        tenant_field: String,
    },
    /// One index family per tenant.
    PerTenant {
        #[serde(default = "default_prefix")]
        prefix: String,
    },
}

impl Default for IndexLayout {
    fn default() -> Self {
        IndexLayout::Consolidated {
            index: default_index(),
            tenant_field: default_tenant_field(),
        }
    }
}

/// Where a query is sent and which tenant term, if any, it must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTarget {
    /// Index name or wildcard pattern.
    pub index: String,
    /// `(field, tenant id)` term that must match, for consolidated layouts.
    pub tenant_filter: Option<(String, String)>,
}

impl IndexLayout {
    /// Builds a per-tenant layout with the given prefix.
    pub fn per_tenant(prefix: impl Into<String>) -> Self {
        IndexLayout::PerTenant {
            prefix: prefix.into(),
        }
    }

    /// Builds a consolidated layout with the given index and tenant field.
    pub fn consolidated(index: impl Into<String>, tenant_field: impl Into<String>) -> Self {
        IndexLayout::Consolidated {
            index: index.into(),
            tenant_field: tenant_field.into(),
        }
    }

    /// Resolves the index and tenant term for a scope.
    ///
    /// ```
    /// use hermes_persistence::search::IndexLayout;
    /// use hermes_persistence::tenant::{TenantId, TenantScope};
    ///
    /// let scope = TenantScope::Tenant(TenantId::parse("p1").unwrap());
    /// let target = IndexLayout::per_tenant("audit").target(&scope).unwrap();
    /// assert_eq!(target.index, "audit-p1-*");
    /// assert!(target.tenant_filter.is_none());
    /// ```
    pub fn target(&self, scope: &TenantScope) -> Result<IndexTarget, TenantError> {
        let target = match self {
            IndexLayout::Consolidated {
                index,
                tenant_field,
            } => IndexTarget {
                index: index.clone(),
                tenant_filter: scope
                    .tenant()
                    .map(|id| (tenant_field.clone(), id.as_str().to_string())),
            },
            IndexLayout::PerTenant { prefix } => IndexTarget {
                index: match scope.tenant() {
                    Some(id) if id.as_str().contains('-') => {
                        return Err(TenantError::InvalidTenantId {
                            tenant_id: id.to_string(),
                            reason: "'-' is ambiguous in per-tenant index names".to_string(),
                        });
                    }
                    Some(id) => format!("{prefix}-{id}-*"),
                    None => format!("{prefix}-*"),
                },
                tenant_filter: None,
            },
        };
        Ok(target)
    }
}
