//! Tenant scope extractor.
//!
//! Reads the tenant from the `X-Tenant-ID` header, falling back to the
//! configured default tenant. Without either the request is unscoped.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use hermes_persistence::core::AuditStorage;
use hermes_persistence::tenant::TenantScope;
use http::{HeaderMap, HeaderName};
use tracing::debug;

use crate::error::RestError;
use crate::state::AppState;

/// Header name for tenant identification.
pub static X_TENANT_ID: HeaderName = HeaderName::from_static("x-tenant-id");

/// Axum extractor for the tenant scope of a request.
///
/// # Example
///
/// ```rust,ignore
/// use hermes_rest::extractors::TenantExtractor;
///
/// async fn handler(tenant: TenantExtractor) {
///     println!("Tenant: {}", tenant.scope());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TenantExtractor {
    scope: TenantScope,
}

impl TenantExtractor {
    /// Returns the validated scope.
    pub fn scope(&self) -> &TenantScope {
        &self.scope
    }

    /// Consumes the extractor and returns the scope.
    pub fn into_scope(self) -> TenantScope {
        self.scope
    }
}

impl std::fmt::Display for TenantExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.scope)
    }
}

/// Resolves the scope from headers and the configured default.
fn resolve_scope(headers: &HeaderMap, default: Option<&str>) -> Result<TenantScope, RestError> {
    let header = match headers.get(&X_TENANT_ID) {
        Some(value) => Some(value.to_str().map_err(|_| RestError::BadRequest {
            message: "X-Tenant-ID header is not valid text".to_string(),
        })?),
        None => None,
    };

    let scope = TenantScope::parse(header.or(default)).map_err(|e| RestError::BadRequest {
        message: e.to_string(),
    })?;
    debug!(tenant = %scope, "Resolved tenant scope");
    Ok(scope)
}

impl<S> FromRequestParts<AppState<S>> for TenantExtractor
where
    S: AuditStorage + 'static,
{
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let scope = resolve_scope(&parts.headers, state.default_tenant())?;
        Ok(TenantExtractor { scope })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_header_wins_over_default() {
        let mut headers = HeaderMap::new();
        headers.insert(&X_TENANT_ID, HeaderValue::from_static("p1"));
        let scope = resolve_scope(&headers, Some("p2")).unwrap();
        assert_eq!(scope.to_string(), "p1");
    }

    #[test]
    fn test_default_tenant_used_without_header() {
        let scope = resolve_scope(&HeaderMap::new(), Some("p2")).unwrap();
        assert_eq!(scope.to_string(), "p2");
    }

    #[test]
    fn test_no_tenant_means_all() {
        let scope = resolve_scope(&HeaderMap::new(), None).unwrap();
        assert_eq!(scope, TenantScope::All);
    }

    #[test]
    fn test_empty_and_reserved_headers_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(&X_TENANT_ID, HeaderValue::from_static(""));
        assert!(resolve_scope(&headers, None).is_err());

        headers.insert(&X_TENANT_ID, HeaderValue::from_static("unavailable"));
        assert!(resolve_scope(&headers, None).is_err());
    }
}
