//! Application state for the audit-event API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the storage backend and the server configuration.

use std::sync::Arc;

use hermes_persistence::core::{AuditStorage, QueryContext};

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`AuditStorage`])
///
/// # Example
///
/// ```rust
/// use hermes_rest::{AppState, ServerConfig};
/// use hermes_persistence::backends::memory::MemoryBackend;
/// use std::sync::Arc;
///
/// let state = AppState::new(Arc::new(MemoryBackend::new()), ServerConfig::for_testing());
/// assert_eq!(state.default_tenant(), None);
/// ```
pub struct AppState<S> {
    /// The storage backend.
    storage: Arc<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: AuditStorage> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the tenant used when a request names none.
    pub fn default_tenant(&self) -> Option<&str> {
        self.config.default_tenant.as_deref()
    }

    /// Creates the context for one backend query, bounded by the query timeout.
    pub fn query_context(&self) -> QueryContext {
        QueryContext::with_timeout(self.config.query_timeout())
    }
}
