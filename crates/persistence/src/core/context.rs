//! Per-query cancellation and deadline.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::BackendError;

/// Cancellation signal and optional deadline for one query.
///
/// Cloning a context shares its cancellation token, so cancelling any clone
/// aborts every backend call made with it.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl QueryContext {
    /// A context that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline_at(Instant::now() + timeout)
    }

    /// Sets the deadline.
    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Uses an existing token, typically a child of a request-wide one.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels every query running under this context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fails if the context is already cancelled or past its deadline.
    pub fn check(&self, backend_name: &str) -> Result<(), BackendError> {
        if self.is_cancelled() {
            return Err(BackendError::Cancelled {
                backend_name: backend_name.to_string(),
            });
        }
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            return Err(BackendError::DeadlineExceeded {
                backend_name: backend_name.to_string(),
            });
        }
        Ok(())
    }
}
