//! Execution of backend round trips.
//!
//! [`execute`] wraps one backend call: it races the call against the query
//! context's cancellation token and deadline, and logs failures according to
//! their classification. It never retries.

use std::future::Future;

use crate::error::{BackendError, StorageError, StorageResult};

use super::QueryContext;

/// Runs a backend round trip under a query context.
///
/// Cancellation wins over the deadline, and both win over a call that
/// completes in the same poll. The in-flight call is dropped when either fires.
pub async fn execute<F, T>(ctx: &QueryContext, backend_name: &str, call: F) -> StorageResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    ctx.check(backend_name)?;

    let cancelled = ctx.cancellation_token().cancelled();
    let result = match ctx.deadline() {
        Some(deadline) => {
            tokio::select! {
                biased;
                _ = cancelled => Err(cancelled_error(backend_name)),
                _ = tokio::time::sleep_until(deadline) => Err(StorageError::from(
                    BackendError::DeadlineExceeded {
                        backend_name: backend_name.to_string(),
                    },
                )),
                result = call => result,
            }
        }
        None => {
            tokio::select! {
                biased;
                _ = cancelled => Err(cancelled_error(backend_name)),
                result = call => result,
            }
        }
    };

    if let Err(ref err) = result {
        log_failure(backend_name, err);
    }
    result
}

fn cancelled_error(backend_name: &str) -> StorageError {
    StorageError::from(BackendError::Cancelled {
        backend_name: backend_name.to_string(),
    })
}

fn log_failure(backend_name: &str, err: &StorageError) {
    match err {
        StorageError::Backend(BackendError::Reported {
            status, details, ..
        }) => {
            tracing::error!(
                backend = backend_name,
                status = *status,
                details = %details,
                "search backend reported an error"
            );
        }
        StorageError::Backend(err) if err.is_cancellation() => {
            tracing::debug!(backend = backend_name, "query aborted: {}", err);
        }
        StorageError::Backend(err) => {
            tracing::error!(backend = backend_name, "query failed: {}", err);
        }
        other => {
            tracing::debug!(backend = backend_name, "query rejected: {}", other);
        }
    }
}
