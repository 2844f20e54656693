/*!
 * Error Types
 * Centralized error handling with thiserror and miette diagnostics
 */

use miette::Diagnostic;
use thiserror::Error;

/// Boxed cause carried by [`SyncError::TaskFailed`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by registries, executors and buffers
///
/// Contract violations are programmer errors: they are reported immediately
/// and never retried internally.
#[derive(Error, Debug, Diagnostic)]
pub enum SyncError {
    #[error("Release without a matching acquire")]
    #[diagnostic(
        code(sync::release_without_acquire),
        help("Every release must pair with exactly one earlier successful acquire for an equal key.")
    )]
    ReleaseWithoutAcquire,

    #[error("Batch size must not be negative: {0}")]
    #[diagnostic(
        code(sync::negative_batch_size),
        help("Pass 0 to drain nothing, or a positive maximum number of elements.")
    )]
    NegativeBatchSize(isize),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(sync::invalid_configuration),
        help("Shard count must be at least 1.")
    )]
    InvalidConfiguration(String),

    #[error("Task execution failed: {0}")]
    #[diagnostic(code(sync::task_failed))]
    TaskFailed(#[source] BoxError),
}

impl SyncError {
    /// Wrap a task failure, keeping the original error as `source()`
    pub fn task_failed<E>(cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        SyncError::TaskFailed(cause.into())
    }

    /// True for caller bugs (as opposed to failures raised by a task)
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            SyncError::ReleaseWithoutAcquire
                | SyncError::NegativeBatchSize(_)
                | SyncError::InvalidConfiguration(_)
        )
    }
}

/// Result type for synchronization operations
pub type SyncResult<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, Error)]
    #[error("disk on fire")]
    struct Cause;

    #[test]
    fn test_task_failed_keeps_cause() {
        let err = SyncError::task_failed(Cause);
        assert!(!err.is_contract_violation());
        assert_eq!(err.to_string(), "Task execution failed: disk on fire");

        let source = err.source().expect("cause must be chained");
        assert!(source.downcast_ref::<Cause>().is_some());
    }

    #[test]
    fn test_contract_violations() {
        assert!(SyncError::ReleaseWithoutAcquire.is_contract_violation());
        assert!(SyncError::NegativeBatchSize(-1).is_contract_violation());
        assert!(SyncError::InvalidConfiguration("zero".into()).is_contract_violation());
    }

    #[test]
    fn test_string_causes_box() {
        let err = SyncError::task_failed("plain message");
        assert_eq!(err.to_string(), "Task execution failed: plain message");
    }
}
