/*!
 * Executor Traits
 *
 * Core abstraction for running a task on the caller thread under some
 * synchronization discipline
 */

use crate::core::errors::{BoxError, SyncError, SyncResult};

/// Runs tasks on the calling thread while holding a lock
///
/// Implementations must release whatever they hold on every exit path,
/// including a panic unwinding out of the task.
pub trait Executor: Send + Sync {
    /// Run `task` and return its value unchanged
    ///
    /// A task that returns a `Result` gets that `Result` back as-is; a task
    /// that panics keeps panicking after the lock is released.
    fn execute<T, F>(&self, task: F) -> T
    where
        F: FnOnce() -> T;

    /// Run a fallible task, folding its error into [`SyncError::TaskFailed`]
    ///
    /// The original error stays reachable through `source()`.
    fn submit_unchecked<T, E, F>(&self, task: F) -> SyncResult<T>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        self.execute(task).map_err(SyncError::task_failed)
    }
}
