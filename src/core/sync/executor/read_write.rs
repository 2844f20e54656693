/*!
 * Read/Write Synchronized Executor
 * Shared-read, exclusive-write task execution on the caller thread
 */

use crate::core::errors::{BoxError, SyncError, SyncResult};
use parking_lot::RwLock;
use std::sync::Arc;

/// Executes tasks under either side of a read/write lock
///
/// - `read_execute` calls never block each other and carry the memory
///   semantics of taking and dropping the read side
/// - `write_execute` calls never overlap with any other call and carry the
///   memory semantics of taking and dropping the write side
///
/// Reads are reentrant: a task may call `read_execute` again on the same
/// executor, even while a writer is queued. The write side is not:
/// calling `write_execute` from inside any task running on the same
/// executor deadlocks.
///
/// Executors built with [`with_lock`](Self::with_lock) over the same lock
/// share one read/write discipline.
#[derive(Debug, Default)]
pub struct ReadWriteSynchronizedExecutor {
    lock: Arc<RwLock<()>>,
}

impl ReadWriteSynchronizedExecutor {
    /// Create a new executor over its own lock
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executor over a caller-supplied lock
    pub fn with_lock(lock: Arc<RwLock<()>>) -> Self {
        Self { lock }
    }

    /// The lock tasks run under
    pub fn lock(&self) -> &Arc<RwLock<()>> {
        &self.lock
    }

    /// Run `task` holding the shared read side
    ///
    /// Taken recursively, so it does not queue behind a waiting writer; a
    /// steady stream of readers can delay writers.
    #[inline]
    pub fn read_execute<T, F>(&self, task: F) -> T
    where
        F: FnOnce() -> T,
    {
        let _guard = self.lock.read_recursive();
        task()
    }

    /// Run `task` holding the exclusive write side
    #[inline]
    pub fn write_execute<T, F>(&self, task: F) -> T
    where
        F: FnOnce() -> T,
    {
        let _guard = self.lock.write();
        task()
    }

    /// [`read_execute`](Self::read_execute) for a fallible task, folding its
    /// error into [`SyncError::TaskFailed`]
    pub fn read_submit_unchecked<T, E, F>(&self, task: F) -> SyncResult<T>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        self.read_execute(task).map_err(SyncError::task_failed)
    }

    /// [`write_execute`](Self::write_execute) for a fallible task, folding
    /// its error into [`SyncError::TaskFailed`]
    pub fn write_submit_unchecked<T, E, F>(&self, task: F) -> SyncResult<T>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        self.write_execute(task).map_err(SyncError::task_failed)
    }

    /// Whether either side is currently held
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }
}

impl From<Arc<RwLock<()>>> for ReadWriteSynchronizedExecutor {
    fn from(lock: Arc<RwLock<()>>) -> Self {
        Self::with_lock(lock)
    }
}
