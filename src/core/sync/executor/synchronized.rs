/*!
 * Synchronized Executor
 * Mutually exclusive task execution on the caller thread
 */

use super::traits::Executor;
use parking_lot::ReentrantMutex;
use std::sync::Arc;

/// Executes tasks one at a time across threads
///
/// Tasks never overlap between threads, and each call has the memory
/// semantics of locking and unlocking a mutex: everything a task wrote is
/// visible to the next task run through the same executor.
///
/// The lock is reentrant, so a task may call back into the same executor
/// on its own thread without deadlocking.
///
/// Executors built with [`with_lock`](Self::with_lock) over the same lock
/// exclude each other as if they were one executor.
#[derive(Default)]
pub struct SynchronizedExecutor {
    lock: Arc<ReentrantMutex<()>>,
}

impl SynchronizedExecutor {
    /// Create a new executor over its own lock
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executor over a caller-supplied lock
    pub fn with_lock(lock: Arc<ReentrantMutex<()>>) -> Self {
        Self { lock }
    }

    /// The lock tasks run under
    pub fn lock(&self) -> &Arc<ReentrantMutex<()>> {
        &self.lock
    }

    /// Whether some thread is currently running a task
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }
}

impl Executor for SynchronizedExecutor {
    #[inline]
    fn execute<T, F>(&self, task: F) -> T
    where
        F: FnOnce() -> T,
    {
        let _guard = self.lock.lock();
        task()
    }
}

impl From<Arc<ReentrantMutex<()>>> for SynchronizedExecutor {
    fn from(lock: Arc<ReentrantMutex<()>>) -> Self {
        Self::with_lock(lock)
    }
}

impl std::fmt::Debug for SynchronizedExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynchronizedExecutor")
            .field("locked", &self.is_locked())
            .finish()
    }
}
