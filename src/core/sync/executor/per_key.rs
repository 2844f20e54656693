/*!
 * Per-Key Executors
 *
 * Serialize tasks that share a key while letting tasks on different keys
 * run in parallel. Each call leases the key's executor from a sharded
 * registry, runs the task through it, and releases the key on every exit
 * path.
 *
 * # Per-key lifecycle
 *
 * absent -> active(1) -> active(N) -> ... -> active(1) -> absent
 *
 * The first caller creates the key's executor, later callers share it, and
 * the last one out drops it.
 */

use super::read_write::ReadWriteSynchronizedExecutor;
use super::synchronized::SynchronizedExecutor;
use super::traits::Executor;
use crate::core::errors::{BoxError, SyncResult};
use crate::core::sync::config::RegistryConfig;
use crate::core::sync::registry::ShardedKeyedRegistry;
use ahash::RandomState;
use std::hash::{BuildHasher, Hash};

/// Runs tasks so that no two tasks with equal keys overlap
///
/// # Example
///
/// ```
/// use keyed_sync::PerKeyExecutor;
///
/// let executor = PerKeyExecutor::new();
///
/// let total = executor.execute(&"account:7", || 40 + 2);
/// assert_eq!(total, 42);
/// assert_eq!(executor.active_keys(), 0);
/// ```
pub struct PerKeyExecutor<K, E = SynchronizedExecutor, S = RandomState> {
    registry: ShardedKeyedRegistry<K, E, S>,
}

impl<K> PerKeyExecutor<K>
where
    K: Hash + Eq + Clone,
{
    /// Executor over a default 32-shard registry
    pub fn new() -> Self {
        Self {
            registry: ShardedKeyedRegistry::new(SynchronizedExecutor::new),
        }
    }

    /// Executor over a registry built from `config`
    pub fn with_config(config: RegistryConfig) -> SyncResult<Self> {
        Ok(Self {
            registry: ShardedKeyedRegistry::with_config(config, SynchronizedExecutor::new)?,
        })
    }
}

impl<K> Default for PerKeyExecutor<K>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E, S> PerKeyExecutor<K, E, S>
where
    K: Hash + Eq + Clone,
    E: Executor,
    S: BuildHasher + Clone,
{
    /// Executor over a caller-built registry of per-key executors
    pub fn with_registry(registry: ShardedKeyedRegistry<K, E, S>) -> Self {
        Self { registry }
    }

    /// Run `task` exclusively with respect to every other task on `key`
    ///
    /// Blocks while another task holds `key`. The task's return value,
    /// including a returned `Result`, comes back unchanged; a panic
    /// propagates after the key is released.
    pub fn execute<T, F>(&self, key: &K, task: F) -> T
    where
        F: FnOnce() -> T,
    {
        let lease = self.registry.lease(key);
        lease.execute(task)
    }

    /// [`execute`](Self::execute) for a fallible task, folding its error
    /// into [`SyncError::TaskFailed`](crate::SyncError::TaskFailed)
    pub fn submit_unchecked<T, TaskError, F>(&self, key: &K, task: F) -> SyncResult<T>
    where
        F: FnOnce() -> Result<T, TaskError>,
        TaskError: Into<BoxError>,
    {
        let lease = self.registry.lease(key);
        lease.submit_unchecked(task)
    }

    /// Number of keys with a task running or waiting
    pub fn active_keys(&self) -> usize {
        self.registry.len()
    }

    /// The backing registry
    pub fn registry(&self) -> &ShardedKeyedRegistry<K, E, S> {
        &self.registry
    }
}

/// Runs tasks under per-key read/write exclusion
///
/// Reads on one key run together; a write on a key excludes every other
/// read and write on that key. Different keys never wait on each other.
pub struct PerKeyReadWriteExecutor<K, S = RandomState> {
    registry: ShardedKeyedRegistry<K, ReadWriteSynchronizedExecutor, S>,
}

impl<K> PerKeyReadWriteExecutor<K>
where
    K: Hash + Eq + Clone,
{
    /// Executor over a default 32-shard registry
    pub fn new() -> Self {
        Self {
            registry: ShardedKeyedRegistry::new(ReadWriteSynchronizedExecutor::new),
        }
    }

    /// Executor over a registry built from `config`
    pub fn with_config(config: RegistryConfig) -> SyncResult<Self> {
        Ok(Self {
            registry: ShardedKeyedRegistry::with_config(config, ReadWriteSynchronizedExecutor::new)?,
        })
    }
}

impl<K> Default for PerKeyReadWriteExecutor<K>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> PerKeyReadWriteExecutor<K, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    /// Executor over a caller-built registry
    pub fn with_registry(registry: ShardedKeyedRegistry<K, ReadWriteSynchronizedExecutor, S>) -> Self {
        Self { registry }
    }

    /// Run `task` holding the shared side of `key`
    pub fn read_execute<T, F>(&self, key: &K, task: F) -> T
    where
        F: FnOnce() -> T,
    {
        let lease = self.registry.lease(key);
        lease.read_execute(task)
    }

    /// Run `task` holding the exclusive side of `key`
    pub fn write_execute<T, F>(&self, key: &K, task: F) -> T
    where
        F: FnOnce() -> T,
    {
        let lease = self.registry.lease(key);
        lease.write_execute(task)
    }

    /// [`read_execute`](Self::read_execute) with error folding
    pub fn read_submit_unchecked<T, TaskError, F>(&self, key: &K, task: F) -> SyncResult<T>
    where
        F: FnOnce() -> Result<T, TaskError>,
        TaskError: Into<BoxError>,
    {
        let lease = self.registry.lease(key);
        lease.read_submit_unchecked(task)
    }

    /// [`write_execute`](Self::write_execute) with error folding
    pub fn write_submit_unchecked<T, TaskError, F>(&self, key: &K, task: F) -> SyncResult<T>
    where
        F: FnOnce() -> Result<T, TaskError>,
        TaskError: Into<BoxError>,
    {
        let lease = self.registry.lease(key);
        lease.write_submit_unchecked(task)
    }

    /// Number of keys with a task running or waiting
    pub fn active_keys(&self) -> usize {
        self.registry.len()
    }

    /// The backing registry
    pub fn registry(&self) -> &ShardedKeyedRegistry<K, ReadWriteSynchronizedExecutor, S> {
        &self.registry
    }
}
