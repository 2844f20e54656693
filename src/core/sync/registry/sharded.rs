/*!
 * Sharded Keyed Registry
 *
 * Fixed array of independent keyed registries. Keys are routed by
 * [`HashSpreader`], so keys on different shards never touch the same
 * bookkeeping structure.
 */

use super::keyed::{KeyedResourceRegistry, ResourceFactory};
use super::lease::ResourceLease;
use crate::core::errors::SyncResult;
use crate::core::sync::config::RegistryConfig;
use crate::core::sync::hash::HashSpreader;
use ahash::RandomState;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;
use tracing::debug;

/// Lock-striped keyed registry
///
/// # Performance
///
/// - **Contention reduction**: N shards cut bookkeeping contention by ~N
/// - **Default shard count**: 32 (see [`RegistryConfig`])
/// - **Worst case**: two hot keys colliding on one shard share its map,
///   never its resources
///
/// # Example
///
/// ```
/// use keyed_sync::ShardedKeyedRegistry;
/// use parking_lot::Mutex;
///
/// let registry = ShardedKeyedRegistry::new(|| Mutex::new(Vec::new()));
///
/// let lease = registry.lease(&"user:1");
/// lease.lock().push(42);
/// drop(lease);
///
/// assert!(registry.is_empty());
/// ```
pub struct ShardedKeyedRegistry<K, R, S = RandomState> {
    shards: Box<[KeyedResourceRegistry<K, R, S>]>,
    spreader: HashSpreader<S>,
}

impl<K, R> ShardedKeyedRegistry<K, R, RandomState>
where
    K: Hash + Eq + Clone,
{
    /// Registry with the default shard count
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        Self::with_shard_count(RegistryConfig::default().shard_count, factory)
    }

    /// Registry with an explicit shard count
    ///
    /// # Panics
    ///
    /// Panics if `shard_count` is zero.
    pub fn with_shard_count<F>(shard_count: usize, factory: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        assert!(shard_count > 0, "Shard count must be at least 1");
        Self::build(shard_count, Arc::new(factory), RandomState::new())
    }

    /// Registry from a validated configuration
    pub fn with_config<F>(config: RegistryConfig, factory: F) -> SyncResult<Self>
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        Self::with_config_and_hasher(config, RandomState::new(), factory)
    }
}

impl<K, R, S> ShardedKeyedRegistry<K, R, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    /// Registry from a configuration and a caller-chosen hash builder
    pub fn with_config_and_hasher<F>(config: RegistryConfig, hasher: S, factory: F) -> SyncResult<Self>
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        config.validate()?;
        Ok(Self::build(config.shard_count, Arc::new(factory), hasher))
    }

    fn build(shard_count: usize, factory: ResourceFactory<R>, hasher: S) -> Self {
        let shards = (0..shard_count)
            .map(|_| KeyedResourceRegistry::with_factory(Arc::clone(&factory), hasher.clone()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        debug!(shard_count, "sharded keyed registry created");

        Self {
            shards,
            spreader: HashSpreader::with_hasher(hasher),
        }
    }

    /// Shard responsible for `key`
    #[inline]
    fn shard(&self, key: &K) -> &KeyedResourceRegistry<K, R, S> {
        &self.shards[self.shard_of(key)]
    }

    /// Get the resource for `key`, creating it on first demand
    #[inline]
    pub fn acquire(&self, key: &K) -> Arc<R> {
        self.shard(key).acquire(key)
    }

    /// Give up one hold on `key`
    ///
    /// # Errors
    ///
    /// [`SyncError::ReleaseWithoutAcquire`](crate::SyncError::ReleaseWithoutAcquire)
    /// if `key` has no live holder.
    #[inline]
    pub fn release(&self, key: &K) -> SyncResult<()> {
        self.shard(key).release(key)
    }

    /// Acquire `key` for the lifetime of the returned lease
    #[inline]
    pub fn lease(&self, key: &K) -> ResourceLease<'_, K, R, S> {
        self.shard(key).lease(key)
    }

    /// Current number of holders for `key`
    pub fn holders(&self, key: &K) -> usize {
        self.shard(key).holders(key)
    }

    /// Index of the shard `key` routes to
    #[inline]
    pub fn shard_of(&self, key: &K) -> usize {
        self.spreader.shard_index(key, self.shards.len())
    }

    /// Number of shards (fixed at construction)
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Live keys per shard
    pub fn shard_lens(&self) -> Vec<usize> {
        self.shards.iter().map(KeyedResourceRegistry::len).collect()
    }

    /// Total live keys across all shards
    pub fn len(&self) -> usize {
        self.shards.iter().map(KeyedResourceRegistry::len).sum()
    }

    /// True when no key is held on any shard
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(KeyedResourceRegistry::is_empty)
    }
}
