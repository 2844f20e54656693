/*!
 * Keyed Resource Registry
 *
 * Lazily creates one shared resource per live key and drops it when the
 * last holder releases, so memory tracks the set of keys currently in use
 * rather than every key ever seen.
 *
 * # Algorithm
 *
 * Each map slot holds an immutable `Arc<RegistryEntry>`. Count changes read
 * the current entry, build the adjusted one, and compare-and-replace it by
 * pointer identity; a lost race re-reads and retries. Creation goes through
 * an insert-if-vacant, and a caller that loses the creation race falls back
 * to the increment path, so two callers can never publish two different
 * resources for one key.
 */

use super::entry::RegistryEntry;
use super::lease::ResourceLease;
use crate::core::errors::{SyncError, SyncResult};
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;
use tracing::{trace, warn};

/// Shared, thread-safe resource constructor
///
/// Runs while the registry's internal map slot for the key is locked, so it
/// must not call back into the same registry; doing so can deadlock.
pub type ResourceFactory<R> = Arc<dyn Fn() -> R + Send + Sync>;

/// Concurrent map from key to (holder count, resource)
///
/// `acquire` and `release` must be paired exactly once per use; prefer
/// [`lease`](Self::lease), which pairs them automatically.
///
/// # Example
///
/// ```
/// use keyed_sync::KeyedResourceRegistry;
/// use parking_lot::Mutex;
///
/// let registry = KeyedResourceRegistry::new(|| Mutex::new(0u64));
///
/// let counter = registry.acquire(&"orders");
/// *counter.lock() += 1;
/// registry.release(&"orders").unwrap();
///
/// assert!(registry.is_empty());
/// ```
pub struct KeyedResourceRegistry<K, R, S = RandomState> {
    entries: DashMap<K, Arc<RegistryEntry<R>>, S>,
    factory: ResourceFactory<R>,
}

impl<K, R> KeyedResourceRegistry<K, R, RandomState>
where
    K: Hash + Eq + Clone,
{
    /// Create a registry whose resources are built by `factory`
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        Self::with_factory(Arc::new(factory), RandomState::new())
    }
}

impl<K, R, S> KeyedResourceRegistry<K, R, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    /// Create a registry from a shared factory and a hash builder
    pub fn with_factory(factory: ResourceFactory<R>, hasher: S) -> Self {
        Self {
            entries: DashMap::with_hasher(hasher),
            factory,
        }
    }

    /// Get the resource for `key`, creating it if no one holds the key
    ///
    /// Concurrent callers presenting equal keys receive the identical
    /// instance. The caller must call [`release`](Self::release) exactly once
    /// after it is done with the resource.
    ///
    /// If the factory panics, nothing is recorded for the key and the panic
    /// propagates.
    ///
    /// The factory runs with the internal map shard for `key` write-locked.
    /// A factory that acquires, releases or inspects keys on the same
    /// registry deadlocks.
    pub fn acquire(&self, key: &K) -> Arc<R> {
        loop {
            let current = self.snapshot(key);

            match current {
                Some(current) => {
                    let next = Arc::new(current.acquired());
                    if self.compare_and_replace(key, &current, next) {
                        return Arc::clone(current.resource());
                    }
                }
                None => match self.entries.entry(key.clone()) {
                    Entry::Vacant(slot) => {
                        // Factory runs before anything is published
                        let resource = Arc::new((self.factory)());
                        slot.insert(Arc::new(RegistryEntry::first(Arc::clone(&resource))));
                        trace!("per-key resource created");
                        return resource;
                    }
                    // Lost the creation race; take the increment path
                    Entry::Occupied(_) => {}
                },
            }

            std::hint::spin_loop();
        }
    }

    /// Give up one hold on `key`, dropping the resource on the last release
    ///
    /// # Errors
    ///
    /// [`SyncError::ReleaseWithoutAcquire`] if `key` has no live holder.
    pub fn release(&self, key: &K) -> SyncResult<()> {
        loop {
            let Some(current) = self.snapshot(key) else {
                warn!("release called for a key with no live holder");
                return Err(SyncError::ReleaseWithoutAcquire);
            };

            let replaced = match current.released() {
                Some(next) => self.compare_and_replace(key, &current, Arc::new(next)),
                None => {
                    let removed = self
                        .entries
                        .remove_if(key, |_, entry| Arc::ptr_eq(entry, &current))
                        .is_some();
                    if removed {
                        trace!("per-key resource reclaimed");
                    }
                    removed
                }
            };

            if replaced {
                return Ok(());
            }

            std::hint::spin_loop();
        }
    }

    /// Acquire `key` and release it automatically when the lease drops
    pub fn lease(&self, key: &K) -> ResourceLease<'_, K, R, S> {
        let resource = self.acquire(key);
        ResourceLease::new(self, key.clone(), resource)
    }

    /// Current number of holders for `key` (0 when absent)
    pub fn holders(&self, key: &K) -> usize {
        self.snapshot(key).map_or(0, |entry| entry.holders())
    }

    /// Whether `key` currently has a live resource
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys with at least one holder
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no key is held
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone the current entry out so no map guard is held afterwards
    #[inline]
    fn snapshot(&self, key: &K) -> Option<Arc<RegistryEntry<R>>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Install `next` only if the slot still holds exactly `expected`
    ///
    /// `expected` is kept alive by the caller, so its address cannot be
    /// reused by another entry while we compare.
    #[inline]
    fn compare_and_replace(
        &self,
        key: &K,
        expected: &Arc<RegistryEntry<R>>,
        next: Arc<RegistryEntry<R>>,
    ) -> bool {
        match self.entries.get_mut(key) {
            Some(mut slot) if Arc::ptr_eq(slot.value(), expected) => {
                *slot.value_mut() = next;
                true
            }
            _ => false,
        }
    }
}
