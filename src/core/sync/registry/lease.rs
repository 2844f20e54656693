/*!
 * Resource Leases
 * RAII pairing of registry acquire/release
 */

use super::keyed::KeyedResourceRegistry;
use ahash::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::ops::Deref;
use std::sync::Arc;
use tracing::error;

/// A held per-key resource, released when dropped
///
/// The release runs on every exit path, including unwinding out of a
/// panicking task.
#[must_use = "the key is released as soon as the lease is dropped"]
pub struct ResourceLease<'a, K, R, S = RandomState>
where
    K: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    registry: &'a KeyedResourceRegistry<K, R, S>,
    key: K,
    resource: Arc<R>,
}

impl<'a, K, R, S> ResourceLease<'a, K, R, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    pub(crate) fn new(registry: &'a KeyedResourceRegistry<K, R, S>, key: K, resource: Arc<R>) -> Self {
        Self {
            registry,
            key,
            resource,
        }
    }

    /// Key this lease holds
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Shared handle to the resource
    pub fn resource(&self) -> &Arc<R> {
        &self.resource
    }
}

impl<K, R, S> Deref for ResourceLease<'_, K, R, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    type Target = R;

    #[inline]
    fn deref(&self) -> &R {
        &self.resource
    }
}

impl<K, R, S> Drop for ResourceLease<'_, K, R, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    fn drop(&mut self) {
        // A lease always holds one count, so this only fails on a broken
        // pairing elsewhere (a stray manual release of the same key)
        if let Err(err) = self.registry.release(&self.key) {
            error!(error = %err, "failed to release leased key");
        }
    }
}

impl<K, R, S> fmt::Debug for ResourceLease<'_, K, R, S>
where
    K: Hash + Eq + Clone + fmt::Debug,
    S: BuildHasher + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLease")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
