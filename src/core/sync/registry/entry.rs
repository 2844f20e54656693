/*!
 * Registry Entry
 * Immutable (holder count, resource) snapshot swapped atomically per key
 */

use std::sync::Arc;

/// One key's bookkeeping
///
/// Never mutated in place: every count change builds a new entry around the
/// same resource, and the map slot is compare-and-replaced by pointer
/// identity. `holders` is always at least 1; the entry is removed instead of
/// reaching 0.
#[derive(Debug)]
pub(crate) struct RegistryEntry<R> {
    holders: usize,
    resource: Arc<R>,
}

impl<R> RegistryEntry<R> {
    /// Entry for the first holder of a key
    #[inline]
    pub(crate) fn first(resource: Arc<R>) -> Self {
        Self {
            holders: 1,
            resource,
        }
    }

    #[inline]
    pub(crate) fn holders(&self) -> usize {
        self.holders
    }

    #[inline]
    pub(crate) fn resource(&self) -> &Arc<R> {
        &self.resource
    }

    /// Same resource, one more holder
    #[inline]
    pub(crate) fn acquired(&self) -> Self {
        Self {
            holders: self.holders + 1,
            resource: Arc::clone(&self.resource),
        }
    }

    /// Same resource, one fewer holder; `None` when the last holder leaves
    #[inline]
    pub(crate) fn released(&self) -> Option<Self> {
        (self.holders > 1).then(|| Self {
            holders: self.holders - 1,
            resource: Arc::clone(&self.resource),
        })
    }
}
