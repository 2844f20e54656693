/*!
 * Concurrent Drainable Buffer
 *
 * Unbounded FIFO where any number of producers append without blocking and
 * consumers remove whole batches atomically with respect to each other.
 */

use crate::core::errors::{SyncError, SyncResult};
use crossbeam_queue::SegQueue;
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Multi-producer, multi-consumer buffer with batch draining
///
/// # Guarantees
///
/// - `add`/`add_all` are lock-free and never suspend; `add_all` is not
///   atomic, so its elements may interleave with other producers
/// - Drains are mutually exclusive: a drain waits for the one in progress
/// - Each drain returns elements in insertion order and removes exactly the
///   elements it returns
/// - An element whose `add` returned before a drain started is returned by
///   that drain or a later one; never lost, never returned twice
/// - Elements added while a drain runs may or may not be part of it
///
/// # Example
///
/// ```
/// use keyed_sync::ConcurrentDrainableBuffer;
///
/// let buffer = ConcurrentDrainableBuffer::new();
/// buffer.add(1);
/// buffer.add(2);
/// buffer.add(3);
///
/// assert_eq!(buffer.drain_up_to(2).unwrap(), vec![1, 2]);
/// assert_eq!(buffer.drain_all(), vec![3]);
/// assert!(buffer.is_empty());
/// ```
pub struct ConcurrentDrainableBuffer<T> {
    queue: SegQueue<T>,
    drain_lock: Mutex<()>,
}

impl<T> ConcurrentDrainableBuffer<T> {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            queue: SegQueue::new(),
            drain_lock: Mutex::new(()),
        }
    }

    /// Append one element (lock-free)
    #[inline]
    pub fn add(&self, element: T) {
        self.queue.push(element);
    }

    /// Append elements one by one (lock-free, not atomic as a group)
    pub fn add_all<I>(&self, elements: I)
    where
        I: IntoIterator<Item = T>,
    {
        for element in elements {
            self.queue.push(element);
        }
    }

    /// Remove and return everything present when the drain started
    pub fn drain_all(&self) -> Vec<T> {
        let _guard = self.drain_lock.lock();
        // Only drains pop, and we hold the drain lock, so everything counted
        // here stays poppable until we take it
        let present = self.queue.len();
        self.pop_batch(present)
    }

    /// Remove and return at most `max` of the oldest elements
    ///
    /// Anything beyond `max` stays for a later drain.
    pub fn drain(&self, max: usize) -> Vec<T> {
        if max == 0 {
            return Vec::new();
        }
        let _guard = self.drain_lock.lock();
        let take = self.queue.len().min(max);
        self.pop_batch(take)
    }

    /// [`drain`](Self::drain) with a signed bound
    ///
    /// # Errors
    ///
    /// [`SyncError::NegativeBatchSize`] if `max` is negative. The buffer is
    /// left untouched.
    pub fn drain_up_to(&self, max: isize) -> SyncResult<Vec<T>> {
        let max = usize::try_from(max).map_err(|_| {
            warn!(max, "negative batch size passed to drain_up_to");
            SyncError::NegativeBatchSize(max)
        })?;
        Ok(self.drain(max))
    }

    /// Approximate number of buffered elements
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the buffer currently looks empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pop up to `count` elements; caller holds the drain lock
    fn pop_batch(&self, count: usize) -> Vec<T> {
        let mut batch = Vec::with_capacity(count);
        while batch.len() < count {
            match self.queue.pop() {
                Some(element) => batch.push(element),
                None => break,
            }
        }
        if !batch.is_empty() {
            debug!(drained = batch.len(), "buffer batch drained");
        }
        batch
    }
}

impl<T> Default for ConcurrentDrainableBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ConcurrentDrainableBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentDrainableBuffer")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_buffer_one_element() {
        let buffer = ConcurrentDrainableBuffer::new();
        buffer.add(1);
        assert_eq!(buffer.drain_all(), vec![1]);
        assert_eq!(buffer.drain_all(), Vec::<i32>::new());
    }

    #[test]
    fn test_buffer_keeps_working_after_reset() {
        let buffer = ConcurrentDrainableBuffer::new();
        buffer.add(1);
        assert_eq!(buffer.drain_all(), vec![1]);
        assert!(buffer.drain_all().is_empty());

        buffer.add_all(vec![3, 2, 1]);
        buffer.add(0);
        assert_eq!(buffer.drain_all(), vec![3, 2, 1, 0]);
        assert!(buffer.drain_all().is_empty());
    }

    #[test]
    fn test_partial_drains() {
        let buffer = ConcurrentDrainableBuffer::new();
        buffer.add_all(1..=4);

        assert_eq!(buffer.drain_up_to(2).unwrap(), vec![1, 2]);
        buffer.add(5);
        assert_eq!(buffer.drain_up_to(0).unwrap(), Vec::<i32>::new());
        assert_eq!(buffer.drain_up_to(1).unwrap(), vec![3]);
        assert_eq!(buffer.drain_all(), vec![4, 5]);
    }

    #[test]
    fn test_drain_more_than_present() {
        let buffer = ConcurrentDrainableBuffer::new();
        buffer.add_all(["a", "b"]);
        assert_eq!(buffer.drain(10), vec!["a", "b"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_negative_batch_rejected() {
        let buffer = ConcurrentDrainableBuffer::new();
        buffer.add(1);

        let err = buffer.drain_up_to(-1).unwrap_err();
        assert!(matches!(err, SyncError::NegativeBatchSize(-1)));
        assert!(err.is_contract_violation());

        // Untouched
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.drain_all(), vec![1]);
    }
}
