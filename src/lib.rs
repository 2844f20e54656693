/*!
 * Keyed Sync
 *
 * Low-level synchronization primitives for concurrent services:
 * - Per-key resource registries with reference-counted reclamation
 * - Sharded registries routed by an avalanche hash spreader
 * - Per-key mutex and read/write executors
 * - A multi-producer buffer with atomic batch draining
 *
 * All coordination is in-process.
 */

pub mod core;

// Re-exports
pub use crate::core::errors::{BoxError, SyncError, SyncResult};
pub use crate::core::sync::{
    ConcurrentDrainableBuffer, Executor, HashSpreader, KeyedResourceRegistry, PerKeyExecutor,
    PerKeyReadWriteExecutor, ReadWriteSynchronizedExecutor, RegistryConfig, ResourceLease,
    ShardManager, ShardedKeyedRegistry, SynchronizedExecutor, WorkloadProfile,
};
pub use crate::core::tracer::init_tracing;
