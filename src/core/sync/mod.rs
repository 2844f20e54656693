/*!
 * Synchronization Primitives
 *
 * Building blocks for per-key mutual exclusion and batch collection inside
 * one process:
 * - Keyed registries that create, share and reclaim one resource per key
 * - Hash spreading to keep registry shards balanced
 * - Per-key executors (mutex and read/write flavours)
 * - A drainable MPMC buffer
 *
 * # Architecture
 *
 * Registries are plain values: construct one, share it (usually via `Arc`),
 * and hand it to whatever needs it. There is no process-wide instance.
 */

mod buffer;
mod config;
mod executor;
mod hash;
mod management;
mod registry;

pub use buffer::ConcurrentDrainableBuffer;
pub use config::{RegistryConfig, DEFAULT_SHARD_COUNT};
pub use executor::{
    Executor, PerKeyExecutor, PerKeyReadWriteExecutor, ReadWriteSynchronizedExecutor,
    SynchronizedExecutor,
};
pub use hash::{shard_for_hash, spread, HashSpreader};
pub use management::{ShardManager, WorkloadProfile, MAX_PROFILE_SHARDS, MIN_PROFILE_SHARDS};
pub use registry::{KeyedResourceRegistry, ResourceFactory, ResourceLease, ShardedKeyedRegistry};
