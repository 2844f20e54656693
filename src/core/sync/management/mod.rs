/*!
 * Shard Management
 *
 * CPU-topology-aware shard counts for keyed registries.
 */

mod shard_manager;

pub use shard_manager::{ShardManager, WorkloadProfile, MAX_PROFILE_SHARDS, MIN_PROFILE_SHARDS};
