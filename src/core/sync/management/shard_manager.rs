/*!
 * Shard Count Selection
 *
 * Derives registry shard counts from the host CPU count so that a keyed
 * registry scales from small devices (1-4 cores) to large servers without
 * hand-tuned constants.
 *
 * Everything here is a pure function of the hardware; no state is cached
 * beyond what the standard library already caches for
 * `available_parallelism`.
 */

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Smallest shard count a profile will produce
pub const MIN_PROFILE_SHARDS: usize = 8;

/// Largest shard count a profile will produce
pub const MAX_PROFILE_SHARDS: usize = 512;

/// Hardware-aware shard count calculator
pub struct ShardManager;

impl ShardManager {
    /// Number of CPUs available to this process, 8 if undetectable
    #[inline]
    pub fn cpu_count() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to detect CPU count, defaulting to 8");
                8
            })
    }

    /// Shard count for a registry under the given key workload
    #[inline]
    pub fn shards(profile: WorkloadProfile) -> usize {
        Self::shards_with_multiplier(profile.multiplier())
    }

    /// Shard count as `cpu_count * multiplier`, rounded up to a power of two
    /// and clamped to [`MIN_PROFILE_SHARDS`, `MAX_PROFILE_SHARDS`]
    #[inline]
    pub fn shards_with_multiplier(multiplier: usize) -> usize {
        Self::cpu_count()
            .saturating_mul(multiplier.max(1))
            .next_power_of_two()
            .clamp(MIN_PROFILE_SHARDS, MAX_PROFILE_SHARDS)
    }
}

/// How many threads are expected to hit the registry at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadProfile {
    /// Many threads acquiring many distinct keys (4x CPU shards)
    HighContention,

    /// Moderate fan-in on a handful of hot keys (2x CPU shards)
    MediumContention,

    /// Occasional acquisitions (1x CPU shards)
    LowContention,
}

impl WorkloadProfile {
    #[inline]
    const fn multiplier(self) -> usize {
        match self {
            WorkloadProfile::HighContention => 4,
            WorkloadProfile::MediumContention => 2,
            WorkloadProfile::LowContention => 1,
        }
    }
}
