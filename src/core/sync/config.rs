/*!
 * Registry Configuration
 *
 * Construction-time settings for sharded keyed registries
 */

use super::management::{ShardManager, WorkloadProfile};
use crate::core::errors::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};

/// Shard count used when nothing else is specified
pub const DEFAULT_SHARD_COUNT: usize = 32;

/// Sharded registry configuration
///
/// The shard count is fixed for the life of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Number of independent partitions keys are spread across
    pub shard_count: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
        }
    }
}

impl RegistryConfig {
    /// Configuration with an explicit shard count
    pub const fn with_shard_count(shard_count: usize) -> Self {
        Self { shard_count }
    }

    /// Configuration sized for the host CPU count and expected contention
    pub fn for_profile(profile: WorkloadProfile) -> Self {
        Self {
            shard_count: ShardManager::shards(profile),
        }
    }

    /// Single shard: every key shares one bookkeeping map
    pub const fn unsharded() -> Self {
        Self { shard_count: 1 }
    }

    /// Reject configurations a registry cannot be built from
    pub fn validate(&self) -> SyncResult<()> {
        if self.shard_count == 0 {
            return Err(SyncError::InvalidConfiguration(
                "shard_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_32_shards() {
        let config = RegistryConfig::default();
        assert_eq!(config.shard_count, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_shards_rejected() {
        let err = RegistryConfig::with_shard_count(0).validate().unwrap_err();
        assert!(matches!(err, SyncError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_profile_config_is_valid() {
        let config = RegistryConfig::for_profile(WorkloadProfile::MediumContention);
        assert!(config.validate().is_ok());
        assert!(config.shard_count.is_power_of_two());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: RegistryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RegistryConfig::default());

        let config: RegistryConfig = serde_json::from_str(r#"{"shard_count": 4}"#).unwrap();
        assert_eq!(config.shard_count, 4);
    }
}
