//! Cache configuration

use serde::{Deserialize, Serialize};
use prefixsum::{Error, InputPolicy, Result};

/// Default number of resident entries
pub const DEFAULT_CAPACITY: usize = 100;

/// Settings for a [`SumCache`](crate::SumCache)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of resident entries
    pub capacity: usize,

    /// Handling of negative or non-integer queries
    pub policy: InputPolicy,

    /// Seed long forward extensions from the closed form once they would
    /// take more than this many steps
    pub seed_threshold: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            policy: InputPolicy::Lenient,
            seed_threshold: None,
        }
    }
}

impl CacheConfig {
    /// Default config with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Set the input policy
    pub fn policy(mut self, policy: InputPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the closed-form seed threshold
    pub fn seed_threshold(mut self, threshold: Option<u64>) -> Self {
        self.seed_threshold = threshold;
        self
    }

    /// Reject settings under which the cache cannot hold its anchor
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::CapacityMisconfigured(self.capacity));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();

        assert_eq!(config.capacity, 100);
        assert_eq!(config.policy, InputPolicy::Lenient);
        assert_eq!(config.seed_threshold, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_zero_capacity() {
        let config = CacheConfig::with_capacity(0);
        assert_eq!(config.validate(), Err(Error::CapacityMisconfigured(0)));
    }

    #[test]
    fn test_config_builder() {
        let config = CacheConfig::with_capacity(8)
            .policy(InputPolicy::Strict)
            .seed_threshold(Some(1_000));

        assert_eq!(config.capacity, 8);
        assert_eq!(config.policy, InputPolicy::Strict);
        assert_eq!(config.seed_threshold, Some(1_000));
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: CacheConfig =
            serde_json::from_str(r#"{"capacity": 16, "policy": "strict"}"#).unwrap();

        assert_eq!(config.capacity, 16);
        assert_eq!(config.policy, InputPolicy::Strict);
        assert_eq!(config.seed_threshold, None);
    }
}
