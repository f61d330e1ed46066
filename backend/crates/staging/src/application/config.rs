//! Staging Configuration

use std::time::Duration;

use kernel::error::app_error::AppResult;
use platform::EphemeralStoreConfig;
use platform::config::{env_millis, env_secs};

/// Upload staging configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagingConfig {
    /// How long a staged batch waits for its commit
    pub cache_ttl: Duration,
    /// Period of the staging store reaper
    pub reap_interval: Duration,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(10 * 60),
            reap_interval: Duration::from_millis(100),
        }
    }
}

impl StagingConfig {
    /// Load from `STAGING_*` environment variables.
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        let config = Self {
            cache_ttl: env_secs("STAGING_CACHE_TTL_SECONDS", defaults.cache_ttl.as_secs())?,
            reap_interval: env_millis(
                "STAGING_REAP_INTERVAL_MS",
                defaults.reap_interval.as_millis() as u64,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.store_config().validate()
    }

    pub fn store_config(&self) -> EphemeralStoreConfig {
        EphemeralStoreConfig {
            ttl: self.cache_ttl,
            reap_interval: self.reap_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StagingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.store_config().ttl, Duration::from_secs(600));
        assert_eq!(config.store_config().reap_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = StagingConfig {
            cache_ttl: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
