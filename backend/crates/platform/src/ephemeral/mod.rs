//! Ephemeral Keyed Store
//!
//! Generic TTL store: payloads live under a random opaque key for a fixed
//! lifetime and are removed either by an evicting read or by a background
//! reaper, whichever comes first.
//!
//! ## Structure
//! - Payload map: `DashMap<CacheKey, CacheEntry<T>>`, sharded, so unrelated
//!   keys never contend.
//! - Expiry queue: one [`ExpiryQueue`](crate::expiry::ExpiryQueue) per store,
//!   used by the reaper to find due keys without scanning the map.
//!
//! Removal always goes through `DashMap::remove_if`, so an evicting read and a
//! reaper pass racing on the same key cannot both observe success.

mod entry;
mod store;

use std::time::Duration;

use kernel::error::app_error::{AppError, AppResult};
use thiserror::Error;

pub use entry::CacheEntry;
pub use store::EphemeralStore;

/// The key is absent, expired, already evicted, or the store was shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cache miss: entry is absent or expired")]
pub struct CacheMiss;

/// Lifetime and reaper period for one store instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EphemeralStoreConfig {
    pub ttl: Duration,
    pub reap_interval: Duration,
}

impl Default for EphemeralStoreConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            reap_interval: Duration::from_millis(100),
        }
    }
}

impl EphemeralStoreConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.ttl.is_zero() {
            return Err(AppError::internal("Ephemeral store TTL must be positive"));
        }
        if self.reap_interval.is_zero() {
            return Err(AppError::internal(
                "Ephemeral store reap interval must be positive",
            ));
        }
        Ok(())
    }
}
