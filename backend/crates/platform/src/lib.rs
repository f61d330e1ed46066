//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the feature crates:
//! - Cryptographic utilities (HMAC-SHA256, constant-time comparison, Base64, CSPRNG)
//! - An ordered expiry queue and cancelable periodic background tasks
//! - The ephemeral keyed store (generic TTL cache with a background reaper)
//! - Environment-driven configuration helpers

pub mod config;
pub mod crypto;
pub mod ephemeral;
pub mod expiry;
pub mod task;

pub use ephemeral::{CacheMiss, EphemeralStore, EphemeralStoreConfig};
