//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use kernel::error::app_error::{AppError, AppResult};
use platform::config::{env_secs, env_string};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum HS256 key length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Longest token lifetime accepted (one year)
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 3600);

/// Process-wide token signing secret
///
/// Loaded once at startup and handed to the token processor, which derives its
/// signing and verification keys from it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> AppResult<Self> {
        let bytes = bytes.into();
        if bytes.len() < MIN_SECRET_LEN {
            return Err(AppError::internal(format!(
                "Signing secret must be at least {MIN_SECRET_LEN} bytes"
            ))
            .with_action("Set AUTH_JWT_SECRET to a longer random string"));
        }
        Ok(Self(bytes))
    }

    /// Fresh secret for development; tokens do not survive a restart.
    pub fn random() -> Self {
        Self(platform::crypto::random_bytes(MIN_SECRET_LEN))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// How long an issued challenge nonce stays usable
    pub nonce_ttl: Duration,
    /// Period of the abandoned-nonce sweep
    pub nonce_sweep_interval: Duration,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
    /// Period of the revocation denylist pruning
    pub revocation_prune_interval: Duration,
    pub signing_secret: SigningSecret,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            nonce_ttl: Duration::from_secs(60),
            nonce_sweep_interval: Duration::from_secs(60),
            access_token_ttl: Duration::from_secs(15 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            revocation_prune_interval: Duration::from_secs(60),
            signing_secret: SigningSecret::random(),
        }
    }
}

impl AuthConfig {
    /// Load from `AUTH_*` environment variables.
    ///
    /// `AUTH_JWT_SECRET` is mandatory in release builds; debug builds fall back
    /// to a random secret.
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let signing_secret = match env_string("AUTH_JWT_SECRET") {
            Some(secret) => SigningSecret::new(secret.into_bytes())?,
            None if cfg!(debug_assertions) => {
                tracing::warn!("AUTH_JWT_SECRET not set; using a random signing secret");
                SigningSecret::random()
            }
            None => {
                return Err(AppError::internal("AUTH_JWT_SECRET must be set in production")
                    .with_action("Set AUTH_JWT_SECRET in the environment or .env"));
            }
        };

        let config = Self {
            nonce_ttl: env_secs("AUTH_NONCE_EXPIRE_SECONDS", defaults.nonce_ttl.as_secs())?,
            nonce_sweep_interval: env_secs(
                "AUTH_NONCE_SWEEP_SECONDS",
                defaults.nonce_sweep_interval.as_secs(),
            )?,
            access_token_ttl: env_secs(
                "AUTH_ACCESS_TOKEN_EXPIRE_SECONDS",
                defaults.access_token_ttl.as_secs(),
            )?,
            refresh_token_ttl: env_secs(
                "AUTH_REFRESH_TOKEN_EXPIRE_SECONDS",
                defaults.refresh_token_ttl.as_secs(),
            )?,
            revocation_prune_interval: defaults.revocation_prune_interval,
            signing_secret,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        let positive = [
            ("nonce TTL", self.nonce_ttl),
            ("nonce sweep interval", self.nonce_sweep_interval),
            ("access token TTL", self.access_token_ttl),
            ("refresh token TTL", self.refresh_token_ttl),
            ("revocation prune interval", self.revocation_prune_interval),
        ];
        for (name, value) in positive {
            // token expiry has whole-second resolution
            if value < Duration::from_secs(1) {
                return Err(AppError::internal(format!("Auth {name} must be at least 1 second")));
            }
        }
        if self.refresh_token_ttl > MAX_TOKEN_TTL {
            return Err(AppError::internal("Refresh token TTL must not exceed one year"));
        }
        if self.access_token_ttl >= self.refresh_token_ttl {
            return Err(AppError::internal(
                "Access token TTL must be shorter than refresh token TTL",
            ));
        }
        Ok(())
    }
}
