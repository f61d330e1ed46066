//! Nonce Record

use std::time::Duration;

use kernel::id::UserId;
use tokio::time::Instant;

/// One outstanding challenge value for one user.
#[derive(Debug, Clone)]
pub struct NonceRecord {
    pub user_id: UserId,
    pub value: String,
    pub issued_at: Instant,
}

impl NonceRecord {
    pub fn new(user_id: UserId, value: String, issued_at: Instant) -> Self {
        Self {
            user_id,
            value,
            issued_at,
        }
    }

    pub fn expires_at(&self, ttl: Duration) -> Instant {
        self.issued_at + ttl
    }

    /// Expired once its age reaches `ttl`.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now >= self.expires_at(ttl)
    }
}
