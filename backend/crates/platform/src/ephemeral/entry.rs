//! Cache Entry

use std::time::Duration;

use tokio::time::Instant;

/// One payload plus the instant it stops being visible.
///
/// Immutable after construction; the deadline is never extended.
#[derive(Debug)]
pub struct CacheEntry<T> {
    payload: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(payload: T, ttl: Duration, now: Instant) -> Self {
        Self {
            payload,
            expires_at: now + ttl,
        }
    }

    /// Visible iff `now < expires_at`.
    pub fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_strictly_before_deadline() {
        let now = Instant::now();
        let entry = CacheEntry::new("p", Duration::from_secs(10), now);

        assert!(entry.is_live(now));
        assert!(entry.is_live(now + Duration::from_millis(9_999)));
        assert!(!entry.is_live(now + Duration::from_secs(10)));
        assert_eq!(entry.expires_at(), now + Duration::from_secs(10));
    }
}
