//! Nonce Registry
//!
//! One outstanding challenge nonce per user, single use, short-lived.
//!
//! Records live in a `DashMap<UserId, NonceRecord>`; issuing a new challenge
//! overwrites the previous record. Deadlines go into an [`ExpiryQueue`] so the
//! sweep only touches users whose nonce may have aged out. Superseded and
//! consumed records leave their deadline behind; the sweep re-checks the map
//! before removing, and the queue is compacted once stale deadlines dominate.

use std::collections::HashSet;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::UserId;
use platform::expiry::ExpiryQueue;
use platform::task::spawn_periodic;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::entity::nonce::NonceRecord;
use crate::error::{AuthError, AuthResult};

/// Nonce entropy in bytes
const NONCE_BYTES: usize = 32;

/// Queue sizes at or below this never trigger compaction.
const COMPACTION_FLOOR: usize = 1024;

struct Inner {
    ttl: Duration,
    records: DashMap<UserId, NonceRecord>,
    deadlines: ExpiryQueue<UserId>,
}

impl Inner {
    fn sweep(&self, now: Instant) -> usize {
        let ttl = self.ttl;
        self.deadlines
            .pop_due(now)
            .into_iter()
            .filter(|user_id| {
                self.records
                    .remove_if(user_id, |_, record| record.is_expired(ttl, now))
                    .is_some()
            })
            .count()
    }

    /// Keep only the deadline of each user's current record once the queue
    /// outgrows the outstanding nonces by more than a factor of two.
    fn compact_if_bloated(&self) {
        let live = self.records.len();
        let queued = self.deadlines.len();
        if queued <= COMPACTION_FLOOR.max(live.saturating_mul(2)) {
            return;
        }

        // Lock order: queue first, then map shards.
        let ttl = self.ttl;
        let mut kept = HashSet::new();
        let dropped = self.deadlines.retain(|user_id, at| {
            let current = self
                .records
                .get(user_id)
                .is_some_and(|record| record.expires_at(ttl) == at);
            // equal deadlines are possible; one per user is enough
            current && kept.insert(*user_id)
        });
        tracing::debug!(dropped, live, "Compacted nonce deadlines");
    }
}

pub struct NonceRegistry {
    inner: Arc<Inner>,
    sweeper: CancellationToken,
}

impl NonceRegistry {
    /// Create the registry and start its sweep. Requires a tokio runtime.
    pub fn new(ttl: Duration, sweep_interval: Duration) -> AppResult<Self> {
        if ttl.is_zero() {
            return Err(AppError::internal("Nonce TTL must be positive"));
        }

        let inner = Arc::new(Inner {
            ttl,
            records: DashMap::new(),
            deadlines: ExpiryQueue::new(),
        });
        let sweeper = CancellationToken::new();

        let weak = Arc::downgrade(&inner);
        spawn_periodic("nonce-sweeper", sweep_interval, sweeper.clone(), move || {
            let Some(inner) = weak.upgrade() else {
                return ControlFlow::Break(());
            };
            let swept = inner.sweep(Instant::now());
            if swept > 0 {
                tracing::debug!(swept, outstanding = inner.records.len(), "Swept abandoned nonces");
            }
            ControlFlow::Continue(())
        })?;

        Ok(Self { inner, sweeper })
    }

    /// Mint a fresh nonce for `user_id`, replacing any outstanding one.
    pub fn create_nonce(&self, user_id: UserId) -> String {
        let value = platform::crypto::random_token(NONCE_BYTES);
        let record = NonceRecord::new(user_id, value.clone(), Instant::now());
        let expires_at = record.expires_at(self.inner.ttl);

        if self.inner.records.insert(user_id, record).is_some() {
            tracing::debug!(user_id = %user_id, "Superseded outstanding nonce");
        }
        self.inner.deadlines.schedule(user_id, expires_at);
        self.inner.compact_if_bloated();
        value
    }

    /// Consume the outstanding nonce for `user_id`.
    ///
    /// The record is removed before it is inspected, so of several concurrent
    /// callers at most one gets the value. An expired record is removed too.
    pub fn get_nonce(&self, user_id: &UserId) -> AuthResult<String> {
        let (_, record) = self
            .inner
            .records
            .remove(user_id)
            .ok_or(AuthError::InvalidChallenge)?;
        self.inner.compact_if_bloated();

        if record.is_expired(self.inner.ttl, Instant::now()) {
            return Err(AuthError::ChallengeExpired);
        }
        Ok(record.value)
    }

    /// One sweep pass, run on demand. Returns the number of nonces removed.
    pub fn sweep_expired(&self) -> usize {
        self.inner.sweep(Instant::now())
    }

    /// Outstanding nonces, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.inner.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.records.is_empty()
    }

    /// Stop the sweep and drop every outstanding nonce.
    pub fn shutdown(&self) {
        self.sweeper.cancel();
        self.inner.records.clear();
        self.inner.deadlines.clear();
    }
}

impl Drop for NonceRegistry {
    fn drop(&mut self) {
        self.sweeper.cancel();
    }
}
