//! In-Memory Revocation Denylist
//!
//! Single-process only. Entries are dropped once the revoked token would have
//! expired anyway, so the map never outgrows the set of live refresh tokens.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use kernel::error::app_error::AppResult;
use platform::task::spawn_periodic;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::repository::RevocationStore;

#[derive(Default)]
pub struct InMemoryRevocationStore {
    /// jti -> token expiry (Unix seconds)
    revoked: DashMap<Uuid, i64>,
    pruner: CancellationToken,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start periodic pruning. Requires a tokio runtime.
    pub fn start_pruning(self: &Arc<Self>, period: Duration) -> AppResult<()> {
        let weak = Arc::downgrade(self);
        spawn_periodic("revocation-pruner", period, self.pruner.clone(), move || {
            let Some(store) = weak.upgrade() else {
                return ControlFlow::Break(());
            };
            let pruned = store.prune_expired(Utc::now().timestamp());
            if pruned > 0 {
                tracing::debug!(pruned, remaining = store.len(), "Pruned revocation denylist");
            }
            ControlFlow::Continue(())
        })?;
        Ok(())
    }

    /// Forget revocations whose token has expired by `now`.
    pub fn prune_expired(&self, now: i64) -> usize {
        let before = self.revoked.len();
        self.revoked.retain(|_, expires_at| *expires_at > now);
        before.saturating_sub(self.revoked.len())
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }

    pub fn shutdown(&self) {
        self.pruner.cancel();
        self.revoked.clear();
    }
}

impl RevocationStore for InMemoryRevocationStore {
    fn revoke(&self, jti: Uuid, expires_at: i64) -> bool {
        match self.revoked.entry(jti) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(expires_at);
                true
            }
        }
    }

    fn is_revoked(&self, jti: &Uuid) -> bool {
        self.revoked.contains_key(jti)
    }
}

impl Drop for InMemoryRevocationStore {
    fn drop(&mut self) {
        self.pruner.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_is_first_writer_wins() {
        let store = InMemoryRevocationStore::new();
        let jti = Uuid::new_v4();

        assert!(!store.is_revoked(&jti));
        assert!(store.revoke(jti, 100));
        assert!(!store.revoke(jti, 100));
        assert!(store.is_revoked(&jti));
    }

    #[test]
    fn test_prune_drops_only_expired() {
        let store = InMemoryRevocationStore::new();
        let old = Uuid::new_v4();
        let live = Uuid::new_v4();
        store.revoke(old, 100);
        store.revoke(live, 200);

        assert_eq!(store.prune_expired(150), 1);
        assert!(!store.is_revoked(&old));
        assert!(store.is_revoked(&live));
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_pruning() {
        let store = Arc::new(InMemoryRevocationStore::new());
        store.revoke(Uuid::new_v4(), Utc::now().timestamp() - 1);
        store.start_pruning(Duration::from_secs(1)).unwrap();

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert!(store.is_empty());
        store.shutdown();
    }

    #[tokio::test]
    async fn test_zero_prune_period_rejected() {
        let store = Arc::new(InMemoryRevocationStore::new());
        assert!(store.start_pruning(Duration::ZERO).is_err());
    }
}
