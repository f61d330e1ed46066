use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use kernel::error::app_error::AppResult;
use kernel::id::CacheKey;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{CacheEntry, CacheMiss, EphemeralStoreConfig};
use crate::expiry::ExpiryQueue;
use crate::task::spawn_periodic;

/// Queue sizes at or below this never trigger compaction.
const COMPACTION_FLOOR: usize = 1024;

struct Inner<T> {
    name: &'static str,
    config: EphemeralStoreConfig,
    entries: DashMap<CacheKey, CacheEntry<T>>,
    deadlines: ExpiryQueue<CacheKey>,
    closed: AtomicBool,
}

impl<T> Inner<T> {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn purge_expired(&self, now: Instant) -> usize {
        self.deadlines
            .pop_due(now)
            .into_iter()
            .filter(|key| {
                self.entries
                    .remove_if(key, |_, entry| !entry.is_live(now))
                    .is_some()
            })
            .count()
    }

    /// Evicting reads leave their deadline behind in the queue. Drop those once
    /// the queue outgrows the live map by more than a factor of two.
    fn compact_if_bloated(&self) {
        let live = self.entries.len();
        let queued = self.deadlines.len();
        if queued <= COMPACTION_FLOOR.max(live.saturating_mul(2)) {
            return;
        }

        // Lock order: queue first, then map shards. Nothing takes them the other way.
        let dropped = self.deadlines.retain(|key, _| self.entries.contains_key(key));
        tracing::debug!(store = self.name, dropped, live, "Compacted expiry queue");
    }
}

/// Concurrency-safe TTL store, generic over the payload.
///
/// Spawns its reaper on construction, so it must be created inside a tokio
/// runtime. Share it behind an `Arc`; dropping the last handle stops the reaper.
///
/// ```no_run
/// # async fn demo() -> kernel::error::app_error::AppResult<()> {
/// use platform::{EphemeralStore, EphemeralStoreConfig};
///
/// let store = EphemeralStore::new("demo", EphemeralStoreConfig::default())?;
/// let key = store.put("batch-123".to_string());
/// assert_eq!(store.fetch(&key, true).as_deref(), Ok("batch-123"));
/// assert!(store.fetch(&key, false).is_err());
/// # Ok(())
/// # }
/// ```
pub struct EphemeralStore<T> {
    inner: Arc<Inner<T>>,
    reaper: CancellationToken,
}

impl<T> EphemeralStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, config: EphemeralStoreConfig) -> AppResult<Self> {
        config.validate()?;

        let inner = Arc::new(Inner {
            name,
            config,
            entries: DashMap::new(),
            deadlines: ExpiryQueue::new(),
            closed: AtomicBool::new(false),
        });
        let reaper = CancellationToken::new();

        // The task holds only a weak handle; it never keeps the store alive.
        let weak = Arc::downgrade(&inner);
        spawn_periodic(name, config.reap_interval, reaper.clone(), move || {
            let Some(inner) = weak.upgrade() else {
                return ControlFlow::Break(());
            };
            let purged = inner.purge_expired(Instant::now());
            if purged > 0 {
                tracing::debug!(
                    store = inner.name,
                    purged,
                    remaining = inner.entries.len(),
                    "Reaped expired entries"
                );
            }
            ControlFlow::Continue(())
        })?;

        tracing::info!(
            store = name,
            ttl_secs = config.ttl.as_secs(),
            reap_interval_ms = config.reap_interval.as_millis() as u64,
            "Ephemeral store started"
        );

        Ok(Self { inner, reaper })
    }

    /// Store `payload` until `now + ttl` and return its fresh key.
    ///
    /// After [`shutdown`](Self::shutdown) the payload is discarded; the
    /// returned key will only ever miss.
    pub fn put(&self, payload: T) -> CacheKey {
        let key = CacheKey::new();
        let inner = &self.inner;

        if inner.is_closed() {
            tracing::warn!(store = inner.name, "put after shutdown; payload discarded");
            return key;
        }

        let entry = CacheEntry::new(payload, inner.config.ttl, Instant::now());
        let expires_at = entry.expires_at();
        inner.entries.insert(key, entry);
        inner.deadlines.schedule(key, expires_at);

        // shutdown may have cleared the map between the check and the insert
        if inner.is_closed() {
            inner.entries.remove(&key);
        }

        tracing::debug!(store = inner.name, key = %key, "Entry stored");
        key
    }

    /// Read the payload under `key`.
    ///
    /// With `evict`, removal happens in the same atomic step as the read: of
    /// any number of concurrent evicting reads (and reaper passes) on one key,
    /// at most one succeeds.
    pub fn fetch(&self, key: &CacheKey, evict: bool) -> Result<T, CacheMiss> {
        let inner = &self.inner;
        if inner.is_closed() {
            return Err(CacheMiss);
        }
        if !evict {
            return self.with(key, T::clone);
        }

        let now = Instant::now();
        let (_, entry) = inner
            .entries
            .remove_if(key, |_, entry| entry.is_live(now))
            .ok_or(CacheMiss)?;
        tracing::debug!(store = inner.name, key = %key, "Entry evicted on read");

        inner.compact_if_bloated();
        Ok(entry.into_payload())
    }

    /// Run `read` against the live payload under `key` without cloning or
    /// evicting it. The map shard stays read-locked while `read` runs.
    pub fn with<R>(&self, key: &CacheKey, read: impl FnOnce(&T) -> R) -> Result<R, CacheMiss> {
        let inner = &self.inner;
        if inner.is_closed() {
            return Err(CacheMiss);
        }
        let now = Instant::now();

        inner
            .entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| read(entry.payload()))
            .ok_or(CacheMiss)
    }

    /// One reaper pass, run on demand. Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        self.inner.purge_expired(Instant::now())
    }

    /// Entries currently held, including expired ones the reaper has not reached.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Pending deadlines, stale ones included.
    pub fn queued_deadlines(&self) -> usize {
        self.inner.deadlines.len()
    }

    /// Stop the reaper and release every entry. Idempotent.
    ///
    /// Safe while a reaper pass is in flight: the pass only removes entries,
    /// and every read after this call reports [`CacheMiss`].
    pub fn shutdown(&self) {
        let inner = &self.inner;
        if inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.reaper.cancel();

        let released = inner.entries.len();
        inner.entries.clear();
        inner.deadlines.clear();
        tracing::info!(store = inner.name, released, "Ephemeral store shut down");
    }
}

impl<T> Drop for EphemeralStore<T> {
    fn drop(&mut self) {
        self.reaper.cancel();
    }
}
