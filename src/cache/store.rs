//! TTL Cache Store Module
//!
//! Auto-expiring key/value store. Every `put` stamps the entry with an
//! absolute expiration time and a background sweeper removes expired entries
//! on a fixed interval. Reads never expire entries themselves, so a stale
//! entry stays visible for at most one sweep interval.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dashmap::DashMap;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::entry::CacheEntry;
use crate::cache::stats::{CacheStats, StatsCounters};
use crate::cache::sweeper::spawn_sweeper;
use crate::config::CacheConfig;
use crate::error::{Result, StoreError};

// == Compare And Swap Result ==
/// Outcome of [`TtlCache::compare_and_swap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasResult<V> {
    /// The current value matched and was replaced; holds the new value
    Swapped(V),
    /// The current value did not match; holds the value left in place
    Mismatch(V),
    /// No entry exists under the key
    Missing,
}

impl<V> CasResult<V> {
    /// Returns true if the swap happened.
    pub fn is_swapped(&self) -> bool {
        matches!(self, CasResult::Swapped(_))
    }

    /// Returns the value stored under the key after the operation.
    pub fn into_value(self) -> Option<V> {
        match self {
            CasResult::Swapped(value) | CasResult::Mismatch(value) => Some(value),
            CasResult::Missing => None,
        }
    }
}

/// State shared between cache handles and the sweeper.
pub(crate) struct CacheInner<V> {
    data: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    stats: StatsCounters,
    /// Signals the sweeper to stop
    shutdown_tx: watch::Sender<bool>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<V> CacheInner<V> {
    pub(crate) fn new(config: CacheConfig, shutdown_tx: watch::Sender<bool>) -> Self {
        Self {
            data: DashMap::new(),
            ttl: config.ttl,
            stats: StatsCounters::default(),
            shutdown_tx,
            sweeper: Mutex::new(None),
        }
    }

    /// Removes every entry whose expiration time has passed.
    ///
    /// Each shard is checked under its write lock, so a concurrent `put` on
    /// the same key lands either before the check or after the removal.
    pub(crate) fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.data.retain(|_, entry| {
            if entry.is_expired_at(now) {
                removed += 1;
                false
            } else {
                true
            }
        });

        self.stats.record_expired(removed);
        removed
    }

    fn take_sweeper(&self) -> Option<JoinHandle<()>> {
        self.sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl<V> Drop for CacheInner<V> {
    fn drop(&mut self) {
        // Signal the sweeper to stop when the last handle is dropped
        let _ = self.shutdown_tx.send(true);
    }
}

// == TTL Cache ==
/// Thread-safe key/value store whose entries expire a fixed TTL after their
/// last `put`.
///
/// Handles are cheap to clone and share one store. Keys are spread over the
/// shards of a `DashMap`, so operations on unrelated keys rarely contend.
///
/// Each cache owns a sweeper task on the current Tokio runtime. Call
/// [`close`](Self::close) to stop it explicitly; dropping the last handle
/// also stops it.
///
/// ```rust,no_run
/// use bounded_store::TtlCache;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let cache = TtlCache::new(Duration::from_secs(5));
///     cache.put("user:123", "span-handle".to_string());
///     assert!(cache.exist("user:123"));
///     cache.close().await.unwrap();
/// }
/// ```
pub struct TtlCache<V> {
    inner: Arc<CacheInner<V>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.inner.ttl)
            .field("len", &self.inner.data.len())
            .finish()
    }
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache with the given TTL and the default one-second sweep
    /// interval, and starts its sweeper.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime or with a zero TTL. Use
    /// [`try_new`](Self::try_new) to get an error instead.
    pub fn new(ttl: Duration) -> Self {
        match Self::try_new(ttl) {
            Ok(cache) => cache,
            Err(err) => panic!("failed to create TtlCache: {err}"),
        }
    }

    /// Fallible version of [`new`](Self::new).
    pub fn try_new(ttl: Duration) -> Result<Self> {
        Self::try_with_config(CacheConfig::new(ttl))
    }

    /// Creates a cache from a full configuration and starts its sweeper.
    ///
    /// # Errors
    /// - `StoreError::InvalidConfig` if the TTL or sweep interval is zero
    /// - `StoreError::NoRuntime` if no Tokio runtime is running
    pub fn try_with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let config = config.capped();
        if Handle::try_current().is_err() {
            return Err(StoreError::NoRuntime);
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let inner = Arc::new(CacheInner::new(config, shutdown_tx));

        let handle = spawn_sweeper(Arc::downgrade(&inner), config.sweep_interval, shutdown_rx);
        *inner
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);

        debug!(
            ttl_ms = config.ttl.as_millis() as u64,
            sweep_interval_ms = config.sweep_interval.as_millis() as u64,
            "TTL cache created"
        );

        Ok(Self { inner })
    }

    // == Put ==
    /// Stores a value, overwriting any previous entry under the key and
    /// restarting its expiration clock. Returns the stored value.
    pub fn put(&self, key: impl Into<String>, value: V) -> V {
        let entry = CacheEntry::new(value.clone(), self.inner.ttl);
        self.inner.data.insert(key.into(), entry);
        value
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Does not check expiration: an expired entry the sweeper has not yet
    /// removed is still returned. Use [`entry`](Self::entry) to inspect
    /// `expires_at` when staleness matters.
    pub fn get(&self, key: &str) -> Option<V> {
        match self.inner.data.get(key) {
            Some(entry) => {
                self.inner.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.inner.stats.record_miss();
                None
            }
        }
    }

    /// Returns a snapshot of the entry, timestamps included.
    pub fn entry(&self, key: &str) -> Option<CacheEntry<V>> {
        self.inner.data.get(key).map(|entry| entry.value().clone())
    }

    // == Exist ==
    /// Presence check with the same non-expiring semantics as `get`.
    pub fn exist(&self, key: &str) -> bool {
        self.inner.data.contains_key(key)
    }

    // == Delete ==
    /// Removes an entry. Deleting an absent key is a no-op.
    pub fn delete(&self, key: &str) {
        self.inner.data.remove(key);
    }

    /// Removes an entry and returns its value.
    pub fn take(&self, key: &str) -> Option<V> {
        self.inner.data.remove(key).map(|(_, entry)| entry.value)
    }

    // == Size ==
    /// Returns the number of entries held, including expired entries not
    /// yet swept.
    pub fn len(&self) -> usize {
        self.inner.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.data.is_empty()
    }

    /// Returns the TTL applied to every put.
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    // == Sweep ==
    /// Runs one expiration pass immediately and returns the number of
    /// entries removed. The sweeper calls the same routine on every tick.
    pub fn sweep(&self) -> usize {
        self.inner.sweep()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.stats.snapshot(self.inner.data.len())
    }

    // == Close ==
    /// Stops the sweeper and waits for it to exit.
    ///
    /// The cache stays usable afterwards but entries no longer expire on
    /// their own. Closing twice is a no-op.
    ///
    /// # Errors
    /// Returns `StoreError::Sweeper` if the task panicked or was aborted.
    pub async fn close(&self) -> Result<()> {
        let _ = self.inner.shutdown_tx.send(true);

        let Some(handle) = self.inner.take_sweeper() else {
            return Ok(());
        };
        handle
            .await
            .map_err(|err| StoreError::Sweeper(err.to_string()))?;

        debug!("TTL cache sweeper closed");
        Ok(())
    }

    /// Returns true while the sweeper task is running.
    pub fn is_sweeping(&self) -> bool {
        self.inner
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<V> TtlCache<V>
where
    V: Clone + PartialEq + Send + Sync + 'static,
{
    // == Compare And Swap ==
    /// Replaces the value under `key` with `new` only if it currently
    /// equals `old`.
    ///
    /// The comparison and the write happen under the key's shard write lock,
    /// so no `put` or `delete` on the same key can interleave. A successful
    /// swap restarts the expiration clock like `put`. An absent key is never
    /// swapped.
    pub fn compare_and_swap(&self, key: &str, old: &V, new: V) -> CasResult<V> {
        let Some(mut entry) = self.inner.data.get_mut(key) else {
            return CasResult::Missing;
        };

        if entry.value == *old {
            entry.refresh(new.clone(), self.inner.ttl);
            CasResult::Swapped(new)
        } else {
            CasResult::Mismatch(entry.value.clone())
        }
    }
}
