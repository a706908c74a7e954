//! Expiration Sweeper
//!
//! Background task that periodically removes expired cache entries.
//!
//! The task holds only a weak reference to the cache, so it never keeps a
//! cache alive on its own. It exits when the shutdown channel fires, when the
//! channel's sender is dropped, or when the cache is gone at the next tick.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::store::CacheInner;

/// Spawns the sweeper for one cache.
///
/// The first sweep runs one full `interval` after spawning.
///
/// # Returns
/// A JoinHandle for the spawned task, awaited by `TtlCache::close`.
pub(crate) fn spawn_sweeper<V>(
    cache: Weak<CacheInner<V>>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting TTL sweeper"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(inner) = cache.upgrade() else {
                        break;
                    };
                    let removed = inner.sweep();

                    if removed > 0 {
                        info!(removed, "TTL sweep: removed expired entries");
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("TTL sweeper stopped");
    })
}
