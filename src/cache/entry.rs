//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with an absolute
//! expiration time.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::MAX_DURATION;

// == Cache Entry ==
/// A single cache entry with its value and timing metadata.
///
/// Timestamps come from `tokio::time::Instant`, so a paused Tokio clock
/// (`tokio::time::pause`) also freezes entry expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was inserted or last refreshed
    pub created_at: Instant,
    /// When the entry becomes eligible for sweeping
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    ///
    /// A `ttl` too large to add to the clock expires after [`MAX_DURATION`].
    pub fn new(value: V, ttl: Duration) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + MAX_DURATION);
        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Refresh ==
    /// Replaces the value and restarts the expiration clock.
    pub(crate) fn refresh(&mut self, value: V, ttl: Duration) {
        *self = Self::new(value, ttl);
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration
    /// time, so a full TTL never outlives its duration.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a fixed instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the time left before expiry, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
