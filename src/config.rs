//! Configuration Module
//!
//! Handles loading store configuration from environment variables and
//! validating the TTL cache parameters.

use std::env;
use std::time::Duration;

use crate::error::{Result, StoreError};

/// Capacity used when a list is created with a capacity of zero.
pub const DEFAULT_LIST_CAPACITY: usize = 1000;

/// Default TTL in seconds for cache entries.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 120;

/// Default interval between expiration sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Longest TTL or sweep interval a cache honours (~100 years).
///
/// Longer durations are capped so adding them to an `Instant` cannot overflow.
pub const MAX_DURATION: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Store configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of items the bounded list can hold
    pub list_capacity: usize,
    /// TTL in seconds applied to every cache `put`
    pub cache_ttl_secs: u64,
    /// Background sweep interval in milliseconds
    pub sweep_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LIST_CAPACITY` - Bounded list capacity (default: 1000, 0 = default)
    /// - `CACHE_TTL_SECS` - Cache entry TTL in seconds (default: 120)
    /// - `SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        Self {
            list_capacity: env::var("LIST_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LIST_CAPACITY),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_TTL_SECS),
            sweep_interval_ms: env::var("SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SWEEP_INTERVAL.as_millis() as u64),
        }
    }

    /// Builds the TTL cache parameters from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new(Duration::from_secs(self.cache_ttl_secs))
            .with_sweep_interval(Duration::from_millis(self.sweep_interval_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            list_capacity: DEFAULT_LIST_CAPACITY,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL.as_millis() as u64,
        }
    }
}

// == Cache Config ==
/// Parameters for a [`TtlCache`](crate::cache::TtlCache).
///
/// ```rust
/// use bounded_store::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::new(Duration::from_secs(30))
///     .with_sweep_interval(Duration::from_millis(250));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Dwell time applied uniformly to every put
    pub ttl: Duration,
    /// Interval between background sweeps (default: 1 second)
    pub sweep_interval: Duration,
}

impl CacheConfig {
    /// Creates a cache configuration with the default sweep interval.
    ///
    /// Durations above [`MAX_DURATION`] are accepted and capped when the
    /// cache is built.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    /// Sets the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Checks that both durations are non-zero.
    ///
    /// `tokio::time::interval` rejects a zero period, and a zero TTL would
    /// make every entry stale on insertion.
    pub fn validate(&self) -> Result<()> {
        if self.ttl.is_zero() {
            return Err(StoreError::InvalidConfig(
                "ttl must be non-zero".to_string(),
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(StoreError::InvalidConfig(
                "sweep interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns a copy with both durations capped at [`MAX_DURATION`].
    pub fn capped(self) -> Self {
        Self {
            ttl: self.ttl.min(MAX_DURATION),
            sweep_interval: self.sweep_interval.min(MAX_DURATION),
        }
    }
}
