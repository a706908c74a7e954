//! Bounded Store - in-process bounded storage primitives
//!
//! Provides a capacity-limited concurrent list with predicate search and
//! removal, and a TTL cache with background expiration sweeping.

pub mod cache;
pub mod config;
pub mod error;
pub mod list;

pub use cache::{CacheEntry, CacheStats, CasResult, TtlCache};
pub use config::{CacheConfig, Config};
pub use error::{Result, StoreError};
pub use list::{BoundedList, ListStats};
