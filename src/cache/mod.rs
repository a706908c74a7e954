//! Cache Module
//!
//! Provides a concurrent key/value store with TTL expiration and a
//! background sweeper.

mod entry;
mod stats;
mod store;
mod sweeper;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::{CasResult, TtlCache};
