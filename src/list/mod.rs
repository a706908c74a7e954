//! List Module
//!
//! Provides a capacity-bounded, thread-safe double-ended list with
//! predicate-driven search and removal.

mod bounded;
mod chain;
mod stats;


// Re-export public types
pub use bounded::BoundedList;
pub use stats::ListStats;
