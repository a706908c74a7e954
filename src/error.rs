//! Error types for the bounded store
//!
//! Provides unified error handling using thiserror. Lookups never fail:
//! a missing key or an empty list is reported as `None`, so these variants
//! only cover construction, configuration and task lifecycle.

use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for the bounded store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The TTL cache needs a Tokio runtime to spawn its sweeper
    #[error("No Tokio runtime available to spawn the sweeper task")]
    NoRuntime,

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The sweeper task did not exit cleanly
    #[error("Sweeper task failed: {0}")]
    Sweeper(String),
}

// == Result Type Alias ==
/// Convenience Result type for the bounded store.
pub type Result<T> = std::result::Result<T, StoreError>;
