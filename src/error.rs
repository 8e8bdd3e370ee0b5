//! Error types for nano-batch.

use thiserror::Error;

/// Result type alias for nano-batch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for nano-batch.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration violates a scheduling precondition.
    #[error("configuration error: {0}")]
    Config(String),

    /// Partitioning was requested with zero target partitions.
    #[error("cannot partition into zero groups")]
    ZeroPartitions,

    /// The dataset ran out of samples mid-epoch.
    #[error("dataset exhausted: requested {requested} samples, {remaining} remaining")]
    DatasetExhausted { requested: usize, remaining: usize },
}
