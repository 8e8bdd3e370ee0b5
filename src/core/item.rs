//! Sample identity and workload types.

/// Unique identifier for a sample, dense in `0..N`.
pub type SampleIndex = u64;

/// Workload weight of a sample (token count or an analogous metric).
///
/// Sizes are strictly positive; the scheduler balances their per-rank sums.
pub type SampleSize = u64;

/// A sample in transit between the dataset and the partitioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    /// Identifier handed back to the training loop.
    pub index: SampleIndex,
    /// Workload weight used for balancing.
    pub size: SampleSize,
}

impl Item {
    /// Create a new item.
    pub fn new(index: SampleIndex, size: SampleSize) -> Self {
        Self { index, size }
    }
}

/// Per-epoch scheduler output: one ordered index stream per data-parallel rank.
pub type Schedule = Vec<Vec<SampleIndex>>;
