//! Dataset trait: the scheduler's view of the sample-metadata store.

use crate::core::item::Item;
use crate::error::Result;

/// A length-aware sampler over `(index, size)` pairs.
///
/// The scheduler drains one epoch's worth of items through [`take`]
/// between `on_epoch_begin` and `on_epoch_end`. Implementations must
/// guarantee that the union of all `take` calls within an epoch is a
/// permutation of the full index set, in an order that is deterministic
/// given the seed and epoch. The order itself is an implementation choice;
/// it may be length-biased.
///
/// [`take`]: Dataset::take
pub trait Dataset {
    /// Number of samples in the dataset.
    fn len(&self) -> usize;

    /// Whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the next `n` items in this epoch's sampling order.
    ///
    /// Drawing more items than the epoch has left is a contract breach and
    /// fails with [`Error::DatasetExhausted`](crate::Error::DatasetExhausted).
    fn take(&mut self, n: usize) -> Result<Vec<Item>>;

    /// Called at the beginning of a training batch.
    fn on_batch_begin(&mut self, _batch: u64) {}

    /// Called at the end of a training batch.
    fn on_batch_end(&mut self, _batch: u64) {}

    /// Called at the beginning of an epoch.
    ///
    /// Must reset the sampling order and cursor for `epoch` before any
    /// `take` calls for that epoch.
    fn on_epoch_begin(&mut self, _epoch: u64) {}

    /// Called at the end of an epoch.
    fn on_epoch_end(&mut self, _epoch: u64) {}

    /// Called once at the beginning of training.
    fn on_train_begin(&mut self) {}

    /// Called once at the end of training.
    fn on_train_end(&mut self) {}
}
