//! In-memory sample-metadata store.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::item::{Item, SampleSize};
use crate::data::dataset::Dataset;
use crate::error::{Error, Result};

/// Owned `(index, size)` store with a deterministic per-epoch sampling order.
///
/// Each epoch's order is a fresh permutation drawn from
/// `ChaCha8Rng::seed_from_u64(seed + epoch)`, re-derived by
/// `on_epoch_begin`. Construction pre-seeds the epoch-0 order, so `take`
/// is valid before the first explicit `on_epoch_begin`.
///
/// # Example
///
/// ```
/// use nano_batch::data::{Dataset, InMemoryDataset};
///
/// let mut dataset = InMemoryDataset::new(&[3, 1, 4, 1], 0);
/// assert_eq!(dataset.len(), 4);
///
/// let items = dataset.take(4).unwrap();
/// let mut indices: Vec<u64> = items.iter().map(|item| item.index).collect();
/// indices.sort_unstable();
/// assert_eq!(indices, vec![0, 1, 2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    /// Samples in canonical order; position doubles as the index.
    items: Vec<Item>,
    /// This epoch's sampling order (positions into `items`).
    order: Vec<usize>,
    /// Next position in `order` to serve.
    cursor: usize,
    /// Base seed; combined with the epoch for the per-epoch order.
    seed: u64,
}

impl InMemoryDataset {
    /// Create a dataset from sample sizes; sample `i` gets index `i`.
    pub fn new(sizes: &[SampleSize], seed: u64) -> Self {
        let items = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| Item::new(i as u64, size))
            .collect();
        let mut dataset = Self {
            items,
            order: Vec::new(),
            cursor: 0,
            seed,
        };
        dataset.reseed(0);
        dataset
    }

    /// Number of items this epoch has left to serve.
    pub fn remaining(&self) -> usize {
        self.order.len() - self.cursor
    }

    fn reseed(&mut self, epoch: u64) {
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(epoch));
        order.shuffle(&mut rng);
        self.order = order;
        self.cursor = 0;
    }
}

impl Dataset for InMemoryDataset {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn take(&mut self, n: usize) -> Result<Vec<Item>> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(Error::DatasetExhausted {
                requested: n,
                remaining,
            });
        }

        let batch = self.order[self.cursor..self.cursor + n]
            .iter()
            .map(|&position| self.items[position])
            .collect();
        self.cursor += n;
        Ok(batch)
    }

    fn on_epoch_begin(&mut self, epoch: u64) {
        self.reseed(epoch);
    }
}
