//! Deterministic inter-batch shuffling.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::item::SampleIndex;

/// Shuffle micro-batches as atomic units with a seeded Fisher–Yates pass.
///
/// The PRNG is pinned to `ChaCha8Rng` so a given seed always produces the
/// same permutation, on every platform. Callers derive the seed from
/// `epoch + base_seed`, which is the only source of randomness in the
/// scheduler.
///
/// # Example
///
/// ```
/// use nano_batch::schedule::shuffle;
///
/// let micro_batches = vec![vec![0, 1], vec![2, 3], vec![4, 5]];
/// let a = shuffle(micro_batches.clone(), 7);
/// let b = shuffle(micro_batches, 7);
/// assert_eq!(a, b);
/// ```
pub fn shuffle(mut micro_batches: Vec<Vec<SampleIndex>>, seed: u64) -> Vec<Vec<SampleIndex>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    micro_batches.shuffle(&mut rng);
    micro_batches
}
