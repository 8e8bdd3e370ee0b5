//! Karmarkar–Karp multiway number partitioning.
//!
//! The differencing heuristic keeps a priority queue of partial K-way
//! partitions ("tuples") keyed by their **spread**, the gap between their
//! heaviest and lightest slot. Each round pops the two widest tuples and
//! merges them heaviest-slot-to-lightest-slot, so large imbalances cancel
//! against each other early. The last remaining tuple is the answer.
//!
//! Tuples start out holding one item per slot, taken from a
//! weight-descending pass over the input. Merging two such tuples adds the
//! same number of items to every slot, so all K partitions end up with
//! equal cardinality — micro-batches must hold exactly the configured
//! number of samples, not just balanced weight.
//!
//! ## Example
//!
//! ```
//! use nano_batch::core::{overflow_safe_cast, Item};
//! use nano_batch::partition::karmarkar_karp;
//!
//! let items = vec![
//!     Item::new(0, 10),
//!     Item::new(1, 1),
//!     Item::new(2, 10),
//!     Item::new(3, 1),
//! ];
//! let groups = karmarkar_karp(&items, 2, overflow_safe_cast).unwrap();
//!
//! // Each group pairs one heavy sample with one light one.
//! assert_eq!(groups.len(), 2);
//! for group in &groups {
//!     assert_eq!(group.len(), 2);
//! }
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::item::{Item, SampleIndex, SampleSize};
use crate::error::{Error, Result};

/// One partition slot: the accumulated weight and the indices behind it.
#[derive(Debug, Clone)]
struct Slot {
    weight: i64,
    indices: Vec<SampleIndex>,
}

impl Slot {
    fn empty() -> Self {
        Self {
            weight: 0,
            indices: Vec::new(),
        }
    }
}

/// A partial K-way partition in the differencing queue.
#[derive(Debug)]
struct Tuple {
    slots: Vec<Slot>,
}

impl Tuple {
    /// Gap between the heaviest and lightest slot; the priority key.
    fn spread(&self) -> i64 {
        let mut max = i64::MIN;
        let mut min = i64::MAX;
        for slot in &self.slots {
            max = max.max(slot.weight);
            min = min.min(slot.weight);
        }
        max - min
    }

    /// Merge `other` into `self`, pairing heaviest slots with lightest.
    ///
    /// Slots are stably sorted by weight, one tuple descending and the
    /// other ascending, then combined position by position. Weight sums
    /// saturate rather than wrap.
    fn combine(mut self, mut other: Tuple) -> Tuple {
        self.slots.sort_by(|a, b| b.weight.cmp(&a.weight));
        other.slots.sort_by(|a, b| a.weight.cmp(&b.weight));

        for (slot, donor) in self.slots.iter_mut().zip(other.slots) {
            slot.weight = slot.weight.saturating_add(donor.weight);
            slot.indices.extend(donor.indices);
        }
        self
    }
}

/// Queue entry ordered by (spread DESC, insertion order ASC).
struct HeapEntry {
    spread: i64,
    seq: u64,
    tuple: Tuple,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.spread == other.spread && self.seq == other.seq
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Widest spread first, then earliest insertion (lower seq).
        match self.spread.cmp(&other.spread) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            ord => ord,
        }
    }
}

/// Partition `items` into `num_partitions` index groups of near-equal
/// total weight and equal cardinality.
///
/// `cast` turns each sample size into the signed accumulator weight;
/// [`overflow_safe_cast`](crate::core::cast::overflow_safe_cast) is the
/// standard choice. The result covers the input index set exactly once,
/// and is deterministic for equal inputs.
///
/// # Errors
///
/// Returns [`Error::ZeroPartitions`] when `num_partitions` is zero. Empty
/// `items` yield `num_partitions` empty groups.
pub fn karmarkar_karp<F>(
    items: &[Item],
    num_partitions: u64,
    cast: F,
) -> Result<Vec<Vec<SampleIndex>>>
where
    F: Fn(SampleSize) -> i64,
{
    if num_partitions == 0 {
        return Err(Error::ZeroPartitions);
    }
    let k = num_partitions as usize;
    if items.is_empty() {
        return Ok(vec![Vec::new(); k]);
    }

    let mut weighted: Vec<(i64, SampleIndex)> =
        items.iter().map(|item| (cast(item.size), item.index)).collect();
    // Stable, so equally sized samples keep their dataset order.
    weighted.sort_by(|a, b| b.0.cmp(&a.0));

    let mut queue = BinaryHeap::with_capacity(weighted.len() / k + 1);
    let mut seq = 0u64;
    for chunk in weighted.chunks(k) {
        let mut slots: Vec<Slot> = chunk
            .iter()
            .map(|&(weight, index)| Slot {
                weight,
                indices: vec![index],
            })
            .collect();
        slots.resize_with(k, Slot::empty);

        let tuple = Tuple { slots };
        queue.push(HeapEntry {
            spread: tuple.spread(),
            seq,
            tuple,
        });
        seq += 1;
    }

    loop {
        let Some(first) = queue.pop() else {
            return Ok(vec![Vec::new(); k]);
        };
        let Some(second) = queue.pop() else {
            return Ok(first
                .tuple
                .slots
                .into_iter()
                .map(|slot| slot.indices)
                .collect());
        };

        let tuple = first.tuple.combine(second.tuple);
        queue.push(HeapEntry {
            spread: tuple.spread(),
            seq,
            tuple,
        });
        seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cast::overflow_safe_cast;

    #[test]
    fn test_zero_partitions_rejected() {
        let items = [Item::new(0, 1)];
        assert!(matches!(
            karmarkar_karp(&items, 0, overflow_safe_cast),
            Err(Error::ZeroPartitions)
        ));
    }

    #[test]
    fn test_empty_items_yield_empty_groups() {
        let groups = karmarkar_karp(&[], 3, overflow_safe_cast).unwrap();
        assert_eq!(groups, vec![Vec::new(), Vec::new(), Vec::new()]);
    }

    #[test]
    fn test_single_partition_collects_everything() {
        let items: Vec<Item> = (0..5).map(|i| Item::new(i, i + 1)).collect();
        let groups = karmarkar_karp(&items, 1, overflow_safe_cast).unwrap();

        assert_eq!(groups.len(), 1);
        let mut indices = groups[0].clone();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_saturating_weights_still_partition() {
        let items = [
            Item::new(0, u64::MAX),
            Item::new(1, u64::MAX),
            Item::new(2, 1),
            Item::new(3, 1),
        ];
        let groups = karmarkar_karp(&items, 2, overflow_safe_cast).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 2);
    }
}
