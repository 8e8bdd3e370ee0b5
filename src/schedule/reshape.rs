//! Laying micro-batches out across data-parallel ranks.

use crate::core::item::{SampleIndex, Schedule};

/// Arrange a flat stream of micro-batches into per-rank index streams.
///
/// The stream is cut into global batches of `global_batch_size /
/// micro_batch_size` micro-batches. Within each global batch the
/// assignment is block-wise: with `n` micro-batches in the batch, rank `r`
/// takes micro-batches `r * n / P` through `(r + 1) * n / P - 1`, in
/// order. A final short global batch still holds a multiple of `P`
/// micro-batches and is dealt by the same rule, so the tail pass (`P`
/// micro-batches, one per rank) needs no special case.
///
/// # Example
///
/// ```
/// use nano_batch::schedule::reshape;
///
/// let micro_batches = vec![vec![0, 1], vec![2, 3], vec![4, 5], vec![6, 7]];
/// let schedule = reshape(&micro_batches, 2, 4, 2);
/// assert_eq!(schedule, vec![vec![0, 1, 4, 5], vec![2, 3, 6, 7]]);
/// ```
pub fn reshape(
    micro_batches: &[Vec<SampleIndex>],
    data_parallel_size: u64,
    global_batch_size: u64,
    micro_batch_size: u64,
) -> Schedule {
    let ranks = data_parallel_size as usize;
    let per_global_batch = (global_batch_size / micro_batch_size) as usize;

    let mut schedule: Schedule = vec![Vec::new(); ranks];
    for global_batch in micro_batches.chunks(per_global_batch) {
        debug_assert_eq!(
            global_batch.len() % ranks,
            0,
            "global batch of {} micro-batches cannot split across {} ranks",
            global_batch.len(),
            ranks
        );
        let per_rank = global_batch.len() / ranks;
        for (i, micro_batch) in global_batch.iter().enumerate() {
            schedule[i / per_rank].extend_from_slice(micro_batch);
        }
    }
    schedule
}

/// Append a tail schedule to a head schedule, rank by rank.
///
/// Both schedules must have one row per rank.
pub fn concat(schedule: &mut Schedule, tail: Schedule) {
    debug_assert_eq!(schedule.len(), tail.len());
    for (row, extra) in schedule.iter_mut().zip(tail) {
        row.extend(extra);
    }
}
