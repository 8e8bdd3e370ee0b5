//! Overflow-safe numeric coercion for partition weights.

use crate::core::item::SampleSize;

/// Convert an unsigned sample size into the signed accumulator used by the
/// partitioner, saturating at `i64::MAX` instead of wrapping.
///
/// Saturation trades a little balancing accuracy for a valid result; it is
/// not an error.
///
/// # Example
///
/// ```
/// use nano_batch::core::cast::overflow_safe_cast;
///
/// assert_eq!(overflow_safe_cast(42), 42);
/// assert_eq!(overflow_safe_cast(u64::MAX), i64::MAX);
/// ```
pub fn overflow_safe_cast(size: SampleSize) -> i64 {
    i64::try_from(size).unwrap_or(i64::MAX)
}
