//! Epoch schedule assembly.
//!
//! This module contains the stages that turn balanced micro-batches into
//! the final per-rank schedule:
//! - Deterministic seeded shuffling of whole micro-batches
//! - Reshaping the micro-batch stream across data-parallel ranks
//! - Concatenating a tail schedule onto a head schedule

pub mod reshape;
pub mod shuffle;

pub use reshape::{concat, reshape};
pub use shuffle::shuffle;
