//! Sample-metadata access for the scheduler.
//!
//! This module contains:
//! - The `Dataset` trait the scheduler drives each epoch
//! - `InMemoryDataset`, an owned `(index, size)` store with a
//!   deterministic per-epoch sampling order

pub mod dataset;
pub mod memory;

pub use dataset::Dataset;
pub use memory::InMemoryDataset;
