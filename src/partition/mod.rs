//! Workload-balanced multiway partitioning.
//!
//! This module assigns samples to micro-batches so that every micro-batch
//! carries roughly the same total workload, which is what keeps synchronous
//! data-parallel ranks from waiting on a straggler.

pub mod karmarkar_karp;

pub use karmarkar_karp::karmarkar_karp;
