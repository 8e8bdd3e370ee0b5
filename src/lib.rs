//! nano-batch: a minimalistic workload-balanced batch scheduler in Rust.
//!
//! For sequence models whose per-sample cost is linear in sample size,
//! this crate builds per-epoch training schedules that balance workload
//! across data-parallel ranks:
//! - Karmarkar–Karp multiway partitioning of samples into micro-batches
//! - Deterministic seeded shuffling of micro-batches between batches
//! - Reshaping the micro-batch stream into per-rank index streams
//!
//! Balanced micro-batches keep synchronous ranks from stalling on
//! stragglers; determinism keeps every rank's view of the schedule
//! identical without communication.

pub mod config;
pub mod error;

pub mod core;
pub mod data;
pub mod partition;
pub mod schedule;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use data::{Dataset, InMemoryDataset};
pub use error::{Error, Result};
pub use scheduler::{LinearScheduler, Scheduler};
pub use self::core::item::{Item, SampleIndex, SampleSize, Schedule};
