//! Epoch schedulers.
//!
//! This module contains:
//! - `LinearScheduler`, the scheduler for linear-cost models
//! - `Scheduler`, the policy selector dispatched by pattern matching

pub mod epoch;

pub use epoch::LinearScheduler;

use crate::config::SchedulerConfig;
use crate::core::item::{SampleSize, Schedule};
use crate::data::dataset::Dataset;
use crate::data::memory::InMemoryDataset;
use crate::error::Result;

/// A scheduling policy, selected once at construction.
///
/// Policies are concrete variants dispatched by `match` rather than trait
/// objects, so the choice costs nothing per call. Today the linear cost
/// model on identical workers is the only policy; non-linear cost models
/// and heterogeneous workers would slot in as further variants.
#[derive(Debug, Clone)]
pub enum Scheduler<D = InMemoryDataset> {
    /// Linear per-sample cost on identical workers.
    Linear(LinearScheduler<D>),
}

impl<D: Dataset> Scheduler<D> {
    /// Produce the schedule for the current epoch.
    pub fn schedule(&mut self) -> Result<Schedule> {
        match self {
            Self::Linear(scheduler) => scheduler.schedule(),
        }
    }

    /// Called at the beginning of a training batch.
    pub fn on_batch_begin(&mut self, batch: u64) {
        match self {
            Self::Linear(scheduler) => scheduler.on_batch_begin(batch),
        }
    }

    /// Called at the end of a training batch.
    pub fn on_batch_end(&mut self, batch: u64, rank: u64, costs: &[f64]) {
        match self {
            Self::Linear(scheduler) => scheduler.on_batch_end(batch, rank, costs),
        }
    }

    /// Called at the beginning of an epoch.
    pub fn on_epoch_begin(&mut self, epoch: u64) {
        match self {
            Self::Linear(scheduler) => scheduler.on_epoch_begin(epoch),
        }
    }

    /// Called at the end of an epoch.
    pub fn on_epoch_end(&mut self, epoch: u64) {
        match self {
            Self::Linear(scheduler) => scheduler.on_epoch_end(epoch),
        }
    }

    /// Called once at the beginning of training.
    pub fn on_train_begin(&mut self) {
        match self {
            Self::Linear(scheduler) => scheduler.on_train_begin(),
        }
    }

    /// Called once at the end of training.
    pub fn on_train_end(&mut self) {
        match self {
            Self::Linear(scheduler) => scheduler.on_train_end(),
        }
    }
}

impl Scheduler<InMemoryDataset> {
    /// Create a linear-policy scheduler over an in-memory dataset.
    pub fn from_sizes(sizes: &[SampleSize], config: SchedulerConfig) -> Result<Self> {
        LinearScheduler::from_sizes(sizes, config).map(Self::Linear)
    }
}

impl<D> From<LinearScheduler<D>> for Scheduler<D> {
    fn from(scheduler: LinearScheduler<D>) -> Self {
        Self::Linear(scheduler)
    }
}
