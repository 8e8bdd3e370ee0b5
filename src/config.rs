//! Configuration types for nano-batch.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Scheduler configuration.
///
/// The three batch parameters are tied together by
/// `global_batch_size = data_parallel_size * micro_batch_size * accumulation_steps`,
/// so `global_batch_size` must be divisible by `data_parallel_size`, and the
/// per-rank share must in turn be divisible by `micro_batch_size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of data-parallel workers.
    pub data_parallel_size: u64,
    /// Total number of samples consumed per optimizer step, across all workers.
    pub global_batch_size: u64,
    /// Samples processed per worker per gradient-accumulation sub-step.
    pub micro_batch_size: u64,
    /// Base seed; combined with the epoch number to derive per-epoch streams.
    pub seed: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            data_parallel_size: 1,
            global_batch_size: 1,
            micro_batch_size: 1,
            seed: 0,
        }
    }
}

impl SchedulerConfig {
    /// Gradient-accumulation sub-steps per optimizer step on each rank.
    pub fn accumulation_steps(&self) -> u64 {
        self.global_batch_size / self.data_parallel_size / self.micro_batch_size
    }

    /// Micro-batches that make up one global batch across all ranks.
    pub fn micro_batches_per_global_batch(&self) -> u64 {
        self.global_batch_size / self.micro_batch_size
    }

    /// Check this configuration against a dataset of `num_samples` samples.
    ///
    /// All violations are contract breaches with no recovery path, so
    /// construction is the only place this runs.
    pub fn validate(&self, num_samples: u64) -> Result<()> {
        if self.data_parallel_size == 0 {
            return Err(Error::Config("data_parallel_size must be positive".into()));
        }
        if self.global_batch_size == 0 {
            return Err(Error::Config("global_batch_size must be positive".into()));
        }
        if self.micro_batch_size == 0 {
            return Err(Error::Config("micro_batch_size must be positive".into()));
        }
        if self.global_batch_size % self.data_parallel_size != 0 {
            return Err(Error::Config(format!(
                "global_batch_size {} is not divisible by data_parallel_size {}",
                self.global_batch_size, self.data_parallel_size
            )));
        }
        if self.global_batch_size / self.data_parallel_size % self.micro_batch_size != 0 {
            return Err(Error::Config(format!(
                "per-rank batch {} is not divisible by micro_batch_size {}",
                self.global_batch_size / self.data_parallel_size,
                self.micro_batch_size
            )));
        }
        if num_samples == 0 {
            return Err(Error::Config("dataset must not be empty".into()));
        }
        if num_samples % self.data_parallel_size != 0 {
            return Err(Error::Config(format!(
                "{} samples cannot be split evenly across {} ranks",
                num_samples, self.data_parallel_size
            )));
        }
        Ok(())
    }
}
