//! Epoch-granularity scheduling for linear-cost models.

use std::time::Instant;

use tracing::info;

use crate::config::SchedulerConfig;
use crate::core::cast::overflow_safe_cast;
use crate::core::item::{SampleSize, Schedule};
use crate::data::dataset::Dataset;
use crate::data::memory::InMemoryDataset;
use crate::error::{Error, Result};
use crate::partition::karmarkar_karp;
use crate::schedule::{concat, reshape, shuffle};

/// Batch scheduler for models whose per-sample cost is linear in sample size.
///
/// Each call to [`schedule`] drains one epoch from the dataset, partitions
/// the samples into workload-balanced micro-batches, shuffles the
/// micro-batches with a seed derived from `epoch + base seed`, and lays
/// them out across data-parallel ranks. Scheduling happens at epoch
/// granularity; there is no mid-epoch rescheduling.
///
/// When the per-rank sample count is not a multiple of the micro-batch
/// size, the last micro-batch on every rank is short. Those samples are
/// partitioned separately and the resulting tail schedule is appended to
/// each rank's stream.
///
/// # Example
///
/// ```
/// use nano_batch::{LinearScheduler, SchedulerConfig};
///
/// let config = SchedulerConfig {
///     data_parallel_size: 2,
///     global_batch_size: 4,
///     micro_batch_size: 2,
///     seed: 0,
/// };
/// let mut scheduler = LinearScheduler::from_sizes(&[1, 1, 1, 1, 1, 1, 1, 1], config).unwrap();
///
/// let schedule = scheduler.schedule().unwrap();
/// assert_eq!(schedule.len(), 2);
/// assert_eq!(schedule[0].len(), 4);
/// assert_eq!(schedule[1].len(), 4);
/// ```
///
/// [`schedule`]: LinearScheduler::schedule
#[derive(Debug, Clone)]
pub struct LinearScheduler<D> {
    /// Immutable scheduling parameters.
    config: SchedulerConfig,
    /// Sample-metadata store; owns the per-epoch sampling state.
    dataset: D,
    /// Current epoch, recorded by `on_epoch_begin`.
    epoch: u64,
    /// Micro-batches per epoch across all ranks.
    num_micro_batches: u64,
    /// Size of the final per-rank micro-batch, in `1..=micro_batch_size`.
    last_micro_batch_size: u64,
}

impl<D: Dataset> LinearScheduler<D> {
    /// Create a scheduler over `dataset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the configuration and dataset length
    /// violate any scheduling precondition.
    pub fn new(dataset: D, config: SchedulerConfig) -> Result<Self> {
        let num_samples = dataset.len() as u64;
        config.validate(num_samples)?;

        let samples_per_rank = num_samples / config.data_parallel_size;
        // (x - 1) / y + 1 is ceil(x / y) without branching; likewise
        // (x - 1) % y + 1 maps exact multiples to y instead of 0.
        let num_micro_batches = ((samples_per_rank - 1) / config.micro_batch_size + 1)
            * config.data_parallel_size;
        let last_micro_batch_size = (samples_per_rank - 1) % config.micro_batch_size + 1;

        Ok(Self {
            config,
            dataset,
            epoch: 0,
            num_micro_batches,
            last_micro_batch_size,
        })
    }

    /// Produce the schedule for the current epoch.
    ///
    /// Returns one index stream per data-parallel rank; together the
    /// streams are a permutation of the dataset's index set. The output is
    /// fully determined by the configuration, the epoch, and the dataset
    /// contents.
    pub fn schedule(&mut self) -> Result<Schedule> {
        let data_parallel_size = self.config.data_parallel_size;
        let global_batch_size = self.config.global_batch_size;
        let micro_batch_size = self.config.micro_batch_size;
        let shuffle_seed = self.config.seed.wrapping_add(self.epoch);

        if micro_batch_size == self.last_micro_batch_size {
            let clock = Instant::now();
            let items = self
                .dataset
                .take((micro_batch_size * self.num_micro_batches) as usize)?;
            let micro_batches =
                karmarkar_karp(&items, self.num_micro_batches, overflow_safe_cast)?;
            info!(
                epoch = self.epoch,
                micro_batches = self.num_micro_batches,
                elapsed = ?clock.elapsed(),
                "partitioned epoch into micro-batches"
            );

            let clock = Instant::now();
            let schedule = reshape(
                &shuffle(micro_batches, shuffle_seed),
                data_parallel_size,
                global_batch_size,
                micro_batch_size,
            );
            info!(epoch = self.epoch, elapsed = ?clock.elapsed(), "shuffled micro-batch schedule");

            return Ok(schedule);
        }

        let clock = Instant::now();
        let head_micro_batches = self.num_micro_batches - data_parallel_size;
        let items = self
            .dataset
            .take((micro_batch_size * head_micro_batches) as usize)?;
        let micro_batches = if head_micro_batches == 0 {
            Vec::new()
        } else {
            karmarkar_karp(&items, head_micro_batches, overflow_safe_cast)?
        };

        let last_items = self
            .dataset
            .take((self.last_micro_batch_size * data_parallel_size) as usize)?;
        let last_micro_batches = karmarkar_karp(&last_items, data_parallel_size, overflow_safe_cast)?;
        info!(
            epoch = self.epoch,
            micro_batches = self.num_micro_batches,
            elapsed = ?clock.elapsed(),
            "partitioned epoch into micro-batches"
        );

        let clock = Instant::now();
        let mut schedule = reshape(
            &shuffle(micro_batches, shuffle_seed),
            data_parallel_size,
            global_batch_size,
            micro_batch_size,
        );
        let tail = reshape(
            &shuffle(last_micro_batches, shuffle_seed),
            data_parallel_size,
            global_batch_size,
            micro_batch_size,
        );
        concat(&mut schedule, tail);
        info!(epoch = self.epoch, elapsed = ?clock.elapsed(), "shuffled micro-batch schedule");

        Ok(schedule)
    }

    /// Called at the beginning of a training batch.
    pub fn on_batch_begin(&mut self, batch: u64) {
        self.dataset.on_batch_begin(batch);
    }

    /// Called at the end of a training batch.
    ///
    /// `rank` and `costs` are accepted for forward compatibility with
    /// cost-feedback policies and are currently ignored.
    pub fn on_batch_end(&mut self, batch: u64, _rank: u64, _costs: &[f64]) {
        self.dataset.on_batch_end(batch);
    }

    /// Called at the beginning of an epoch; records the epoch number.
    pub fn on_epoch_begin(&mut self, epoch: u64) {
        self.epoch = epoch;
        self.dataset.on_epoch_begin(epoch);
    }

    /// Called at the end of an epoch.
    pub fn on_epoch_end(&mut self, epoch: u64) {
        self.dataset.on_epoch_end(epoch);
    }

    /// Called once at the beginning of training.
    pub fn on_train_begin(&mut self) {
        self.dataset.on_train_begin();
    }

    /// Called once at the end of training.
    pub fn on_train_end(&mut self) {
        self.dataset.on_train_end();
    }

    /// Get the scheduler configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Get the current epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Get the number of micro-batches per epoch across all ranks.
    pub fn num_micro_batches(&self) -> u64 {
        self.num_micro_batches
    }

    /// Get the size of the final per-rank micro-batch.
    ///
    /// Equal to `micro_batch_size` exactly when the schedule is uniform.
    pub fn last_micro_batch_size(&self) -> u64 {
        self.last_micro_batch_size
    }

    /// Get the number of samples each rank consumes per epoch.
    pub fn samples_per_rank(&self) -> u64 {
        self.dataset.len() as u64 / self.config.data_parallel_size
    }

    /// Get a reference to the dataset.
    pub fn dataset(&self) -> &D {
        &self.dataset
    }
}

impl LinearScheduler<InMemoryDataset> {
    /// Create a scheduler over an in-memory dataset built from `sizes`.
    ///
    /// Sample `i` gets index `i`; the dataset's sampling order is seeded
    /// from the configuration seed.
    pub fn from_sizes(sizes: &[SampleSize], config: SchedulerConfig) -> Result<Self> {
        if sizes.iter().any(|&size| size == 0) {
            return Err(Error::Config("sample sizes must be strictly positive".into()));
        }
        let dataset = InMemoryDataset::new(sizes, config.seed);
        Self::new(dataset, config)
    }
}
