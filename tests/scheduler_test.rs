//! Integration tests for the epoch scheduler.

use nano_batch::{Error, LinearScheduler, Scheduler, SchedulerConfig};

fn test_config() -> SchedulerConfig {
    SchedulerConfig {
        data_parallel_size: 2,
        global_batch_size: 4,
        micro_batch_size: 2,
        seed: 0,
    }
}

/// Every dataset index appears exactly once across all rank streams.
fn assert_permutation(schedule: &[Vec<u64>], num_samples: u64) {
    let mut indices: Vec<u64> = schedule.iter().flatten().copied().collect();
    indices.sort_unstable();
    assert_eq!(indices, (0..num_samples).collect::<Vec<u64>>());
}

fn rank_weight(row: &[u64], sizes: &[u64]) -> u64 {
    row.iter().map(|&index| sizes[index as usize]).sum()
}

#[test]
fn test_uniform_sizes_split_evenly() {
    let sizes = [1u64; 8];
    let mut scheduler = LinearScheduler::from_sizes(&sizes, test_config()).unwrap();

    let schedule = scheduler.schedule().unwrap();

    assert_eq!(schedule.len(), 2);
    for row in &schedule {
        assert_eq!(row.len(), 4);
        assert_eq!(rank_weight(row, &sizes), 4);
    }
    assert_permutation(&schedule, 8);
}

#[test]
fn test_heavy_light_mix_balances_rank_weights() {
    let sizes = [10, 1, 10, 1, 10, 1, 10, 1];
    let mut scheduler = LinearScheduler::from_sizes(&sizes, test_config()).unwrap();

    let schedule = scheduler.schedule().unwrap();

    // Each micro-batch pairs a heavy sample with a light one, so both
    // ranks carry exactly half the total workload.
    for row in &schedule {
        assert_eq!(rank_weight(row, &sizes), 22);
    }
    assert_permutation(&schedule, 8);
}

#[test]
fn test_epochs_produce_different_schedules() {
    let sizes = [3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 8, 9, 7, 9, 3];
    let mut config = test_config();
    config.seed = 42;
    let mut scheduler = LinearScheduler::from_sizes(&sizes, config).unwrap();

    scheduler.on_epoch_begin(0);
    let epoch0 = scheduler.schedule().unwrap();
    scheduler.on_epoch_begin(1);
    let epoch1 = scheduler.schedule().unwrap();

    for schedule in [&epoch0, &epoch1] {
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].len(), 8);
        assert_eq!(schedule[1].len(), 8);
        assert_permutation(schedule, 16);
    }
    assert_ne!(epoch0, epoch1);
}

#[test]
fn test_base_seeds_produce_different_schedules() {
    let sizes: Vec<u64> = (1..=64).collect();
    let mut seeded = test_config();
    seeded.seed = 1;

    let mut first = LinearScheduler::from_sizes(&sizes, test_config()).unwrap();
    let mut second = LinearScheduler::from_sizes(&sizes, seeded).unwrap();

    assert_ne!(first.schedule().unwrap(), second.schedule().unwrap());
}

#[test]
fn test_identical_schedulers_stay_in_lockstep() {
    let sizes = [3, 1, 4, 1, 5, 9, 2, 6];
    let mut first = LinearScheduler::from_sizes(&sizes, test_config()).unwrap();
    let mut second = LinearScheduler::from_sizes(&sizes, test_config()).unwrap();

    for epoch in 0..3 {
        first.on_epoch_begin(epoch);
        second.on_epoch_begin(epoch);
        assert_eq!(first.schedule().unwrap(), second.schedule().unwrap());
        first.on_epoch_end(epoch);
        second.on_epoch_end(epoch);
    }
}

#[test]
fn test_micro_batch_size_one_is_uniform() {
    // per_rank = 5 with M = 1: every micro-batch holds one sample, no tail.
    let sizes = [1u64; 10];
    let config = SchedulerConfig {
        data_parallel_size: 2,
        global_batch_size: 2,
        micro_batch_size: 1,
        seed: 0,
    };
    let mut scheduler = LinearScheduler::from_sizes(&sizes, config).unwrap();

    assert_eq!(scheduler.num_micro_batches(), 10);
    assert_eq!(scheduler.last_micro_batch_size(), 1);

    let schedule = scheduler.schedule().unwrap();
    assert_eq!(schedule[0].len(), 5);
    assert_eq!(schedule[1].len(), 5);
    assert_permutation(&schedule, 10);
}

#[test]
fn test_short_final_micro_batch_takes_tail_path() {
    // per_rank = 5 with M = 2: four head samples per rank plus one from
    // the separately partitioned tail.
    let sizes = [1u64; 10];
    let mut scheduler = LinearScheduler::from_sizes(&sizes, test_config()).unwrap();

    assert_eq!(scheduler.num_micro_batches(), 6);
    assert_eq!(scheduler.last_micro_batch_size(), 1);

    let schedule = scheduler.schedule().unwrap();
    assert_eq!(schedule.len(), 2);
    assert_eq!(schedule[0].len(), 5);
    assert_eq!(schedule[1].len(), 5);
    assert_permutation(&schedule, 10);
}

#[test]
fn test_tail_weights_stay_balanced() {
    // Heavy/light mix across the tail path: per_rank = 5, M = 2.
    let sizes = [10, 1, 10, 1, 10, 1, 10, 1, 6, 6];
    let mut scheduler = LinearScheduler::from_sizes(&sizes, test_config()).unwrap();

    let schedule = scheduler.schedule().unwrap();

    assert_permutation(&schedule, 10);
    let weights: Vec<u64> = schedule.iter().map(|row| rank_weight(row, &sizes)).collect();
    let max = *weights.iter().max().unwrap();
    let min = *weights.iter().min().unwrap();
    assert!(max - min <= 2 * 10);
}

#[test]
fn test_single_sample_rank() {
    // per_rank = 1 with M = 2: the whole epoch is one short micro-batch.
    let config = SchedulerConfig {
        data_parallel_size: 1,
        global_batch_size: 2,
        micro_batch_size: 2,
        seed: 0,
    };
    let mut scheduler = LinearScheduler::from_sizes(&[5], config).unwrap();

    assert_eq!(scheduler.schedule().unwrap(), vec![vec![0]]);
}

#[test]
fn test_smooth_distribution_balances_tightly() {
    // Sizes 1..=64 into micro-batches of 4: the differencing pass lands
    // every micro-batch on the same weight, so rank totals are exact.
    let sizes: Vec<u64> = (1..=64).collect();
    let config = SchedulerConfig {
        data_parallel_size: 4,
        global_batch_size: 16,
        micro_batch_size: 4,
        seed: 0,
    };
    let mut scheduler = LinearScheduler::from_sizes(&sizes, config).unwrap();

    let schedule = scheduler.schedule().unwrap();

    assert_permutation(&schedule, 64);
    for row in &schedule {
        assert_eq!(row.len(), 16);
        assert_eq!(rank_weight(row, &sizes), 520);
    }
}

#[test]
fn test_draining_past_the_epoch_fails() {
    let mut scheduler = LinearScheduler::from_sizes(&[1u64; 8], test_config()).unwrap();

    scheduler.schedule().unwrap();
    assert!(matches!(
        scheduler.schedule(),
        Err(Error::DatasetExhausted { .. })
    ));

    // A new epoch replenishes the sampler.
    scheduler.on_epoch_begin(1);
    scheduler.schedule().unwrap();
}

#[test]
fn test_epoch_is_recorded_by_callback() {
    let mut scheduler = LinearScheduler::from_sizes(&[1u64; 8], test_config()).unwrap();

    assert_eq!(scheduler.epoch(), 0);
    scheduler.on_epoch_begin(3);
    assert_eq!(scheduler.epoch(), 3);
}

#[test]
fn test_batch_and_train_callbacks_pass_through() {
    let mut scheduler = LinearScheduler::from_sizes(&[1u64; 8], test_config()).unwrap();

    scheduler.on_train_begin();
    scheduler.on_epoch_begin(0);
    scheduler.on_batch_begin(0);
    scheduler.on_batch_end(0, 0, &[1.0, 2.0]);
    scheduler.on_epoch_end(0);
    scheduler.on_train_end();
}

#[test]
fn test_rejects_invalid_configurations() {
    let sizes = [1u64; 8];

    let zero_ranks = SchedulerConfig {
        data_parallel_size: 0,
        ..test_config()
    };
    assert!(matches!(
        LinearScheduler::from_sizes(&sizes, zero_ranks),
        Err(Error::Config(_))
    ));

    let indivisible_global = SchedulerConfig {
        data_parallel_size: 3,
        global_batch_size: 4,
        ..test_config()
    };
    assert!(matches!(
        LinearScheduler::from_sizes(&[1u64; 9], indivisible_global),
        Err(Error::Config(_))
    ));

    let indivisible_micro = SchedulerConfig {
        global_batch_size: 6,
        micro_batch_size: 2,
        ..test_config()
    };
    assert!(matches!(
        LinearScheduler::from_sizes(&sizes, indivisible_micro),
        Err(Error::Config(_))
    ));

    // Nine samples cannot shard across two ranks.
    assert!(matches!(
        LinearScheduler::from_sizes(&[1u64; 9], test_config()),
        Err(Error::Config(_))
    ));

    assert!(matches!(
        LinearScheduler::from_sizes(&[], test_config()),
        Err(Error::Config(_))
    ));

    assert!(matches!(
        LinearScheduler::from_sizes(&[1, 0, 1, 1, 1, 1, 1, 1], test_config()),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_policy_enum_delegates_to_linear() {
    let mut scheduler = Scheduler::from_sizes(&[1u64; 8], test_config()).unwrap();

    scheduler.on_train_begin();
    scheduler.on_epoch_begin(0);
    let schedule = scheduler.schedule().unwrap();
    scheduler.on_batch_begin(0);
    scheduler.on_batch_end(0, 0, &[]);
    scheduler.on_epoch_end(0);
    scheduler.on_train_end();

    assert_eq!(schedule.len(), 2);
    assert_permutation(&schedule, 8);
}

#[test]
fn test_policy_enum_from_linear() {
    let linear = LinearScheduler::from_sizes(&[1u64; 8], test_config()).unwrap();
    let mut scheduler = Scheduler::from(linear);

    assert!(scheduler.schedule().is_ok());
}
