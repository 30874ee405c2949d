use std::thread;

use super::{join_all, CounterConfig, CounterReport, DriverError, WorkerSpec};
use crate::concurrency::sync::SharedCounter;

/// Increments `counter` by `amount`, `spec.iterations` times, returning the
/// `(old, new)` pair of every increment.
pub fn counter_worker(counter: &SharedCounter<i64>, spec: WorkerSpec, amount: i64) -> Vec<(i64, i64)> {
    (0..spec.iterations)
        .map(|_| counter.increment(amount, spec.id))
        .collect()
}

/// Runs `workers` threads against one [`SharedCounter`] and checks the result.
///
/// # Errors
/// [`DriverError::InvalidConfig`] for zero workers or increments, and
/// [`DriverError::WorkerPanicked`] if a worker dies.
pub fn run_shared_counter(config: &CounterConfig) -> Result<CounterReport, DriverError> {
    config.validate()?;
    let counter = SharedCounter::with_work_delay(config.work_delay());

    let counter = &counter;
    let amount = config.amount;

    let history = thread::scope(|s| {
        let handles: Vec<_> = WorkerSpec::fleet(config.workers, config.increments)
            .map(|spec| (spec.id, s.spawn(move || counter_worker(counter, spec, amount))))
            .collect();
        tracing::info!(workers = config.workers, "counter workers spawned");

        join_all(handles, "counter worker")
    })?
    .concat();

    let final_value = counter.get();
    let expected = i64::try_from(config.workers)
        .unwrap_or(i64::MAX)
        .saturating_mul(i64::try_from(config.increments).unwrap_or(i64::MAX))
        .saturating_mul(config.amount);
    tracing::info!(final_value, expected, "counter workers joined");

    Ok(CounterReport {
        workers: config.workers,
        increments: config.increments,
        expected,
        final_value,
        serializable: CounterReport::chain_is_unbroken(&history, final_value),
    })
}
