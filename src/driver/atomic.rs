use std::thread;

use super::{join_all, AtomicConfig, AtomicReport, DriverError, WorkerSpec};
use crate::concurrency::atomic::AtomicCoordinator;

/// Sets the completion flag if a worker unwinds, so the monitor stops
/// polling for a count that will never arrive.
struct MarkDoneOnPanic<'a>(&'a AtomicCoordinator);

impl Drop for MarkDoneOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.mark_done();
        }
    }
}

/// Counts `spec.iterations` units on `coordinator`, then reports progress.
///
/// Returns `true` if this worker observed the completion threshold.
pub fn atomic_worker(coordinator: &AtomicCoordinator, spec: WorkerSpec) -> bool {
    for _ in 0..spec.iterations {
        coordinator.fetch_add(1);
    }
    let reached = coordinator.report_progress();
    tracing::trace!(worker = spec.id, reached, "atomic worker finished");
    reached
}

/// Runs `workers` threads against one [`AtomicCoordinator`] while the driver
/// thread monitors the completion flag.
///
/// # Errors
/// [`DriverError::InvalidConfig`] or [`DriverError::Threshold`] for a bad
/// configuration, and [`DriverError::WorkerPanicked`] if a worker dies.
pub fn run_atomic_coordinator(config: &AtomicConfig) -> Result<AtomicReport, DriverError> {
    run_with_worker(config, atomic_worker)
}

fn run_with_worker<W>(config: &AtomicConfig, worker: W) -> Result<AtomicReport, DriverError>
where
    W: Fn(&AtomicCoordinator, WorkerSpec) -> bool + Sync,
{
    config.validate()?;
    let coordinator = AtomicCoordinator::for_workers(config.workers, config.iterations)?;
    let coordinator = &coordinator;
    let worker = &worker;

    let (observed_at_completion, reached) = thread::scope(|s| {
        let handles: Vec<_> = WorkerSpec::fleet(config.workers, config.iterations)
            .map(|spec| {
                let handle = s.spawn(move || {
                    let _guard = MarkDoneOnPanic(coordinator);
                    worker(coordinator, spec)
                });
                (spec.id, handle)
            })
            .collect();
        tracing::info!(workers = config.workers, target = coordinator.target(), "atomic workers spawned");

        let observed = coordinator.wait_for_completion(config.poll_interval());
        join_all(handles, "atomic worker").map(|reached| (observed, reached))
    })?;

    let final_count = coordinator.load();
    tracing::info!(final_count, observed_at_completion, "atomic workers joined");

    Ok(AtomicReport {
        workers: config.workers,
        iterations: config.iterations,
        target: coordinator.target(),
        observed_at_completion,
        final_count,
        flag_setters: reached.into_iter().filter(|&r| r).count(),
    })
}
