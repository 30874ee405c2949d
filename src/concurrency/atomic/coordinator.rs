use core::fmt;
use core::num::NonZeroUsize;
use core::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use crossbeam_utils::{Backoff, CachePadded};

use crate::concurrency::primitives::{AtomicBool, AtomicUsize};
use crate::error::ThresholdError;

/// A lock-free counter with a completion flag that flips once a known total
/// is reached.
///
/// Protocol:
/// 1. Each worker calls [`fetch_add`](Self::fetch_add) for every unit of work.
/// 2. After its last unit, the worker calls
///    [`report_progress`](Self::report_progress), which sets the flag if the
///    aggregate has reached the target.
/// 3. A monitor calls [`wait_for_completion`](Self::wait_for_completion) and
///    returns once the flag is observed.
///
/// Several workers may observe the threshold at once, so setting the flag is
/// an unconditional store of `true`. The flag never reverts.
///
/// The counter and the flag sit on separate cache lines so that workers
/// hammering the counter do not slow down the monitor's polls of the flag.
pub struct AtomicCoordinator {
    count: CachePadded<AtomicUsize>,
    done: CachePadded<AtomicBool>,
    target: usize,
}

impl AtomicCoordinator {
    /// Creates a coordinator that completes once `target` units are counted.
    pub fn new(target: NonZeroUsize) -> Self {
        Self {
            count: CachePadded::new(AtomicUsize::new(0)),
            done: CachePadded::new(AtomicBool::new(false)),
            target: target.get(),
        }
    }

    /// Creates a coordinator for `workers` workers that each count exactly
    /// `iterations` units.
    ///
    /// Deriving the target from the same numbers the workers run with is what
    /// keeps the monitor from waiting forever.
    ///
    /// # Errors
    /// [`ThresholdError::Zero`] if either input is zero, and
    /// [`ThresholdError::Overflow`] if the product does not fit in a `usize`.
    pub fn for_workers(workers: usize, iterations: usize) -> Result<Self, ThresholdError> {
        let target = workers
            .checked_mul(iterations)
            .ok_or(ThresholdError::Overflow { workers, iterations })?;
        let target = NonZeroUsize::new(target).ok_or(ThresholdError::Zero { workers, iterations })?;
        Ok(Self::new(target))
    }

    /// Returns the total that completes the protocol.
    #[inline]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Adds `delta` to the counter, returning the previous value.
    #[inline]
    pub fn fetch_add(&self, delta: usize) -> usize {
        self.count.fetch_add(delta, Ordering::AcqRel)
    }

    /// Loads the current count.
    #[inline]
    pub fn load(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Sets the completion flag. Idempotent.
    #[inline]
    pub fn mark_done(&self) {
        self.done.store(true, Ordering::Release);
    }

    /// Returns `true` once the completion flag has been set.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Called by a worker after its last increment: sets the flag if the
    /// aggregate count has reached the target.
    ///
    /// Returns `true` if this call observed the threshold (and stored the
    /// flag). More than one worker may return `true`.
    pub fn report_progress(&self) -> bool {
        let count = self.load();
        if count >= self.target {
            self.mark_done();
            tracing::debug!(count, target = self.target, "completion threshold reached");
            true
        } else {
            false
        }
    }

    /// Polls until the completion flag is set, then returns the count.
    ///
    /// Polling spins briefly with exponential backoff, then settles into a
    /// fixed `poll_interval` sleep between checks.
    pub fn wait_for_completion(&self, poll_interval: Duration) -> usize {
        let backoff = Backoff::new();
        loop {
            if self.is_done() {
                let count = self.load();
                tracing::debug!(count, "completion observed");
                return count;
            }
            if backoff.is_completed() {
                tracing::trace!(count = self.load(), target = self.target, "waiting for completion");
                thread::sleep(poll_interval);
            } else {
                backoff.snooze();
            }
        }
    }
}

impl fmt::Debug for AtomicCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicCoordinator")
            .field("count", &self.load())
            .field("done", &self.is_done())
            .field("target", &self.target)
            .finish()
    }
}
