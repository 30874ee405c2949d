//! `SharedCounter` — a mutex-guarded signed scalar.

use core::fmt;
use std::time::Duration;

use num_traits::{PrimInt, Saturating, Signed};

use crate::concurrency::primitives::{lock, Mutex};

/// A signed counter whose every read and write happens under one lock.
///
/// `increment` is a single critical section: the old value is read, an
/// optional simulated-work delay elapses, and the new value is written, all
/// without releasing the lock. The `(old, new)` pairs returned by concurrent
/// increments, ordered by lock acquisition, therefore form one total order.
///
/// Increments saturate at the bounds of `T` instead of overflowing.
pub struct SharedCounter<T = i64> {
    value: Mutex<T>,
    work_delay: Duration,
}

impl<T> SharedCounter<T>
where
    T: PrimInt + Signed + fmt::Debug,
{
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::with_work_delay(Duration::ZERO)
    }

    /// Creates a counter that sleeps for `work_delay` inside each increment,
    /// between reading the old value and writing the new one.
    ///
    /// A non-zero delay widens the read-modify-write window, which makes lost
    /// updates easy to observe if serialization were ever broken.
    pub fn with_work_delay(work_delay: Duration) -> Self {
        Self {
            value: Mutex::new(T::zero()),
            work_delay,
        }
    }

    /// Adds `amount` on behalf of `worker_id`, returning `(old, new)`.
    pub fn increment(&self, amount: T, worker_id: usize) -> (T, T) {
        let mut value = lock(&self.value);
        let old = *value;
        if !self.work_delay.is_zero() {
            std::thread::sleep(self.work_delay);
        }
        let new = Saturating::saturating_add(old, amount);
        *value = new;
        tracing::debug!(worker = worker_id, ?old, ?new, "counter incremented");
        (old, new)
    }

    /// Returns the current value.
    pub fn get(&self) -> T {
        *lock(&self.value)
    }

    /// Returns the simulated-work delay applied inside each increment.
    #[inline]
    pub fn work_delay(&self) -> Duration {
        self.work_delay
    }
}

impl<T> Default for SharedCounter<T>
where
    T: PrimInt + Signed + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SharedCounter<T>
where
    T: PrimInt + Signed + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCounter")
            .field("value", &self.get())
            .field("work_delay", &self.work_delay)
            .finish()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use std::thread;
    use tracing_test::traced_test;

    #[test]
    fn starts_at_zero_and_accumulates() {
        let counter = SharedCounter::<i32>::new();
        assert_eq!(counter.get(), 0);
        assert_eq!(counter.increment(5, 0), (0, 5));
        assert_eq!(counter.increment(-7, 1), (5, -2));
        assert_eq!(counter.get(), -2);
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let counter = SharedCounter::<i8>::new();
        counter.increment(100, 0);
        assert_eq!(counter.increment(100, 0), (100, i8::MAX));
        assert_eq!(counter.get(), i8::MAX);
    }

    #[test]
    fn survives_a_panicking_lock_holder() {
        let counter = SharedCounter::<i64>::new();
        counter.increment(3, 0);

        thread::scope(|s| {
            let handle = s.spawn(|| {
                let _guard = lock(&counter.value);
                panic!("worker died holding the counter lock");
            });
            assert!(handle.join().is_err());
        });

        assert_eq!(counter.increment(1, 1), (3, 4));
    }

    #[test]
    fn debug_reads_through_the_lock() {
        let counter = SharedCounter::<i64>::default();
        counter.increment(42, 0);
        let rendered = format!("{counter:?}");
        assert!(rendered.contains("value: 42"), "{rendered}");
    }

    #[test]
    #[traced_test]
    fn increments_are_logged_with_worker_id() {
        let counter = SharedCounter::<i64>::new();
        counter.increment(2, 7);
        assert!(logs_contain("counter incremented"));
        assert!(logs_contain("worker=7"));
    }
}
