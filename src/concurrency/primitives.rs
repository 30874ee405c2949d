//! Lock, condition-variable and atomic primitives used by every structure in
//! this crate.
//!
//! Under `--cfg loom` these resolve to loom's model-checked versions so the
//! same code can be explored across all interleavings:
//!
//! ```bash
//! RUSTFLAGS="--cfg loom" cargo test --release --test loom_tests
//! ```

#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicBool, AtomicUsize};
#[cfg(loom)]
pub(crate) use loom::sync::{Condvar, Mutex, MutexGuard};

#[cfg(not(loom))]
pub(crate) use std::sync::atomic::{AtomicBool, AtomicUsize};
#[cfg(not(loom))]
pub(crate) use std::sync::{Condvar, Mutex, MutexGuard};

use std::sync::PoisonError;

/// Acquires `mutex`, recovering the guard if a previous holder panicked.
///
/// The protected state is only mutated by complete, non-panicking steps, so a
/// poisoned lock still guards consistent data.
#[inline]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Blocks on `condvar`, releasing `guard` for the duration of the wait.
#[inline]
pub(crate) fn wait<'a, T>(condvar: &Condvar, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
    condvar.wait(guard).unwrap_or_else(PoisonError::into_inner)
}
