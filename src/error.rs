//! Error types shared by the coordination primitives.
//!
//! Errors that carry a rejected item hand it back to the caller so nothing is
//! silently lost. Their `Debug` output never prints the item, so they work for
//! any `T`.

use core::fmt;
use thiserror::Error;

/// Growing a queue's backing storage failed.
///
/// The rejected message is returned; the queue is left untouched and its lock
/// has been released.
#[derive(Error, Clone, Copy, PartialEq, Eq)]
#[error("failed to grow queue storage")]
pub struct AllocationError<T>(pub T);

impl<T> AllocationError<T> {
    /// Returns the message that could not be enqueued.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for AllocationError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllocationError").finish_non_exhaustive()
    }
}

/// Error returned by `BoundedBuffer::produce`.
#[derive(Error, Clone, Copy, PartialEq, Eq)]
pub enum ProduceError<T> {
    /// The buffer was already finished; producers must stop after `finish`.
    #[error("buffer is finished")]
    Finished(T),
    /// The backing storage could not grow.
    #[error("failed to grow buffer storage")]
    Allocation(T),
}

impl<T> ProduceError<T> {
    /// Returns the item that was rejected.
    pub fn into_inner(self) -> T {
        match self {
            Self::Finished(item) | Self::Allocation(item) => item,
        }
    }
}

impl<T> From<AllocationError<T>> for ProduceError<T> {
    fn from(err: AllocationError<T>) -> Self {
        Self::Allocation(err.0)
    }
}

impl<T> fmt::Debug for ProduceError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finished(_) => f.write_str("Finished(..)"),
            Self::Allocation(_) => f.write_str("Allocation(..)"),
        }
    }
}

/// Error returned by `BoundedBuffer::try_produce`.
#[derive(Error, Clone, Copy, PartialEq, Eq)]
pub enum TryProduceError<T> {
    /// The buffer is at capacity.
    #[error("buffer is full")]
    Full(T),
    /// The buffer was already finished.
    #[error("buffer is finished")]
    Finished(T),
    /// The backing storage could not grow.
    #[error("failed to grow buffer storage")]
    Allocation(T),
}

impl<T> TryProduceError<T> {
    /// Returns the item that was rejected.
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(item) | Self::Finished(item) | Self::Allocation(item) => item,
        }
    }
}

impl<T> fmt::Debug for TryProduceError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => f.write_str("Full(..)"),
            Self::Finished(_) => f.write_str("Finished(..)"),
            Self::Allocation(_) => f.write_str("Allocation(..)"),
        }
    }
}

/// Error returned by `Channel::try_receive`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryReceiveError {
    /// The channel is open but currently empty.
    #[error("channel is empty")]
    Empty,
    /// The channel is closed and fully drained.
    #[error("channel is closed")]
    Closed,
}

/// A bounded buffer was requested with zero capacity.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("bounded buffer capacity must be at least 1")]
pub struct CapacityError;

/// The completion threshold `workers × iterations` could not be derived.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdError {
    /// The threshold would be zero, so no worker would ever report completion.
    #[error("completion threshold is zero ({workers} workers x {iterations} iterations)")]
    Zero {
        /// Number of workers.
        workers: usize,
        /// Iterations per worker.
        iterations: usize,
    },
    /// The threshold does not fit in a `usize`.
    #[error("completion threshold overflows ({workers} workers x {iterations} iterations)")]
    Overflow {
        /// Number of workers.
        workers: usize,
        /// Iterations per worker.
        iterations: usize,
    },
}
