//! Spawn/join drivers for the coordination primitives.
//!
//! Each driver follows the same lifecycle:
//! 1. construct the shared structure from its config section,
//! 2. spawn workers inside `std::thread::scope`, each a plain function that
//!    receives a reference to the structure and its own [`WorkerSpec`],
//! 3. close or finish the structure from the driver thread once producer-side
//!    work is done,
//! 4. join every worker before reading final state.

mod atomic;
mod buffer;
mod channel;
pub mod config;
mod counter;
pub mod report;

use std::thread::ScopedJoinHandle;

use thiserror::Error;

use crate::error::{CapacityError, ThresholdError};

pub use atomic::{atomic_worker, run_atomic_coordinator};
pub use buffer::{buffer_consumer, buffer_producer, run_bounded_buffer};
pub use channel::{channel_receiver, channel_sender, run_channel};
pub use config::{AtomicConfig, BufferConfig, ChannelConfig, CounterConfig, DriverConfig};
pub use counter::{counter_worker, run_shared_counter};
pub use report::{AtomicReport, CounterReport, DeliveryReport, RunReport};

/// Errors raised while driving a run.
#[derive(Error, Debug)]
pub enum DriverError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The configuration document could not be parsed.
    #[error("failed to parse configuration")]
    Parse(#[from] serde_json::Error),
    /// A worker thread panicked.
    #[error("{role} {id} panicked")]
    WorkerPanicked {
        /// Worker role, such as `"producer"`.
        role: &'static str,
        /// Worker id.
        id: usize,
    },
    /// A worker's item was rejected by the structure it was feeding.
    #[error("{role} {id} had an item rejected: {reason}")]
    Rejected {
        /// Worker role.
        role: &'static str,
        /// Worker id.
        id: usize,
        /// Why the structure refused the item.
        reason: String,
    },
    /// The atomic completion threshold could not be derived.
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
    /// The buffer capacity was zero.
    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

/// Per-worker configuration passed explicitly to every worker function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSpec {
    /// Worker id, unique within its role.
    pub id: usize,
    /// Units of work this worker performs.
    pub iterations: usize,
}

impl WorkerSpec {
    /// Specs for `count` workers each performing `iterations` units.
    pub fn fleet(count: usize, iterations: usize) -> impl Iterator<Item = WorkerSpec> {
        (0..count).map(move |id| WorkerSpec { id, iterations })
    }
}

/// Joins a scoped worker, turning a panic into [`DriverError::WorkerPanicked`].
fn join<T>(handle: ScopedJoinHandle<'_, T>, role: &'static str, id: usize) -> Result<T, DriverError> {
    handle.join().map_err(|_| {
        tracing::error!(role, id, "worker panicked");
        DriverError::WorkerPanicked { role, id }
    })
}

/// Joins every worker of one role, even after a failure, and returns the
/// first error.
///
/// Joining everything keeps a panicked worker from resurfacing as a panic of
/// the enclosing scope.
fn join_all<T>(
    handles: Vec<(usize, ScopedJoinHandle<'_, T>)>,
    role: &'static str,
) -> Result<Vec<T>, DriverError> {
    let mut results = Vec::with_capacity(handles.len());
    let mut first_error = None;
    for (id, handle) in handles {
        match join(handle, role, id) {
            Ok(result) => results.push(result),
            Err(err) => {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(results),
    }
}

/// Runs every driver in turn.
///
/// # Errors
/// The first [`DriverError`] raised by validation or by any driver.
pub fn run_all(config: &DriverConfig) -> Result<RunReport, DriverError> {
    config.validate()?;
    Ok(RunReport {
        counter: run_shared_counter(&config.counter)?,
        atomic: run_atomic_coordinator(&config.atomic)?,
        buffer: run_bounded_buffer(&config.buffer)?,
        channel: run_channel(&config.channel)?,
    })
}
