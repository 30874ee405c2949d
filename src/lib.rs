//! # `tether` - Blocking Coordination Primitives
//!
//! A small toolkit of inter-thread coordination primitives for preemptive OS
//! threads, together with the spawn/join drivers that exercise them.
//!
//! ## Primitives
//!
//! 1. **`SharedCounter`** (`concurrency::sync::SharedCounter`):
//!    - A mutex-protected signed scalar
//!    - Every read-modify-write is serialized under one lock
//!
//! 2. **`AtomicCoordinator`** (`concurrency::atomic::AtomicCoordinator`):
//!    - A lock-free counter plus a set-once completion flag
//!    - Acquire/release ordering, no blocking locks
//!
//! 3. **`BoundedBuffer`** (`concurrency::sync::BoundedBuffer`):
//!    - Fixed-capacity FIFO with blocking `produce`/`consume`
//!    - Backpressure on producers, explicit `finish` for end-of-input
//!
//! 4. **`Channel`** (`concurrency::sync::Channel`):
//!    - Unbounded FIFO with blocking `receive`
//!    - Explicit `close` that wakes every waiter
//!
//! ## Guarantees
//!
//! - **Serializability**: counter increments never interleave.
//! - **FIFO**: queue-like structures deliver in insertion order.
//! - **Exactly-once delivery**: with any number of consumers, each item is
//!   handed to exactly one of them.
//! - **Drain-then-empty**: once closed and empty, every receive returns `None`
//!   without blocking.
//!
//! ## Lifecycle
//!
//! Drivers in [`driver`] follow one shape: construct, spawn workers bound to
//! a shared reference, close from the designated thread, join everything,
//! then read the final state.
//!
//! ## Example
//!
//! ```rust
//! use tether::concurrency::sync::BoundedBuffer;
//! use std::thread;
//!
//! let buffer = BoundedBuffer::new(4).unwrap();
//!
//! let received = thread::scope(|s| {
//!     let consumer = s.spawn(|| buffer.drain().collect::<Vec<u32>>());
//!
//!     for i in 0..10 {
//!         buffer.produce(i).unwrap();
//!     }
//!     buffer.finish();
//!
//!     consumer.join().unwrap()
//! });
//!
//! assert_eq!(received, (0..10).collect::<Vec<_>>());
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod concurrency;
pub mod driver;
pub mod error;

pub use concurrency::atomic::AtomicCoordinator;
pub use concurrency::sync::{BoundedBuffer, Channel, SharedCounter};
pub use driver::{DriverConfig, DriverError};
pub use error::{
    AllocationError, CapacityError, ProduceError, ThresholdError, TryProduceError, TryReceiveError,
};

// Compile-time assertions for the sharing model: every primitive is handed to
// worker threads by reference, so each must be `Send + Sync` for `Send` items.
#[cfg(not(loom))]
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<SharedCounter<i64>>();
    assert_send_sync::<AtomicCoordinator>();
    assert_send_sync::<BoundedBuffer<u64>>();
    assert_send_sync::<Channel<String>>();
};
