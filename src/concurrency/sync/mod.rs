//! Lock-based coordination primitives.
//!
//! All three types follow the same shape: a private `Mutex` around the state,
//! plus condition variables for the blocking ones. Waits always re-check their
//! predicate in a loop, so spurious wake-ups are harmless.

pub mod bounded_buffer;
pub mod channel;
pub mod shared_counter;

pub use bounded_buffer::{BoundedBuffer, Drain};
pub use channel::{Channel, Iter};
pub use shared_counter::SharedCounter;
