//! Lock-free coordination.
//!
//! Important:
//! - Nothing here ever blocks on a lock. Waiting, where it exists, is a poll.
//! - Orderings are chosen per operation (acquire for reads, release for the
//!   completion flag, acquire-release for the counter) rather than `SeqCst`
//!   everywhere.

/// Atomic counter plus set-once completion flag.
pub mod coordinator;

pub use coordinator::AtomicCoordinator;
