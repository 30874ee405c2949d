//! Coordination primitives for OS threads.
//!
//! Important: each structure owns exactly one lock (or, for the atomic
//! coordinator, no lock at all). No operation here holds a lock while calling
//! into another structure, so primitives can be composed freely without
//! cross-component deadlock.

pub mod atomic;
pub(crate) mod primitives;
pub mod sync;
