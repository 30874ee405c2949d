//! `BoundedBuffer` — a fixed-capacity blocking FIFO for producer/consumer
//! pipelines.
//!
//! # States
//! - Open, not full: `produce` appends immediately.
//! - Open, full: `produce` blocks until a consumer frees a slot.
//! - Finished, non-empty: consumers keep draining; producers are rejected.
//! - Finished, empty (terminal): every `consume` returns `None` at once.

use core::fmt;
use std::collections::VecDeque;

use crate::concurrency::primitives::{lock, wait, Condvar, Mutex};
use crate::error::{CapacityError, ProduceError, TryProduceError};

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// A bounded multi-producer multi-consumer queue with blocking operations.
///
/// Invariants:
/// - `0 <= len <= capacity` in every reachable state.
/// - Once finished, a buffer never reopens.
/// - Items leave in the order they entered, each to exactly one consumer.
pub struct BoundedBuffer<T> {
    state: Mutex<State<T>>,
    capacity: usize,
    /// Signalled when an item is appended, or on finish.
    not_empty: Condvar,
    /// Signalled when an item is removed, or on finish.
    not_full: Condvar,
}

impl<T> BoundedBuffer<T> {
    /// Creates an empty, open buffer holding at most `capacity` items.
    ///
    /// # Errors
    /// Returns [`CapacityError`] if `capacity` is zero, since no producer could
    /// ever make progress.
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        if capacity == 0 {
            return Err(CapacityError);
        }
        Ok(Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                closed: false,
            }),
            capacity,
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        })
    }

    /// Appends `item`, blocking while the buffer is full.
    ///
    /// Wakes one waiting consumer on success.
    ///
    /// # Errors
    /// - [`ProduceError::Finished`] if [`finish`](Self::finish) has been called,
    ///   including while this call was blocked waiting for space. Producers
    ///   must stop producing after `finish`; the rejection only guarantees they
    ///   are never parked forever.
    /// - [`ProduceError::Allocation`] if the backing storage could not grow.
    ///
    /// The rejected item is handed back in both cases and the buffer is
    /// unchanged.
    pub fn produce(&self, item: T) -> Result<(), ProduceError<T>> {
        let mut state = lock(&self.state);
        while state.items.len() == self.capacity && !state.closed {
            tracing::trace!(capacity = self.capacity, "buffer full, producer waiting");
            state = wait(&self.not_full, state);
        }
        if state.closed {
            return Err(ProduceError::Finished(item));
        }
        if state.items.try_reserve(1).is_err() {
            return Err(ProduceError::Allocation(item));
        }
        state.items.push_back(item);
        drop(state);

        self.not_empty.notify_one();
        Ok(())
    }

    /// Appends `item` only if there is room right now.
    ///
    /// # Errors
    /// [`TryProduceError::Full`], [`TryProduceError::Finished`] or
    /// [`TryProduceError::Allocation`], each handing the item back.
    pub fn try_produce(&self, item: T) -> Result<(), TryProduceError<T>> {
        let mut state = lock(&self.state);
        if state.closed {
            return Err(TryProduceError::Finished(item));
        }
        if state.items.len() == self.capacity {
            return Err(TryProduceError::Full(item));
        }
        if state.items.try_reserve(1).is_err() {
            return Err(TryProduceError::Allocation(item));
        }
        state.items.push_back(item);
        drop(state);

        self.not_empty.notify_one();
        Ok(())
    }

    /// Removes the oldest item, blocking while the buffer is empty and open.
    ///
    /// Returns `None` once the buffer is finished and drained; from then on it
    /// never blocks again.
    pub fn consume(&self) -> Option<T> {
        let mut state = lock(&self.state);
        loop {
            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Some(item);
            }
            if state.closed {
                return None;
            }
            tracing::trace!("buffer empty, consumer waiting");
            state = wait(&self.not_empty, state);
        }
    }

    /// Removes the oldest item if one is available right now.
    pub fn try_consume(&self) -> Option<T> {
        let item = lock(&self.state).items.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Signals that no more input will arrive and wakes every waiter.
    ///
    /// Idempotent.
    pub fn finish(&self) {
        let mut state = lock(&self.state);
        if !state.closed {
            state.closed = true;
            tracing::debug!(remaining = state.items.len(), "buffer finished");
        }
        drop(state);

        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    /// Returns a blocking iterator that consumes until end-of-stream.
    pub fn drain(&self) -> Drain<'_, T> {
        Drain { buffer: self }
    }

    /// Returns the maximum number of buffered items.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of buffered items.
    pub fn len(&self) -> usize {
        lock(&self.state).items.len()
    }

    /// Returns `true` if no items are buffered.
    pub fn is_empty(&self) -> bool {
        lock(&self.state).items.is_empty()
    }

    /// Returns `true` if the buffer is at capacity.
    pub fn is_full(&self) -> bool {
        lock(&self.state).items.len() == self.capacity
    }

    /// Returns `true` once [`finish`](Self::finish) has been called.
    pub fn is_finished(&self) -> bool {
        lock(&self.state).closed
    }
}

impl<T> fmt::Debug for BoundedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("BoundedBuffer")
            .field("len", &state.items.len())
            .field("capacity", &self.capacity)
            .field("finished", &state.closed)
            .finish()
    }
}

/// Blocking iterator returned by [`BoundedBuffer::drain`].
pub struct Drain<'a, T> {
    buffer: &'a BoundedBuffer<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.buffer.consume()
    }
}
