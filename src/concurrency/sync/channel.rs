//! `Channel` — an unbounded, explicitly closable blocking FIFO.
//!
//! Unlike `std::sync::mpsc`, closing is an explicit call rather than a
//! consequence of dropping senders, and any number of threads may receive.
//!
//! The queue has no capacity bound: a producer that outpaces its receivers
//! grows memory without limit. Use `BoundedBuffer` where backpressure is
//! needed.

use core::fmt;
use std::collections::VecDeque;

use crate::concurrency::primitives::{lock, wait, Condvar, Mutex};
use crate::error::{AllocationError, TryReceiveError};

struct State<T> {
    queue: VecDeque<T>,
    closed: bool,
}

/// An unbounded multi-producer multi-consumer channel.
///
/// Messages sent after [`close`](Channel::close) are dropped silently.
pub struct Channel<T> {
    state: Mutex<State<T>>,
    available: Condvar,
}

impl<T> Channel<T> {
    /// Creates an empty, open channel.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Appends `message` and wakes one waiting receiver.
    ///
    /// Once the channel is closed this is a no-op: the message is dropped and
    /// `Ok(())` is returned.
    ///
    /// # Errors
    /// Returns [`AllocationError`] with the message if the queue could not
    /// grow; the channel is left unchanged.
    pub fn send(&self, message: T) -> Result<(), AllocationError<T>> {
        let mut state = lock(&self.state);
        if state.closed {
            tracing::debug!("message sent after close, dropping");
            return Ok(());
        }
        if state.queue.try_reserve(1).is_err() {
            return Err(AllocationError(message));
        }
        state.queue.push_back(message);
        drop(state);

        self.available.notify_one();
        Ok(())
    }

    /// Removes the oldest message, blocking while the channel is empty and
    /// open.
    ///
    /// Returns `None` once the channel is closed and drained.
    pub fn receive(&self) -> Option<T> {
        let mut state = lock(&self.state);
        loop {
            if let Some(message) = state.queue.pop_front() {
                return Some(message);
            }
            if state.closed {
                return None;
            }
            tracing::trace!("channel empty, receiver waiting");
            state = wait(&self.available, state);
        }
    }

    /// Removes the oldest message without blocking.
    ///
    /// # Errors
    /// [`TryReceiveError::Empty`] if nothing is queued yet,
    /// [`TryReceiveError::Closed`] if the channel is closed and drained.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        let mut state = lock(&self.state);
        match state.queue.pop_front() {
            Some(message) => Ok(message),
            None if state.closed => Err(TryReceiveError::Closed),
            None => Err(TryReceiveError::Empty),
        }
    }

    /// Closes the channel and wakes every blocked receiver.
    ///
    /// Queued messages remain receivable. Idempotent.
    pub fn close(&self) {
        let mut state = lock(&self.state);
        if !state.closed {
            state.closed = true;
            tracing::debug!(pending = state.queue.len(), "channel closed");
        }
        drop(state);

        self.available.notify_all();
    }

    /// Returns a blocking iterator over received messages, ending when the
    /// channel is closed and drained.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { channel: self }
    }

    /// Returns the number of queued messages.
    pub fn len(&self) -> usize {
        lock(&self.state).queue.len()
    }

    /// Returns `true` if no messages are queued.
    pub fn is_empty(&self) -> bool {
        lock(&self.state).queue.is_empty()
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("Channel")
            .field("len", &state.queue.len())
            .field("closed", &state.closed)
            .finish()
    }
}

/// Blocking iterator returned by [`Channel::iter`].
pub struct Iter<'a, T> {
    channel: &'a Channel<T>,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.channel.receive()
    }
}

impl<'a, T> IntoIterator for &'a Channel<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;
    use tracing_test::traced_test;

    #[test]
    fn send_then_receive_in_order() {
        let channel = Channel::new();
        channel.send(1).unwrap();
        channel.send(2).unwrap();
        channel.send(3).unwrap();

        assert_eq!(channel.len(), 3);
        assert_eq!(channel.receive(), Some(1));
        assert_eq!(channel.try_receive(), Ok(2));
        assert_eq!(channel.receive(), Some(3));
        assert_eq!(channel.try_receive(), Err(TryReceiveError::Empty));
    }

    #[test]
    #[traced_test]
    fn send_after_close_is_dropped() {
        let channel = Channel::new();
        channel.send("kept").unwrap();
        channel.close();
        channel.close();

        assert_eq!(channel.send("dropped"), Ok(()));
        assert_eq!(channel.len(), 1);
        assert_eq!(channel.receive(), Some("kept"));
        assert_eq!(channel.receive(), None);
        assert_eq!(channel.try_receive(), Err(TryReceiveError::Closed));
        assert!(logs_contain("message sent after close, dropping"));
    }

    #[test]
    fn close_wakes_every_receiver() {
        let channel = Channel::<u32>::new();

        thread::scope(|s| {
            let receivers: Vec<_> = (0..4).map(|_| s.spawn(|| channel.receive())).collect();
            thread::sleep(Duration::from_millis(50));
            channel.close();

            for receiver in receivers {
                assert_eq!(receiver.join().unwrap(), None);
            }
        });
    }

    #[test]
    fn iterator_stops_at_end_of_stream() {
        let channel = Channel::default();
        for i in 0..5 {
            channel.send(i).unwrap();
        }
        channel.close();

        let total: i32 = (&channel).into_iter().sum();
        assert_eq!(total, 10);
        assert!(channel.is_closed());
    }
}
