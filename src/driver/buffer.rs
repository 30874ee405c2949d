use std::thread;

use super::report::encode;
use super::{join_all, BufferConfig, DeliveryReport, DriverError, WorkerSpec};
use crate::concurrency::sync::BoundedBuffer;

/// Finishes the buffer if a consumer unwinds, so producers blocked on a full
/// buffer are released instead of waiting for a consumer that is gone.
struct FinishOnPanic<'a, T>(&'a BoundedBuffer<T>);

impl<T> Drop for FinishOnPanic<'_, T> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.finish();
        }
    }
}

/// Produces `spec.iterations` values tagged with the producer id.
///
/// # Errors
/// [`DriverError::Rejected`] if the buffer refuses an item, which happens if
/// it was finished early or could not grow.
pub fn buffer_producer(buffer: &BoundedBuffer<u64>, spec: WorkerSpec) -> Result<usize, DriverError> {
    for seq in 0..spec.iterations {
        buffer
            .produce(encode(spec.id, seq, spec.iterations))
            .map_err(|err| DriverError::Rejected {
                role: "producer",
                id: spec.id,
                reason: err.to_string(),
            })?;
    }
    tracing::trace!(producer = spec.id, items = spec.iterations, "producer finished");
    Ok(spec.iterations)
}

/// Consumes until end-of-stream, returning everything received in order.
pub fn buffer_consumer(buffer: &BoundedBuffer<u64>, consumer_id: usize) -> Vec<u64> {
    let received: Vec<u64> = buffer.drain().collect();
    tracing::trace!(consumer = consumer_id, items = received.len(), "consumer drained");
    received
}

/// Runs producers and consumers over one [`BoundedBuffer`].
///
/// The driver thread joins every producer, then calls `finish`, then joins
/// the consumers.
///
/// # Errors
/// Configuration errors, [`DriverError::Rejected`] if a producer's item was
/// refused, and [`DriverError::WorkerPanicked`] if a worker dies.
pub fn run_bounded_buffer(config: &BufferConfig) -> Result<DeliveryReport, DriverError> {
    run_with_consumer(config, buffer_consumer)
}

fn run_with_consumer<C>(config: &BufferConfig, consumer: C) -> Result<DeliveryReport, DriverError>
where
    C: Fn(&BoundedBuffer<u64>, usize) -> Vec<u64> + Sync,
{
    config.validate()?;
    let buffer = BoundedBuffer::new(config.capacity)?;
    let buffer = &buffer;
    let consumer = &consumer;

    let received = thread::scope(|s| -> Result<Vec<Vec<u64>>, DriverError> {
        let consumers: Vec<_> = (0..config.consumers)
            .map(|id| {
                let handle = s.spawn(move || {
                    let _guard = FinishOnPanic(buffer);
                    consumer(buffer, id)
                });
                (id, handle)
            })
            .collect();
        let producers: Vec<_> = WorkerSpec::fleet(config.producers, config.items_per_producer)
            .map(|spec| (spec.id, s.spawn(move || buffer_producer(buffer, spec))))
            .collect();
        tracing::info!(
            capacity = config.capacity,
            producers = config.producers,
            consumers = config.consumers,
            "buffer workers spawned"
        );

        let produced = join_all(producers, "producer");
        buffer.finish();
        tracing::info!("buffer finished by driver");
        let received = join_all(consumers, "consumer");

        // A dead consumer finishes the buffer early, so its panic explains
        // any producer rejections that follow.
        let received = received?;
        for result in produced? {
            result?;
        }
        Ok(received)
    })?;

    let report = DeliveryReport::verify(config.producers, config.items_per_producer, &received);
    tracing::info!(consumed = report.consumed, exactly_once = report.exactly_once, "buffer workers joined");
    Ok(report)
}
