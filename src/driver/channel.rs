use std::thread;

use super::report::encode;
use super::{join_all, ChannelConfig, DeliveryReport, DriverError, WorkerSpec};
use crate::concurrency::sync::Channel;

/// Sends `spec.iterations` values tagged with the sender id.
///
/// # Errors
/// [`DriverError::Rejected`] if the channel could not grow.
pub fn channel_sender(channel: &Channel<u64>, spec: WorkerSpec) -> Result<usize, DriverError> {
    for seq in 0..spec.iterations {
        channel
            .send(encode(spec.id, seq, spec.iterations))
            .map_err(|err| DriverError::Rejected {
                role: "sender",
                id: spec.id,
                reason: err.to_string(),
            })?;
    }
    tracing::trace!(sender = spec.id, messages = spec.iterations, "sender finished");
    Ok(spec.iterations)
}

/// Receives until the channel is closed and drained.
pub fn channel_receiver(channel: &Channel<u64>, receiver_id: usize) -> Vec<u64> {
    let received: Vec<u64> = channel.iter().collect();
    tracing::trace!(receiver = receiver_id, messages = received.len(), "receiver drained");
    received
}

/// Runs senders and receivers over one [`Channel`].
///
/// The driver thread joins every sender, then closes the channel, then joins
/// the receivers.
///
/// # Errors
/// Configuration errors, [`DriverError::Rejected`] if a send failed, and
/// [`DriverError::WorkerPanicked`] if a worker dies.
pub fn run_channel(config: &ChannelConfig) -> Result<DeliveryReport, DriverError> {
    config.validate()?;
    let channel = Channel::new();
    let channel = &channel;

    let received = thread::scope(|s| {
        let receivers: Vec<_> = (0..config.receivers)
            .map(|id| (id, s.spawn(move || channel_receiver(channel, id))))
            .collect();
        let senders: Vec<_> = WorkerSpec::fleet(config.senders, config.messages_per_sender)
            .map(|spec| (spec.id, s.spawn(move || channel_sender(channel, spec))))
            .collect();
        tracing::info!(senders = config.senders, receivers = config.receivers, "channel workers spawned");

        let sent = join_all(senders, "sender");
        channel.close();
        tracing::info!("channel closed by driver");
        let received = join_all(receivers, "receiver");

        for result in sent? {
            result?;
        }
        received
    })?;

    let report = DeliveryReport::verify(config.senders, config.messages_per_sender, &received);
    tracing::info!(consumed = report.consumed, exactly_once = report.exactly_once, "channel workers joined");
    Ok(report)
}
