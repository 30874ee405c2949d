//! Driver configuration.
//!
//! Every field has a default, so a partial JSON document (or `{}`) is a
//! valid configuration:
//!
//! ```rust
//! use tether::DriverConfig;
//!
//! let config = DriverConfig::from_json_str(r#"{ "buffer": { "capacity": 2 } }"#).unwrap();
//! assert_eq!(config.buffer.capacity, 2);
//! assert_eq!(config.atomic.iterations, 1000);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::DriverError;

/// Configuration for all four drivers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Shared counter run.
    pub counter: CounterConfig,
    /// Atomic coordinator run.
    pub atomic: AtomicConfig,
    /// Bounded buffer run.
    pub buffer: BufferConfig,
    /// Channel run.
    pub channel: ChannelConfig,
}

impl DriverConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// [`DriverError::Parse`] for malformed JSON or unknown fields,
    /// [`DriverError::InvalidConfig`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, DriverError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    /// [`DriverError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), DriverError> {
        self.counter.validate()?;
        self.atomic.validate()?;
        self.buffer.validate()?;
        self.channel.validate()
    }
}

fn require_positive(field: &str, value: usize) -> Result<(), DriverError> {
    if value == 0 {
        return Err(DriverError::InvalidConfig(format!("{field} must be at least 1")));
    }
    Ok(())
}

fn require_encodable(section: &str, producers: usize, per_producer: usize) -> Result<(), DriverError> {
    producers
        .checked_mul(per_producer)
        .and_then(|total| u64::try_from(total).ok())
        .map(|_| ())
        .ok_or_else(|| DriverError::InvalidConfig(format!("{section}: total item count overflows")))
}

/// `W` workers each incrementing a [`SharedCounter`](crate::SharedCounter)
/// `N` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Increments per worker.
    pub increments: usize,
    /// Amount added per increment.
    pub amount: i64,
    /// Simulated work inside each critical section, in milliseconds.
    pub work_delay_ms: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            increments: 5,
            amount: 1,
            work_delay_ms: 0,
        }
    }
}

impl CounterConfig {
    /// Simulated work delay as a [`Duration`].
    pub fn work_delay(&self) -> Duration {
        Duration::from_millis(self.work_delay_ms)
    }

    pub(crate) fn validate(&self) -> Result<(), DriverError> {
        require_positive("counter.workers", self.workers)?;
        require_positive("counter.increments", self.increments)
    }
}

/// `K` workers each counting `iterations` units on an
/// [`AtomicCoordinator`](crate::AtomicCoordinator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AtomicConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Increments per worker.
    pub iterations: usize,
    /// Monitor poll interval, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for AtomicConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            iterations: 1000,
            poll_interval_ms: 10,
        }
    }
}

impl AtomicConfig {
    /// Monitor poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub(crate) fn validate(&self) -> Result<(), DriverError> {
        require_positive("atomic.workers", self.workers)?;
        require_positive("atomic.iterations", self.iterations)?;
        if self.workers.checked_mul(self.iterations).is_none() {
            return Err(DriverError::InvalidConfig(
                "atomic: workers x iterations overflows".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Producers and consumers sharing one [`BoundedBuffer`](crate::BoundedBuffer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BufferConfig {
    /// Buffer capacity.
    pub capacity: usize,
    /// Number of producer threads.
    pub producers: usize,
    /// Number of consumer threads.
    pub consumers: usize,
    /// Items produced by each producer.
    pub items_per_producer: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            producers: 1,
            consumers: 3,
            items_per_producer: 20,
        }
    }
}

impl BufferConfig {
    pub(crate) fn validate(&self) -> Result<(), DriverError> {
        require_positive("buffer.capacity", self.capacity)?;
        require_positive("buffer.producers", self.producers)?;
        require_positive("buffer.consumers", self.consumers)?;
        require_encodable("buffer", self.producers, self.items_per_producer)
    }
}

/// Senders and receivers sharing one [`Channel`](crate::Channel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelConfig {
    /// Number of sender threads.
    pub senders: usize,
    /// Number of receiver threads.
    pub receivers: usize,
    /// Messages sent by each sender.
    pub messages_per_sender: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            senders: 1,
            receivers: 2,
            messages_per_sender: 10,
        }
    }
}

impl ChannelConfig {
    pub(crate) fn validate(&self) -> Result<(), DriverError> {
        require_positive("channel.senders", self.senders)?;
        require_positive("channel.receivers", self.receivers)?;
        require_encodable("channel", self.senders, self.messages_per_sender)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = DriverConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DriverConfig::default());
        assert_eq!(config.counter.workers, 3);
        assert_eq!(config.counter.increments, 5);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = DriverConfig::from_json_str(r#"{ "bufer": {} }"#).unwrap_err();
        assert!(matches!(err, DriverError::Parse(_)), "{err:?}");
    }

    #[test]
    fn zero_counts_are_rejected() {
        let err = DriverConfig::from_json_str(r#"{ "channel": { "receivers": 0 } }"#).unwrap_err();
        assert_eq!(err.to_string(), "invalid configuration: channel.receivers must be at least 1");
    }

    #[test]
    fn durations_are_milliseconds() {
        let config = DriverConfig::from_json_str(
            r#"{ "counter": { "work_delay_ms": 3 }, "atomic": { "poll_interval_ms": 7 } }"#,
        )
        .unwrap();
        assert_eq!(config.counter.work_delay(), Duration::from_millis(3));
        assert_eq!(config.atomic.poll_interval(), Duration::from_millis(7));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = DriverConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(DriverConfig::from_json_str(&json).unwrap(), config);
    }
}
