//! Reports returned by the drivers.

use std::collections::HashMap;

use serde::Serialize;

/// Outcome of a shared counter run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterReport {
    /// Number of worker threads.
    pub workers: usize,
    /// Increments per worker.
    pub increments: usize,
    /// `workers × increments × amount`.
    pub expected: i64,
    /// Value read after every worker joined.
    pub final_value: i64,
    /// Whether the `(old, new)` pairs of all increments form one unbroken
    /// chain from zero to `final_value`.
    pub serializable: bool,
}

impl CounterReport {
    /// Follows the `(old, new)` pairs from zero and checks that every step
    /// starts where the previous one ended, ending at `final_value`.
    ///
    /// With a non-zero amount every `old` is distinct, so a repeated `old` is
    /// exactly a lost update. The exception is a counter pinned at `i64::MAX`
    /// or `i64::MIN`: saturated increments all return the same `(bound, bound)`
    /// pair, so those self-loops are set aside and must sit at `final_value`.
    pub(crate) fn chain_is_unbroken(history: &[(i64, i64)], final_value: i64) -> bool {
        if history.iter().all(|&(old, new)| old == new) {
            return final_value == 0 && history.iter().all(|&(old, _)| old == 0);
        }

        let (pinned, moving): (Vec<(i64, i64)>, Vec<(i64, i64)>) = history
            .iter()
            .partition(|&&(old, new)| old == new && (old == i64::MAX || old == i64::MIN));

        let mut steps: HashMap<i64, i64> = HashMap::with_capacity(moving.len());
        for &(old, new) in &moving {
            if steps.insert(old, new).is_some() {
                return false;
            }
        }

        let mut cursor = 0;
        for _ in 0..moving.len() {
            match steps.get(&cursor) {
                Some(&next) => cursor = next,
                None => return false,
            }
        }
        cursor == final_value && pinned.iter().all(|&(old, _)| old == final_value)
    }
}

/// Outcome of an atomic coordinator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtomicReport {
    /// Number of worker threads.
    pub workers: usize,
    /// Increments per worker.
    pub iterations: usize,
    /// Total that completes the protocol.
    pub target: usize,
    /// Count the monitor read right after observing the flag.
    pub observed_at_completion: usize,
    /// Count read after every worker joined.
    pub final_count: usize,
    /// Number of workers that observed the threshold and stored the flag.
    pub flag_setters: usize,
}

/// Outcome of a producer/consumer run over a buffer or channel.
///
/// Item values encode their origin: producer `p` sends
/// `p * per_producer + seq` for `seq` in `0..per_producer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// Items handed to the structure.
    pub produced: usize,
    /// Items received across all consumers.
    pub consumed: usize,
    /// Items received by each consumer, by consumer id.
    pub per_consumer: Vec<usize>,
    /// Every produced value was received exactly once.
    pub exactly_once: bool,
    /// Every consumer saw each producer's items in production order.
    pub fifo: bool,
}

impl DeliveryReport {
    pub(crate) fn verify(producers: usize, per_producer: usize, received: &[Vec<u64>]) -> Self {
        let produced = producers * per_producer;
        let per_consumer: Vec<usize> = received.iter().map(Vec::len).collect();
        let consumed = per_consumer.iter().sum();

        let mut all: Vec<u64> = received.iter().flatten().copied().collect();
        all.sort_unstable();
        let exactly_once = all.len() == produced
            && all
                .iter()
                .zip(0u64..)
                .all(|(&value, expected)| value == expected);

        let fifo = received.iter().all(|items| {
            let mut last_seen: HashMap<u64, u64> = HashMap::new();
            items.iter().all(|&value| {
                let (producer, seq) = split(value, per_producer);
                match last_seen.insert(producer, seq) {
                    Some(previous) => previous < seq,
                    None => true,
                }
            })
        });

        Self {
            produced,
            consumed,
            per_consumer,
            exactly_once,
            fifo,
        }
    }
}

/// Config validation keeps `producer * per_producer + seq` within `u64`.
pub(crate) fn encode(producer: usize, seq: usize, per_producer: usize) -> u64 {
    u64::try_from(producer * per_producer + seq).unwrap_or(u64::MAX)
}

fn split(value: u64, per_producer: usize) -> (u64, u64) {
    let per_producer = u64::try_from(per_producer.max(1)).unwrap_or(u64::MAX);
    (value / per_producer, value % per_producer)
}

/// Reports from a full run of every driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Shared counter run.
    pub counter: CounterReport,
    /// Atomic coordinator run.
    pub atomic: AtomicReport,
    /// Bounded buffer run.
    pub buffer: DeliveryReport,
    /// Channel run.
    pub channel: DeliveryReport,
}
