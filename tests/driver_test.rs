use tether::driver::{
    run_all, run_atomic_coordinator, run_bounded_buffer, run_channel, run_shared_counter,
    BufferConfig, ChannelConfig, CounterConfig,
};
use tether::{DriverConfig, DriverError};

#[test]
fn test_default_run_reports_every_guarantee() {
    let report = run_all(&DriverConfig::default()).unwrap();

    assert_eq!(report.counter.final_value, 15);
    assert!(report.counter.serializable);
    assert_eq!(report.atomic.final_count, 3000);
    assert_eq!(report.atomic.observed_at_completion, 3000);
    assert_eq!(report.buffer.consumed, 20);
    assert!(report.buffer.exactly_once && report.buffer.fifo);
    assert_eq!(report.channel.consumed, 10);
    assert!(report.channel.exactly_once && report.channel.fifo);
}

#[test]
fn test_json_config_drives_the_run() {
    let config = DriverConfig::from_json_str(
        r#"{
            "counter": { "workers": 4, "increments": 10, "amount": -2, "work_delay_ms": 1 },
            "atomic": { "workers": 2, "iterations": 50, "poll_interval_ms": 1 },
            "buffer": { "capacity": 1, "producers": 3, "consumers": 2, "items_per_producer": 40 },
            "channel": { "senders": 3, "receivers": 1, "messages_per_sender": 7 }
        }"#,
    )
    .unwrap();

    let report = run_all(&config).unwrap();
    assert_eq!(report.counter.final_value, -80);
    assert_eq!(report.counter.expected, -80);
    assert!(report.counter.serializable);
    assert_eq!(report.atomic.target, 100);
    assert_eq!(report.buffer.produced, 120);
    assert_eq!(report.buffer.per_consumer.len(), 2);
    assert!(report.buffer.exactly_once);
    assert_eq!(report.channel.per_consumer, vec![21]);
    assert!(report.channel.fifo);
}

#[test]
fn test_report_serializes_to_json() {
    let report = run_all(&DriverConfig::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["atomic"]["target"], 3000);
    assert_eq!(json["buffer"]["exactly_once"], true);
}

#[test]
fn test_drivers_validate_their_section() {
    let err = run_shared_counter(&CounterConfig { workers: 0, ..CounterConfig::default() }).unwrap_err();
    assert_eq!(err.to_string(), "invalid configuration: counter.workers must be at least 1");

    let err = run_bounded_buffer(&BufferConfig { capacity: 0, ..BufferConfig::default() }).unwrap_err();
    assert!(matches!(err, DriverError::InvalidConfig(_)));

    let err = run_channel(&ChannelConfig { senders: 0, ..ChannelConfig::default() }).unwrap_err();
    assert!(matches!(err, DriverError::InvalidConfig(_)));
}

#[test]
fn test_atomic_driver_with_single_worker() {
    let config = DriverConfig::from_json_str(r#"{ "atomic": { "workers": 1, "iterations": 1 } }"#).unwrap();
    let report = run_atomic_coordinator(&config.atomic).unwrap();
    assert_eq!(report.final_count, 1);
    assert_eq!(report.flag_setters, 1);
}

#[test]
fn test_buffer_with_zero_items_finishes_cleanly() {
    let report = run_bounded_buffer(&BufferConfig { items_per_producer: 0, ..BufferConfig::default() }).unwrap();
    assert_eq!(report.consumed, 0);
    assert!(report.exactly_once);
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let err = DriverConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, DriverError::Parse(_)));
}
