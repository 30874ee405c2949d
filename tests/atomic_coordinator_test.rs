use std::num::NonZeroUsize;
use std::thread;
use std::time::Duration;

use tether::{AtomicCoordinator, ThresholdError};

#[test]
fn test_monitor_sees_full_count() {
    let coordinator = AtomicCoordinator::for_workers(4, 2500).unwrap();

    let observed = thread::scope(|s| {
        for _ in 0..4 {
            let coordinator = &coordinator;
            s.spawn(move || {
                for _ in 0..2500 {
                    coordinator.fetch_add(1);
                }
                coordinator.report_progress();
            });
        }
        coordinator.wait_for_completion(Duration::from_millis(1))
    });

    assert_eq!(observed, 10_000);
    assert_eq!(coordinator.load(), 10_000);
    assert!(coordinator.is_done());
}

#[test]
fn test_flag_never_reverts() {
    let coordinator = AtomicCoordinator::new(NonZeroUsize::new(5).unwrap());
    coordinator.fetch_add(5);
    assert!(coordinator.report_progress());

    coordinator.mark_done();
    coordinator.fetch_add(1);
    assert!(coordinator.is_done());
    assert!(coordinator.report_progress());
}

#[test]
fn test_concurrent_flag_setters_are_harmless() {
    let coordinator = AtomicCoordinator::new(NonZeroUsize::new(1).unwrap());
    coordinator.fetch_add(1);

    let setters = thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(|| coordinator.report_progress())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).filter(|&set| set).count()
    });

    assert_eq!(setters, 8);
    assert!(coordinator.is_done());
}

#[test]
fn test_bad_thresholds_are_rejected() {
    assert!(matches!(
        AtomicCoordinator::for_workers(3, 0),
        Err(ThresholdError::Zero { workers: 3, iterations: 0 })
    ));
    assert!(matches!(
        AtomicCoordinator::for_workers(usize::MAX, 2),
        Err(ThresholdError::Overflow { .. })
    ));
}
