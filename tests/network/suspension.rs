//! Fast stream suspension during lookups, with real generator threads.

use crate::common::*;
use std::time::Duration;
use tasknet::{GeneratorState, LookupState};

#[test]
fn suspended_stream_publishes_nothing() {
    let t = TestNetwork::running(3);
    let fast = t.network.fast();
    assert!(wait_until(Duration::from_secs(2), || fast.ticks_published() >= 2));

    let pending = t.network.begin_lookup().unwrap();
    assert_eq!(fast.state(), GeneratorState::Suspended);
    let frozen_ticks = fast.ticks_published();
    let frozen_value = fast.latest();
    let frozen_lines = t.console.lines_starting_with("Fast value: ").len();

    // Many fast periods elapse while the lookup waits for input
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(fast.ticks_published(), frozen_ticks);
    assert_eq!(fast.latest(), frozen_value);
    assert_eq!(t.console.lines_starting_with("Fast value: ").len(), frozen_lines);

    let answer = pending.submit("123456789012").unwrap();
    assert!(!answer.is_found());
    assert_eq!(fast.state(), GeneratorState::Running);
    assert!(wait_until(Duration::from_secs(2), || {
        fast.ticks_published() > frozen_ticks
    }));
}

#[test]
fn missed_ticks_are_not_replayed() {
    let t = TestNetwork::running(4);
    let fast = t.network.fast();
    assert!(wait_until(Duration::from_secs(2), || fast.ticks_published() >= 1));

    let pending = t.network.begin_lookup().unwrap();
    let before = fast.ticks_published();
    // Twenty 5ms periods
    std::thread::sleep(Duration::from_millis(100));
    drop(pending);

    std::thread::sleep(Duration::from_millis(12));
    // A replay would publish about twenty values at once
    assert!(fast.ticks_published() - before <= 5);
}

#[test]
fn abandoned_lookup_resumes_stream() {
    let t = TestNetwork::running(5);
    {
        let _pending = t.network.begin_lookup().unwrap();
        assert!(matches!(t.network.begin_lookup(), Err(Error::LookupInProgress)));
    }
    assert_eq!(t.network.fast().state(), GeneratorState::Running);
    let before = t.network.fast().ticks_published();
    assert!(wait_until(Duration::from_secs(2), || {
        t.network.fast().ticks_published() > before
    }));
    assert!(t.network.begin_lookup().is_ok());
}

#[test]
fn captures_continue_while_generators_run() {
    let t = TestNetwork::running(6);
    assert!(wait_until(Duration::from_secs(2), || {
        t.network.slow_store().populated() >= 1 && t.network.fast().ticks_published() >= 1
    }));
    for _ in 0..5 {
        t.network.capture().unwrap();
        std::thread::sleep(Duration::from_millis(7));
    }
    assert_eq!(t.network.ledger().read_all().unwrap().len(), 5);

    t.network.shutdown();
    assert_eq!(t.network.fast().state(), GeneratorState::Stopped);
    assert_eq!(t.network.slow().state(), GeneratorState::Stopped);
    // Lookups still work against the stores after shutdown
    let last = t.network.ledger().read_all().unwrap().pop().unwrap();
    let answer = t.network.lookup(&last.record.captured.value.to_string()).unwrap();
    assert!(answer.is_found());
    assert_eq!(t.network.lookup_state(), LookupState::Idle);
}

#[test]
fn concurrent_captures_number_lines_without_gaps() {
    let t = TestNetwork::running(7);
    assert!(wait_until(Duration::from_secs(2), || {
        t.network.slow_store().populated() >= 1 && t.network.fast().ticks_published() >= 1
    }));

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..25 {
                    t.network.capture().unwrap();
                }
            });
        }
    });

    let numbers: Vec<u64> = t
        .network
        .ledger()
        .read_all()
        .unwrap()
        .iter()
        .map(|l| l.number)
        .collect();
    assert_eq!(numbers, (0..100).collect::<Vec<u64>>());
    assert_eq!(t.network.pairing_store().populated(), 7);
}
