//! Capture and lookup through the assembled network.

use crate::common::*;
use std::sync::Arc;
use tasknet::{
    CaptureCoordinator, LedgerConfig, LookupCoordinator, LookupOutcome, PairingStore,
    PeriodicGenerator, Producer, RandomSource, RecordLedger, SlowStore,
};
use tempfile::TempDir;

/// Always produces the same fast value.
struct Fixed(FastValue);

impl Producer for Fixed {
    type Output = FastValue;

    fn produce(&mut self, _now: Tick) -> FastValue {
        self.0
    }
}

#[test]
fn pairing_is_recorded_and_found() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::at(0));
    let fast = Arc::new(
        PeriodicGenerator::new(
            "fast",
            std::time::Duration::from_millis(250),
            Fixed(FastValue::new(123_456_789_012)),
            clock.clone(),
            Vec::new(),
        )
        .unwrap(),
    );
    let slow_store = Arc::new(SlowStore::new("slow", 5, RandomSource::from_seed(1)).unwrap());
    let pairing_store = Arc::new(PairingStore::new("pairing", 7, RandomSource::from_seed(2)).unwrap());
    let ledger = Arc::new(RecordLedger::open(LedgerConfig::at(dir.path().join("E.txt"))).unwrap());

    let capture = CaptureCoordinator::new(
        fast.clone(),
        slow_store.clone(),
        pairing_store.clone(),
        ledger.clone(),
        clock.clone(),
    );
    let lookup = LookupCoordinator::new(fast.clone(), pairing_store.clone());

    // Only one slow value, so the random pick is forced
    slow_store.insert(SlowValue::new("XyZ98765", Tick::from_millis(5)));
    fast.tick();
    clock.set(10);

    let outcome = capture.capture().unwrap();
    assert_eq!(outcome.line.to_string(), "Line 0: 5 XyZ98765 10 123456789012");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("E.txt")).unwrap(),
        "Line 0: 5 XyZ98765 10 123456789012\n"
    );

    match lookup.lookup("123456789012").unwrap() {
        LookupOutcome::Found { record, slot, .. } => {
            assert_eq!(slot, outcome.pairing_slot);
            assert_eq!(record.slow.text, "XyZ98765");
            assert_eq!(record.slow.generated_at, Tick::from_millis(5));
        }
        other => panic!("expected a match, got {:?}", other),
    }
}

#[test]
fn empty_slow_store_then_first_value_always_picked() {
    let t = TestNetwork::stepped(5);
    t.fast_tick_at(1);
    assert!(matches!(t.network.capture(), Err(Error::NoSlowValueAvailable)));

    let slow = t.slow_tick_at(100);
    for i in 0..10 {
        t.fast_tick_at(200 + i);
        assert_eq!(t.network.capture().unwrap().record.slow, slow);
    }
}

#[test]
fn every_capture_adds_exactly_one_line() {
    let t = TestNetwork::stepped(11);
    t.slow_tick_at(0);
    for i in 0..20u64 {
        t.fast_tick_at(10 * i + 1);
        let before = t.network.ledger().next_line();
        let outcome = t.network.capture().unwrap();
        assert_eq!(outcome.line.number, before);
        assert_eq!(t.network.ledger().next_line(), before + 1);
    }
    assert_eq!(t.ledger_text().lines().count(), 20);
}

#[test]
fn captured_values_findable_while_present() {
    let t = TestNetwork::stepped(17);
    for i in 0..30u64 {
        if i % 5 == 0 {
            t.slow_tick_at(1_000 * i);
        }
        let value = t.fast_tick_at(1_000 * i + 250);
        let outcome = t.network.capture().unwrap();

        // Everything still held by the pairing store must be findable
        for record in t.network.pairing_store().snapshot().into_iter().flatten() {
            let answer = t.network.lookup(&record.captured.value.to_string()).unwrap();
            assert!(answer.is_found());
        }
        let own = t.network.lookup(&value.to_string()).unwrap();
        assert_eq!(own.record(), Some(&outcome.record));
    }
}

#[test]
fn never_captured_value_not_found() {
    let t = TestNetwork::stepped(23);
    t.slow_tick_at(0);
    let mut captured = Vec::new();
    for i in 0..10u64 {
        captured.push(t.fast_tick_at(i + 1));
        t.network.capture().unwrap();
    }
    // Below the 12-digit range, so never generated
    for query in ["0", "42", "99999999999"] {
        let answer = t.network.lookup(query).unwrap();
        assert!(!answer.is_found(), "found {}", query);
        assert!(answer.to_string().contains(query));
    }
    assert!(captured.iter().all(|v| v.is_in_range()));
}

#[test]
fn malformed_query_keeps_network_running() {
    let t = TestNetwork::stepped(29);
    let err = t.network.lookup("not a number").unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(err.is_recoverable());
    // Fast generator resumed: ticks publish again
    assert!(t.network.fast().tick().is_some());
}
