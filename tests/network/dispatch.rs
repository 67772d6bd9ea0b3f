//! Event dispatch against a stepped network.

use crate::common::*;
use std::io::Cursor;
use tasknet::{DispatchStats, KeyMap, LineEventSource, LOOKUP_PROMPT};

#[test]
fn scripted_session() {
    let t = TestNetwork::stepped(31);
    t.slow_tick_at(5);
    let value = t.fast_tick_at(10);

    let mut source = ScriptedEventSource::new(vec![
        InputEvent::Capture,
        InputEvent::LookupRequest,
        InputEvent::LookupQuery(value.to_string()),
        InputEvent::LookupRequest,
        InputEvent::LookupQuery("abc".into()),
        InputEvent::Unrecognized("x".into()),
        InputEvent::Quit,
        InputEvent::Capture,
    ]);
    let stats = t.network.run(&mut source);

    assert_eq!(
        stats,
        DispatchStats {
            captures: 1,
            capture_failures: 0,
            lookups: 1,
            lookups_found: 1,
            lookup_failures: 1,
            unrecognized: 1,
        }
    );
    // Quit stops before the trailing capture
    assert_eq!(source.remaining(), 1);
    assert_eq!(t.network.ledger().next_line(), 1);

    assert!(t.console.contains("Captured: Line 0: "));
    assert_eq!(t.console.lines_starting_with(LOOKUP_PROMPT).len(), 2);
    assert!(t.console.contains(&format!("Value {} found", value)));
    assert!(t.console.contains("Invalid query"));
}

#[test]
fn capture_errors_reported_not_fatal() {
    let t = TestNetwork::stepped(37);
    let mut source = ScriptedEventSource::new(vec![InputEvent::Capture, InputEvent::Capture]);
    let stats = t.network.run(&mut source);
    assert_eq!(stats.capture_failures, 2);
    assert_eq!(t.console.lines_starting_with("Capture failed").len(), 2);
    assert_eq!(t.network.ledger().next_line(), 0);
}

#[test]
fn interrupted_lookup_is_cancelled() {
    let t = TestNetwork::stepped(41);
    t.slow_tick_at(1);
    t.fast_tick_at(2);
    let mut source = ScriptedEventSource::new(vec![InputEvent::LookupRequest, InputEvent::Capture]);
    let stats = t.network.run(&mut source);

    assert_eq!(stats.lookup_failures, 1);
    assert_eq!(stats.captures, 1);
    assert!(t.console.contains("Lookup cancelled"));
    assert!(t.network.fast().tick().is_some());
}

#[test]
fn keyboard_lines_drive_the_network() {
    let t = TestNetwork::stepped(43);
    t.slow_tick_at(5);
    let value = t.fast_tick_at(10);

    let input = format!("c\nG\n{}\nz\nq\nc\n", value);
    let mut source = LineEventSource::new(Cursor::new(input), KeyMap::default());
    let stats = t.network.run(&mut source);

    assert_eq!(stats.captures, 1);
    assert_eq!(stats.lookups_found, 1);
    assert_eq!(stats.unrecognized, 1);
    assert_eq!(t.ledger_text().lines().count(), 1);
}

#[test]
fn end_of_input_stops_dispatch() {
    let t = TestNetwork::stepped(47);
    let mut source = LineEventSource::new(Cursor::new("g\n"), KeyMap::default());
    let stats = t.network.run(&mut source);
    // The prompt was shown, then input ran out before the query
    assert_eq!(stats.lookups, 0);
    assert_eq!(t.console.lines_starting_with(LOOKUP_PROMPT).len(), 1);
    assert!(t.network.fast().tick().is_some());
}
