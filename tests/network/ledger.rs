//! Ledger behavior across network runs.

use crate::common::*;
use tasknet::read_lines;

fn capture_n(t: &TestNetwork, n: u64) {
    t.slow_tick_at(0);
    for i in 0..n {
        t.fast_tick_at(i + 1);
        t.network.capture().unwrap();
    }
}

#[test]
fn ledger_lines_parse_back() {
    let t = TestNetwork::stepped(51);
    capture_n(&t, 4);
    let lines = read_lines(&t.ledger_path()).unwrap();
    assert_eq!(lines, t.network.ledger().read_all().unwrap());
    let numbers: Vec<u64> = lines.iter().map(|l| l.number).collect();
    assert_eq!(numbers, vec![0, 1, 2, 3]);
    for line in &lines {
        assert!(line.record.captured.value.is_in_range());
        assert_eq!(line.record.slow.text.len(), 8);
    }
}

#[test]
fn new_run_replaces_previous_ledger() {
    let first = TestNetwork::stepped(53);
    capture_n(&first, 3);
    let path = first.ledger_path();
    let dir = first.dir;
    drop(first.network);

    let config = NetworkConfig::for_testing(&path).with_seed(54);
    let second = TaskNetwork::builder(config)
        .clock(first.clock.clone())
        .console(first.console.clone())
        .build()
        .unwrap();
    second.slow().tick();
    second.fast().tick();
    assert_eq!(second.capture().unwrap().line.number, 0);
    assert_eq!(read_lines(&path).unwrap().len(), 1);
    drop(dir);
}

#[test]
fn append_mode_continues_numbering() {
    let first = TestNetwork::stepped(55);
    capture_n(&first, 3);
    let path = first.ledger_path();

    let config = NetworkConfig::for_testing(&path)
        .with_seed(56)
        .with_ledger_mode(LedgerMode::Append);
    let second = TaskNetwork::builder(config)
        .clock(first.clock.clone())
        .console(first.console.clone())
        .build()
        .unwrap();
    second.slow().tick();
    second.fast().tick();
    assert_eq!(second.capture().unwrap().line.number, 3);

    let lines: Vec<LedgerLine> = read_lines(&path).unwrap();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[3].number, 3);
}
