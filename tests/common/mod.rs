//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
pub use tasknet::{
    Error, FastValue, InputEvent, LedgerLine, LedgerMode, ManualClock, NetworkConfig,
    RecordingConsole, ScriptedEventSource, SlowValue, TaskNetwork, Tick,
};
use tempfile::TempDir;

// ============================================================================
// TestNetwork - network wired to a recording console in a temp dir
// ============================================================================

/// A network plus everything a test needs to observe it.
pub struct TestNetwork {
    pub network: TaskNetwork,
    pub console: Arc<RecordingConsole>,
    pub clock: Arc<ManualClock>,
    pub dir: TempDir,
}

impl TestNetwork {
    /// Build without threads, on a manual clock at 0.
    pub fn stepped(seed: u64) -> Self {
        Self::stepped_with(|config| config.with_seed(seed))
    }

    /// Build without threads after adjusting the test config.
    pub fn stepped_with(adjust: impl FnOnce(NetworkConfig) -> NetworkConfig) -> Self {
        let dir = TempDir::new().unwrap();
        let console = Arc::new(RecordingConsole::new());
        let clock = Arc::new(ManualClock::at(0));
        let config = adjust(NetworkConfig::for_testing(dir.path().join("E.txt")));
        let network = TaskNetwork::builder(config)
            .console(console.clone())
            .clock(clock.clone())
            .build()
            .unwrap();
        TestNetwork {
            network,
            console,
            clock,
            dir,
        }
    }

    /// Start both generator threads on the test periods.
    pub fn running(seed: u64) -> Self {
        let dir = TempDir::new().unwrap();
        let console = Arc::new(RecordingConsole::new());
        let config = NetworkConfig::for_testing(dir.path().join("E.txt")).with_seed(seed);
        let network = TaskNetwork::start(config, console.clone()).unwrap();
        TestNetwork {
            network,
            console,
            // Unused by a started network, which runs on its own clock
            clock: Arc::new(ManualClock::at(0)),
            dir,
        }
    }

    /// Ledger file path
    pub fn ledger_path(&self) -> PathBuf {
        self.dir.path().join("E.txt")
    }

    /// Ledger file contents
    pub fn ledger_text(&self) -> String {
        std::fs::read_to_string(self.ledger_path()).unwrap_or_default()
    }

    /// Tick the slow generator at `tick`, returning the stored value.
    pub fn slow_tick_at(&self, tick: u64) -> SlowValue {
        self.clock.set(tick);
        self.network.slow().tick().unwrap()
    }

    /// Tick the fast generator at `tick`, returning the published value.
    pub fn fast_tick_at(&self, tick: u64) -> FastValue {
        self.clock.set(tick);
        self.network.fast().tick().unwrap()
    }
}

/// Poll `condition` every millisecond until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}
