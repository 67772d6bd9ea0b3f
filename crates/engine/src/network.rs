//! Network bootstrap
//!
//! [`TaskNetwork`] owns every component: both generators, both stores, the
//! ledger and the two coordinators. [`NetworkBuilder`] wires them from a
//! [`NetworkConfig`].
//!
//! # Two Ways to Run a Network
//!
//! ```ignore
//! use tasknet_engine::{NetworkConfig, StdoutConsole, TaskNetwork};
//!
//! // 1. Start both generator threads right away
//! let network = TaskNetwork::start(NetworkConfig::default(), Arc::new(StdoutConsole))?;
//!
//! // 2. Build without threads and step the generators by hand
//! let network = TaskNetwork::builder(config).clock(clock).build()?;
//! network.fast().tick();
//! ```
//!
//! ## Random streams
//!
//! One master source (seeded or from entropy) derives an independent stream
//! per component: fast producer, slow producer, slow store, pairing store.

use crate::capture::{CaptureCoordinator, CaptureOutcome};
use crate::config::NetworkConfig;
use crate::console::{Console, StdoutConsole};
use crate::dispatch::{DispatchStats, EventDispatcher, EventSource};
use crate::lookup::{LookupCoordinator, LookupOutcome, LookupState, PendingLookup};
use crate::observer::{ConsoleEmitter, GeneratorObserver, StoreInserter};
use crate::producers::{
    FastGenerator, FastProducer, PairingStore, SlowGenerator, SlowProducer, SlowStore,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tasknet_core::{Clock, FastValue, RandomSource, Result, SlowValue};
use tasknet_durability::RecordLedger;
use tracing::info;

const FAST_STREAM: u64 = 0;
const SLOW_STREAM: u64 = 1;
const SLOW_STORE_STREAM: u64 = 2;
const PAIRING_STORE_STREAM: u64 = 3;

/// Builder for a [`TaskNetwork`].
pub struct NetworkBuilder {
    config: NetworkConfig,
    console: Option<Arc<dyn Console>>,
    clock: Option<Arc<dyn Clock>>,
}

impl NetworkBuilder {
    /// Start from `config`
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            console: None,
            clock: None,
        }
    }

    /// Send user-visible output to `console` instead of stdout
    pub fn console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = Some(console);
        self
    }

    /// Use `clock` instead of the one named by the config
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Wire every component without starting any thread.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the config does not validate, or the
    /// ledger's errors if it cannot be opened.
    pub fn build(self) -> Result<TaskNetwork> {
        let config = self.config;
        config.validate()?;

        let console = self.console.unwrap_or_else(|| Arc::new(StdoutConsole));
        let clock = self.clock.unwrap_or_else(|| config.clock.build());

        let mut master = match config.seed {
            Some(seed) => RandomSource::from_seed(seed),
            None => RandomSource::from_entropy(),
        };

        let slow_store = Arc::new(SlowStore::new(
            "slow",
            config.slow_capacity,
            master.derive(SLOW_STORE_STREAM),
        )?);
        let pairing_store = Arc::new(PairingStore::new(
            "pairing",
            config.pairing_capacity,
            master.derive(PAIRING_STORE_STREAM),
        )?);
        let ledger = Arc::new(RecordLedger::open(config.ledger.clone())?);

        let fast_observers: Vec<Box<dyn GeneratorObserver<FastValue>>> =
            vec![Box::new(ConsoleEmitter::new(console.clone(), "Fast value"))];
        let fast = Arc::new(FastGenerator::new(
            "fast",
            config.fast_period(),
            FastProducer::new(master.derive(FAST_STREAM)),
            clock.clone(),
            fast_observers,
        )?);

        let slow_observers: Vec<Box<dyn GeneratorObserver<SlowValue>>> =
            vec![Box::new(StoreInserter::new(slow_store.clone()))];
        let slow = Arc::new(SlowGenerator::new(
            "slow",
            config.slow_period(),
            SlowProducer::new(config.slow_length, master.derive(SLOW_STREAM))?,
            clock.clone(),
            slow_observers,
        )?);

        let capture = Arc::new(CaptureCoordinator::new(
            fast.clone(),
            slow_store.clone(),
            pairing_store.clone(),
            ledger.clone(),
            clock.clone(),
        ));
        let lookup = Arc::new(LookupCoordinator::new(fast.clone(), pairing_store.clone()));

        Ok(TaskNetwork {
            config,
            clock,
            console,
            fast,
            slow,
            slow_store,
            pairing_store,
            ledger,
            capture,
            lookup,
            stopped: AtomicBool::new(false),
        })
    }

    /// Build, then start both generator threads.
    pub fn start(self) -> Result<TaskNetwork> {
        let network = self.build()?;
        network.slow.spawn()?;
        network.fast.spawn()?;
        info!(
            target: "tasknet::network",
            fast_period_ms = network.config.fast_period_ms,
            slow_period_ms = network.config.slow_period_ms,
            ledger = ?network.config.ledger.path,
            "Network started"
        );
        Ok(network)
    }
}

/// A running (or buildable) task network.
pub struct TaskNetwork {
    config: NetworkConfig,
    clock: Arc<dyn Clock>,
    console: Arc<dyn Console>,
    fast: Arc<FastGenerator>,
    slow: Arc<SlowGenerator>,
    slow_store: Arc<SlowStore>,
    pairing_store: Arc<PairingStore>,
    ledger: Arc<RecordLedger>,
    capture: Arc<CaptureCoordinator>,
    lookup: Arc<LookupCoordinator>,
    stopped: AtomicBool,
}

impl TaskNetwork {
    /// Builder for custom wiring
    pub fn builder(config: NetworkConfig) -> NetworkBuilder {
        NetworkBuilder::new(config)
    }

    /// Validate `config`, wire everything and start both generators.
    pub fn start(config: NetworkConfig, console: Arc<dyn Console>) -> Result<Self> {
        NetworkBuilder::new(config).console(console).start()
    }

    /// Configuration the network was built from
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Timestamp source shared by every component
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Fast stream generator
    pub fn fast(&self) -> &Arc<FastGenerator> {
        &self.fast
    }

    /// Slow stream generator
    pub fn slow(&self) -> &Arc<SlowGenerator> {
        &self.slow
    }

    /// Slow values awaiting pairing
    pub fn slow_store(&self) -> &Arc<SlowStore> {
        &self.slow_store
    }

    /// Recent pairings
    pub fn pairing_store(&self) -> &Arc<PairingStore> {
        &self.pairing_store
    }

    /// Pairing ledger
    pub fn ledger(&self) -> &Arc<RecordLedger> {
        &self.ledger
    }

    /// Handle one capture event
    pub fn capture(&self) -> Result<CaptureOutcome> {
        self.capture.capture()
    }

    /// Suspend the fast stream and wait for a query
    pub fn begin_lookup(&self) -> Result<PendingLookup<'_>> {
        self.lookup.begin()
    }

    /// Where the lookup protocol currently is
    pub fn lookup_state(&self) -> LookupState {
        self.lookup.state()
    }

    /// Run a complete lookup for `raw`
    pub fn lookup(&self, raw: &str) -> Result<LookupOutcome> {
        self.lookup.lookup(raw)
    }

    /// Dispatcher routing events to this network's coordinators
    pub fn dispatcher(&self) -> EventDispatcher {
        EventDispatcher::new(
            self.capture.clone(),
            self.lookup.clone(),
            self.console.clone(),
        )
    }

    /// Dispatch events from `source` until it quits or runs dry
    pub fn run(&self, source: &mut dyn EventSource) -> DispatchStats {
        self.dispatcher().run(source)
    }

    /// Whether [`shutdown`](Self::shutdown) has been called
    pub fn is_shut_down(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Stop both generators and wait for their threads.
    ///
    /// Idempotent. Stores and ledger stay readable.
    pub fn shutdown(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        self.fast.shutdown();
        self.slow.shutdown();
        info!(
            target: "tasknet::network",
            fast_ticks = self.fast.ticks_published(),
            slow_ticks = self.slow.ticks_published(),
            ledger_lines = self.ledger.next_line(),
            "Network stopped"
        );
    }
}

impl Drop for TaskNetwork {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::RecordingConsole;
    use crate::generator::GeneratorState;
    use tasknet_core::{Error, ManualClock};
    use tempfile::TempDir;

    fn built(dir: &TempDir, seed: u64) -> (TaskNetwork, Arc<RecordingConsole>, Arc<ManualClock>) {
        let console = Arc::new(RecordingConsole::new());
        let clock = Arc::new(ManualClock::at(0));
        let network = TaskNetwork::builder(
            NetworkConfig::for_testing(dir.path().join("E.txt")).with_seed(seed),
        )
        .console(console.clone())
        .clock(clock.clone())
        .build()
        .unwrap();
        (network, console, clock)
    }

    #[test]
    fn test_invalid_config_aborts_build() {
        let dir = TempDir::new().unwrap();
        let config = NetworkConfig {
            pairing_capacity: 0,
            ..NetworkConfig::for_testing(dir.path().join("E.txt"))
        };
        assert!(matches!(
            TaskNetwork::builder(config).build(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_manual_ticks_drive_the_network() {
        let dir = TempDir::new().unwrap();
        let (network, console, clock) = built(&dir, 1);
        assert_eq!(network.slow_store().capacity(), 5);
        assert_eq!(network.pairing_store().capacity(), 7);

        assert!(matches!(network.capture(), Err(Error::NoFastValueAvailable)));

        let fast = network.fast().tick().unwrap();
        assert_eq!(console.lines(), vec![format!("Fast value: {}", fast)]);
        assert!(matches!(network.capture(), Err(Error::NoSlowValueAvailable)));

        clock.set(20);
        let slow = network.slow().tick().unwrap();
        assert_eq!(network.slow_store().populated(), 1);

        clock.set(30);
        let outcome = network.capture().unwrap();
        assert_eq!(outcome.record.slow, slow);
        assert_eq!(outcome.record.captured.value, fast);
        assert_eq!(outcome.line.number, 0);

        let found = network.lookup(&fast.to_string()).unwrap();
        assert_eq!(found.record(), Some(&outcome.record));
        assert_eq!(network.fast().state(), GeneratorState::Running);
    }

    #[test]
    fn test_same_seed_same_values() {
        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();
        let (a, _, _) = built(&dir_a, 99);
        let (b, _, _) = built(&dir_b, 99);
        for _ in 0..5 {
            assert_eq!(a.fast().tick(), b.fast().tick());
            assert_eq!(a.slow().tick(), b.slow().tick());
        }
    }

    #[test]
    fn test_start_and_shutdown() {
        let dir = TempDir::new().unwrap();
        let console = Arc::new(RecordingConsole::new());
        let network =
            TaskNetwork::start(NetworkConfig::for_testing(dir.path().join("E.txt")), console.clone())
                .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(60));
        network.shutdown();
        assert!(network.is_shut_down());
        assert_eq!(network.fast().state(), GeneratorState::Stopped);
        assert!(network.fast().ticks_published() >= 2);
        assert!(network.slow_store().populated() >= 1);
        assert!(!console.lines_starting_with("Fast value: ").is_empty());
        network.shutdown();
    }
}
