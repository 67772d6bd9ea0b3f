//! Millisecond ticks and the clocks that produce them
//!
//! Every generated value carries the tick it was produced at. The default
//! clock counts milliseconds since the network started, the equivalent of
//! a scheduler tick counter. A wall clock and a manually driven clock are
//! provided for deployments that want absolute times and for tests.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Millisecond timestamp
///
/// ## Invariants
///
/// - Ticks are always non-negative (u64)
/// - Ticks from the same clock are monotonic, except for `WallClock`
///   which follows the system clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Tick(u64);

impl Tick {
    /// Tick zero
    pub const ZERO: Tick = Tick(0);

    /// Create a tick from milliseconds
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Tick(millis)
    }

    /// Milliseconds represented by this tick
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Tick {
    fn from(millis: u64) -> Self {
        Tick(millis)
    }
}

impl From<Tick> for u64 {
    fn from(tick: Tick) -> Self {
        tick.0
    }
}

/// Source of the current tick.
pub trait Clock: Send + Sync {
    /// Current tick
    fn now(&self) -> Tick;
}

/// Which clock a network uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockKind {
    /// Milliseconds since start
    #[default]
    Ticks,
    /// Milliseconds since Unix epoch
    Wall,
}

/// Milliseconds elapsed since construction.
#[derive(Debug, Clone)]
pub struct TickClock {
    start: Instant,
}

impl TickClock {
    /// Clock starting at tick zero now
    pub fn start() -> Self {
        TickClock {
            start: Instant::now(),
        }
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for TickClock {
    fn now(&self) -> Tick {
        Tick(self.start.elapsed().as_millis() as u64)
    }
}

/// Milliseconds since Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn now(&self) -> Tick {
        // Clamp pre-epoch system clocks to zero
        Tick(chrono::Utc::now().timestamp_millis().max(0) as u64)
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    /// Clock frozen at `tick`
    pub fn at(tick: u64) -> Self {
        ManualClock {
            millis: AtomicU64::new(tick),
        }
    }

    /// Jump to `tick`
    pub fn set(&self, tick: u64) {
        self.millis.store(tick, Ordering::Release);
    }

    /// Move forward by `millis`
    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Tick {
        Tick(self.millis.load(Ordering::Acquire))
    }
}

impl ClockKind {
    /// Build the clock this kind names.
    pub fn build(self) -> Arc<dyn Clock> {
        match self {
            ClockKind::Ticks => Arc::new(TickClock::start()),
            ClockKind::Wall => Arc::new(WallClock),
        }
    }
}
