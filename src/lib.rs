//! tasknet - a real-time task network
//!
//! Two periodic generators feed the network: a fast stream of 12-digit
//! numbers and a slow stream of alphanumeric strings. Capture events pair
//! the current fast value with a random recent slow value and append the
//! pairing to a numbered ledger. Lookup events pause the fast stream and
//! search recent pairings by captured value.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tasknet::{NetworkConfig, StdoutConsole, TaskNetwork};
//!
//! let network = TaskNetwork::start(NetworkConfig::default(), Arc::new(StdoutConsole))?;
//! let outcome = network.capture()?;
//! println!("{}", outcome.line);
//! let answer = network.lookup(&outcome.record.captured.value.to_string())?;
//! ```
//!
//! # Architecture
//!
//! `core` (types, errors, randomness, clocks) -> `concurrency` (stores,
//! latest-value cell) -> `durability` (ledger) -> `engine` (generators,
//! coordinators, dispatch, bootstrap). This crate re-exports the engine API
//! along with the types it traffics in.

pub use tasknet_concurrency::{BoundedRandomReplacementStore, Insertion, LatestValue};
pub use tasknet_core::{
    CapturedFastValue, Clock, ClockKind, Error, FastValue, ManualClock, PairingRecord,
    RandomSource, Result, SlowValue, Tick, TickClock, WallClock,
};
pub use tasknet_durability::{read_lines, LedgerConfig, LedgerLine, LedgerMode, RecordLedger};
pub use tasknet_engine::*;
