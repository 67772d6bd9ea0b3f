//! Core types for tasknet
//!
//! This crate defines the foundational types used throughout the system:
//! - Error: Error type hierarchy
//! - RandomSource: seedable uniform integers, alphanumeric strings, fast values
//! - Tick / Clock: millisecond timestamps and the clocks producing them
//! - FastValue, SlowValue, CapturedFastValue, PairingRecord: the data model
//! - Limits: value ranges and default sizes

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod error;
pub mod limits;
pub mod random;
pub mod types;

pub use clock::{Clock, ClockKind, ManualClock, Tick, TickClock, WallClock};
pub use error::{Error, Result};
pub use random::{fast_value_from_draws, RandomSource};
pub use types::{CapturedFastValue, FastValue, PairingRecord, SlowValue};
