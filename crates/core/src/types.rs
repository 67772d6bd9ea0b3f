//! Values produced and paired by the network
//!
//! - `FastValue`: the 12-digit number regenerated every fast period
//! - `SlowValue`: an alphanumeric string and the tick it was generated at
//! - `CapturedFastValue`: a fast value snapshotted by a capture event
//! - `PairingRecord`: a slow value paired with a captured fast value
//!
//! Captured values and pairing records are immutable once created.

use crate::clock::Tick;
use crate::error::{Error, Result};
use crate::limits::{FAST_VALUE_MAX, FAST_VALUE_MIN};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 12-digit number from the fast stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FastValue(u64);

impl FastValue {
    /// Wrap a raw value
    pub const fn new(value: u64) -> Self {
        FastValue(value)
    }

    /// The raw number
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Whether the value lies in the generator's 12-digit range
    pub fn is_in_range(&self) -> bool {
        (FAST_VALUE_MIN..=FAST_VALUE_MAX).contains(&self.0)
    }
}

impl fmt::Display for FastValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FastValue {
    type Err = Error;

    /// Parse a decimal query. Surrounding whitespace is ignored; anything
    /// else that is not an unsigned integer is `InvalidInput`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        trimmed
            .parse::<u64>()
            .map(FastValue)
            .map_err(|_| Error::invalid_input(format!("'{}' is not a 12-digit number", trimmed)))
    }
}

impl From<u64> for FastValue {
    fn from(value: u64) -> Self {
        FastValue(value)
    }
}

/// An alphanumeric string paired with its generation tick.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlowValue {
    /// Generated string
    pub text: String,
    /// When it was generated
    pub generated_at: Tick,
}

impl SlowValue {
    /// Create a slow value
    pub fn new(text: impl Into<String>, generated_at: Tick) -> Self {
        SlowValue {
            text: text.into(),
            generated_at,
        }
    }
}

impl fmt::Display for SlowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.generated_at, self.text)
    }
}

/// Snapshot of the fast stream taken by a capture event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapturedFastValue {
    /// Fast value current at capture time
    pub value: FastValue,
    /// When the capture happened
    pub captured_at: Tick,
}

impl CapturedFastValue {
    /// Create a snapshot
    pub fn new(value: FastValue, captured_at: Tick) -> Self {
        CapturedFastValue { value, captured_at }
    }
}

impl fmt::Display for CapturedFastValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.captured_at, self.value)
    }
}

/// A slow value paired with a captured fast value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairingRecord {
    /// Slow value picked at random from the slow store
    pub slow: SlowValue,
    /// Fast value captured by the event
    pub captured: CapturedFastValue,
}

impl PairingRecord {
    /// Pair a slow value with a captured fast value
    pub fn new(slow: SlowValue, captured: CapturedFastValue) -> Self {
        PairingRecord { slow, captured }
    }

    /// Whether this record was captured with `value`
    pub fn matches(&self, value: FastValue) -> bool {
        self.captured.value == value
    }
}

impl fmt::Display for PairingRecord {
    /// `<slowTick> <slowText> <captureTick> <fastValue>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.slow, self.captured)
    }
}
