//! Ledger line format
//!
//! One line per pairing, fields in fixed order:
//!
//! ```text
//! Line <n>: <slowTick> <slowText> <captureTick> <fastValue>
//! ```
//!
//! Slow values are alphanumeric, so whitespace splitting is unambiguous.

use std::fmt;
use std::str::FromStr;
use tasknet_core::{CapturedFastValue, Error, FastValue, PairingRecord, Result, SlowValue, Tick};

const PREFIX: &str = "Line ";

/// A numbered ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerLine {
    /// Zero-based, gap-free line number
    pub number: u64,
    /// The pairing recorded on this line
    pub record: PairingRecord,
}

impl LedgerLine {
    /// Create a ledger line
    pub fn new(number: u64, record: PairingRecord) -> Self {
        LedgerLine { number, record }
    }
}

impl fmt::Display for LedgerLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}: {}", PREFIX, self.number, self.record)
    }
}

impl FromStr for LedgerLine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::invalid_input(format!("malformed ledger line '{}'", s));

        let rest = s.trim_end().strip_prefix(PREFIX).ok_or_else(malformed)?;
        let (number, body) = rest.split_once(": ").ok_or_else(malformed)?;
        let number: u64 = number.parse().map_err(|_| malformed())?;

        let fields: Vec<&str> = body.split_whitespace().collect();
        let [slow_tick, slow_text, capture_tick, fast] = fields.as_slice() else {
            return Err(malformed());
        };

        let slow_tick: u64 = slow_tick.parse().map_err(|_| malformed())?;
        let capture_tick: u64 = capture_tick.parse().map_err(|_| malformed())?;
        let fast: FastValue = fast.parse().map_err(|_| malformed())?;

        Ok(LedgerLine {
            number,
            record: PairingRecord::new(
                SlowValue::new(*slow_text, Tick::from_millis(slow_tick)),
                CapturedFastValue::new(fast, Tick::from_millis(capture_tick)),
            ),
        })
    }
}
