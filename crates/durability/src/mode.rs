//! Ledger open mode
//!
//! Controls what happens to a ledger file left behind by a previous run.

use serde::{Deserialize, Serialize};

/// What the first write of a run does to an existing ledger file
///
/// | Mode | Existing file | First line number |
/// |------|---------------|-------------------|
/// | Truncate | Replaced on first write | 0 |
/// | Append | Kept | One past the last existing line |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerMode {
    /// Replace the previous run's ledger at the first write (the default)
    #[default]
    Truncate,

    /// Continue the previous run's ledger and its numbering
    Append,
}

impl LedgerMode {
    /// Human-readable description of the mode
    pub fn description(&self) -> &'static str {
        match self {
            LedgerMode::Truncate => "Truncate (each run starts a fresh ledger)",
            LedgerMode::Append => "Append (ledger survives restarts)",
        }
    }
}
