//! Durability layer for tasknet
//!
//! This crate handles everything that touches disk:
//!
//! - Ledger: append-only, line-numbered record of every pairing captured
//! - Ledger modes: Truncate (default, a new run replaces the old file) or Append
//! - Line format: `Line <n>: <slowTick> <slowText> <captureTick> <fastValue>`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ledger;
pub mod line;
pub mod mode;

pub use ledger::{read_lines, LedgerConfig, RecordLedger};
pub use line::LedgerLine;
pub use mode::LedgerMode;
