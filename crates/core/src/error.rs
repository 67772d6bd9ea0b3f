//! Error types for tasknet
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tasknet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the task network
#[derive(Debug, Error)]
pub enum Error {
    /// Construction-time misconfiguration (zero capacity, zero-length
    /// strings, zero periods, conflicting keys). Aborts startup.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Random pick from a store with no populated slots
    #[error("Store '{store}' has no populated slots")]
    Empty {
        /// Name of the store that was empty
        store: &'static str,
    },

    /// Capture attempted before the slow generator populated any slot
    #[error("No slow value available for pairing")]
    NoSlowValueAvailable,

    /// Capture attempted before the fast generator published its first value
    #[error("No fast value has been published yet")]
    NoFastValueAvailable,

    /// Unparseable lookup query or malformed ledger line
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A lookup was requested while another one is still awaiting input
    #[error("A lookup is already in progress")]
    LookupInProgress,

    /// The ledger could not be opened or written
    #[error("Persistence failure on {path:?}: {source}")]
    PersistenceFailure {
        /// Ledger file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// I/O error outside the ledger (config files, thread spawning)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidConfiguration`].
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }

    /// Shorthand for [`Error::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Whether the caller can keep running after this error.
    ///
    /// Configuration errors abort startup and persistence failures abort the
    /// capture that hit them. Everything else, plain I/O errors included, is
    /// reported and the network carries on.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Error::InvalidConfiguration(_)
                | Error::ConfigParse(_)
                | Error::PersistenceFailure { .. }
        )
    }
}
