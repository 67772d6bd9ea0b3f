//! Network configuration via `tasknet.toml`
//!
//! Every field has a default, so an empty file (or no file at all) runs the
//! network with its standard periods and capacities. Command-line flags
//! override file values.

use crate::dispatch::KeyMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tasknet_core::limits::{
    DEFAULT_FAST_PERIOD_MS, DEFAULT_PAIRING_CAPACITY, DEFAULT_SLOW_CAPACITY, DEFAULT_SLOW_LENGTH,
    DEFAULT_SLOW_PERIOD_MS,
};
use tasknet_core::{ClockKind, Error, Result};
use tasknet_durability::{LedgerConfig, LedgerMode};

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "tasknet.toml";

/// Network configuration loaded from `tasknet.toml`.
///
/// # Example
///
/// ```toml
/// fast_period_ms = 250
/// slow_period_ms = 5000
/// seed = 42
///
/// [ledger]
/// path = "E.txt"
/// mode = "append"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Fast stream period in milliseconds
    #[serde(default = "default_fast_period_ms")]
    pub fast_period_ms: u64,
    /// Slow stream period in milliseconds
    #[serde(default = "default_slow_period_ms")]
    pub slow_period_ms: u64,
    /// Length of every slow string
    #[serde(default = "default_slow_length")]
    pub slow_length: usize,
    /// Slots in the slow store
    #[serde(default = "default_slow_capacity")]
    pub slow_capacity: usize,
    /// Slots in the pairing store
    #[serde(default = "default_pairing_capacity")]
    pub pairing_capacity: usize,
    /// Master seed; absent means OS entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Timestamp source: `"ticks"` or `"wall"`
    #[serde(default)]
    pub clock: ClockKind,
    /// Ledger settings
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Command keys
    #[serde(default)]
    pub keys: KeyMap,
}

fn default_fast_period_ms() -> u64 {
    DEFAULT_FAST_PERIOD_MS
}

fn default_slow_period_ms() -> u64 {
    DEFAULT_SLOW_PERIOD_MS
}

fn default_slow_length() -> usize {
    DEFAULT_SLOW_LENGTH
}

fn default_slow_capacity() -> usize {
    DEFAULT_SLOW_CAPACITY
}

fn default_pairing_capacity() -> usize {
    DEFAULT_PAIRING_CAPACITY
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            fast_period_ms: default_fast_period_ms(),
            slow_period_ms: default_slow_period_ms(),
            slow_length: default_slow_length(),
            slow_capacity: default_slow_capacity(),
            pairing_capacity: default_pairing_capacity(),
            seed: None,
            clock: ClockKind::default(),
            ledger: LedgerConfig::default(),
            keys: KeyMap::default(),
        }
    }
}

impl NetworkConfig {
    /// Fast configuration for tests: 5ms/20ms periods, fixed seed, ledger
    /// at `ledger_path` without per-line sync.
    pub fn for_testing(ledger_path: impl AsRef<Path>) -> Self {
        Self {
            fast_period_ms: 5,
            slow_period_ms: 20,
            seed: Some(0),
            ledger: LedgerConfig::at(ledger_path.as_ref()).with_sync(false),
            ..Self::default()
        }
    }

    /// Fast stream period
    pub fn fast_period(&self) -> Duration {
        Duration::from_millis(self.fast_period_ms)
    }

    /// Slow stream period
    pub fn slow_period(&self) -> Duration {
        Duration::from_millis(self.slow_period_ms)
    }

    /// Set the master seed (builder pattern).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set both periods in milliseconds (builder pattern).
    pub fn with_periods(mut self, fast_ms: u64, slow_ms: u64) -> Self {
        self.fast_period_ms = fast_ms;
        self.slow_period_ms = slow_ms;
        self
    }

    /// Set the ledger file (builder pattern).
    pub fn with_ledger_path(mut self, path: impl AsRef<Path>) -> Self {
        self.ledger.path = path.as_ref().to_path_buf();
        self
    }

    /// Set the ledger mode (builder pattern).
    pub fn with_ledger_mode(mut self, mode: LedgerMode) -> Self {
        self.ledger.mode = mode;
        self
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.fast_period_ms == 0 {
            return Err(Error::invalid_config("fast_period_ms must be positive"));
        }
        if self.slow_period_ms == 0 {
            return Err(Error::invalid_config("slow_period_ms must be positive"));
        }
        if self.slow_length == 0 {
            return Err(Error::invalid_config("slow_length must be positive"));
        }
        if self.slow_capacity == 0 {
            return Err(Error::invalid_config("slow_capacity must be positive"));
        }
        if self.pairing_capacity == 0 {
            return Err(Error::invalid_config("pairing_capacity must be positive"));
        }
        self.ledger.validate()?;
        self.keys.validate()
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# tasknet configuration
#
# Fast stream: a 12-digit number every fast_period_ms
fast_period_ms = 250

# Slow stream: a slow_length alphanumeric string every slow_period_ms
slow_period_ms = 5000
slow_length = 8

# Store sizes
slow_capacity = 5
pairing_capacity = 7

# Master seed for reproducible runs. Omit for OS entropy.
# seed = 42

# Timestamps: "ticks" (ms since start, default) or "wall" (ms since epoch)
clock = "ticks"

[ledger]
path = "E.txt"
# "truncate" (default) replaces a previous run's file on the first capture
# "append" continues its numbering
mode = "truncate"
sync = true

[keys]
capture = "c"
lookup = "g"
quit = "q"
"#
    }

    /// Parse and validate config text.
    ///
    /// # Errors
    ///
    /// `ConfigParse` for malformed TOML, `InvalidConfiguration` for values
    /// that fail validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: NetworkConfig =
            toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigParse(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::ConfigParse(msg) => Error::ConfigParse(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                msg
            )),
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }
}
