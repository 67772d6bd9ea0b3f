//! Append-only pairing ledger
//!
//! Every capture appends one numbered line. Appends are serialized behind a
//! single mutex covering the whole open-write-close sequence, so line
//! numbers are monotonic and gap-free and lines never interleave.
//!
//! A line number is consumed only once its line has been written. A failed
//! write is rolled back to the previous file length, leaves the counter
//! untouched, and the next successful append reuses the number. A line that
//! was written but could not be synced keeps its number.

use crate::line::LedgerLine;
use crate::mode::LedgerMode;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tasknet_core::{Error, PairingRecord, Result};
use tracing::{debug, error, info};

/// Ledger configuration, the `[ledger]` section of the network config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Ledger file
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// What to do with a file left by a previous run
    #[serde(default)]
    pub mode: LedgerMode,
    /// `sync_data` after every line
    #[serde(default = "default_sync")]
    pub sync: bool,
}

fn default_path() -> PathBuf {
    PathBuf::from("E.txt")
}

fn default_sync() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            path: default_path(),
            mode: LedgerMode::default(),
            sync: default_sync(),
        }
    }
}

impl LedgerConfig {
    /// Default configuration writing to `path`
    pub fn at(path: impl Into<PathBuf>) -> Self {
        LedgerConfig {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the mode (builder pattern).
    pub fn with_mode(mut self, mode: LedgerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set per-line syncing (builder pattern).
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::invalid_config("ledger path must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct LedgerState {
    /// Number the next successful append receives
    next_line: u64,
    /// Whether this ledger has written at least once
    started: bool,
}

/// Line-numbered, append-only record of every pairing.
#[derive(Debug)]
pub struct RecordLedger {
    config: LedgerConfig,
    state: Mutex<LedgerState>,
}

impl RecordLedger {
    /// Open a ledger.
    ///
    /// In `Truncate` mode nothing touches disk until the first append. In
    /// `Append` mode an existing file is read to continue its numbering.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for an empty path; `PersistenceFailure` or
    /// `InvalidInput` if an existing file cannot be read in `Append` mode.
    pub fn open(config: LedgerConfig) -> Result<Self> {
        config.validate()?;

        let next_line = match config.mode {
            LedgerMode::Truncate => 0,
            LedgerMode::Append => match read_lines(&config.path) {
                Ok(lines) => lines.last().map(|l| l.number + 1).unwrap_or(0),
                Err(Error::PersistenceFailure { source, .. })
                    if source.kind() == io::ErrorKind::NotFound =>
                {
                    0
                }
                Err(e) => return Err(e),
            },
        };

        info!(
            target: "tasknet::ledger",
            path = ?config.path,
            mode = config.mode.description(),
            next_line,
            "Ledger opened"
        );

        Ok(RecordLedger {
            config,
            state: Mutex::new(LedgerState {
                next_line,
                started: false,
            }),
        })
    }

    /// Ledger file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Ledger mode
    pub fn mode(&self) -> LedgerMode {
        self.config.mode
    }

    /// Number the next append will receive
    pub fn next_line(&self) -> u64 {
        self.state.lock().next_line
    }

    /// Append `record` as the next numbered line.
    ///
    /// # Errors
    ///
    /// `PersistenceFailure` if the file cannot be opened, written or synced.
    /// An unwritten line does not consume its number. A line that reached
    /// the file but failed to sync does.
    pub fn append(&self, record: &PairingRecord) -> Result<LedgerLine> {
        let mut state = self.state.lock();

        let truncate = !state.started && self.config.mode == LedgerMode::Truncate;
        let line = LedgerLine::new(state.next_line, record.clone());

        match self.write_line(&line, truncate) {
            Ok(()) => {}
            Err(WriteFailure::NotWritten(source)) => {
                error!(
                    target: "tasknet::ledger",
                    path = ?self.config.path,
                    line = line.number,
                    error = %source,
                    "Ledger write failed"
                );
                return Err(Error::PersistenceFailure {
                    path: self.config.path.clone(),
                    source,
                });
            }
            Err(WriteFailure::Unsynced(source)) => {
                state.started = true;
                state.next_line += 1;
                error!(
                    target: "tasknet::ledger",
                    path = ?self.config.path,
                    line = line.number,
                    error = %source,
                    "Ledger line written but not synced"
                );
                return Err(Error::PersistenceFailure {
                    path: self.config.path.clone(),
                    source,
                });
            }
        }

        if truncate {
            info!(target: "tasknet::ledger", path = ?self.config.path, "Previous ledger replaced");
        }
        state.started = true;
        state.next_line += 1;
        debug!(target: "tasknet::ledger", line = line.number, record = %line.record, "Ledger line written");
        Ok(line)
    }

    /// Every line written by this ledger, in order.
    ///
    /// In `Truncate` mode a file left by a previous run is not part of this
    /// ledger until the first append replaces it, so it reads as empty.
    pub fn read_all(&self) -> Result<Vec<LedgerLine>> {
        // Hold the lock so a concurrent append cannot be half visible
        let state = self.state.lock();
        if !state.started && self.config.mode == LedgerMode::Truncate {
            return Ok(Vec::new());
        }
        match read_lines(&self.config.path) {
            Err(Error::PersistenceFailure { source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn write_line(&self, line: &LedgerLine, truncate: bool) -> WriteResult {
        let mut options = OpenOptions::new();
        options.create(true);
        if truncate {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }
        let mut file: File = options
            .open(&self.config.path)
            .map_err(WriteFailure::NotWritten)?;
        write_whole_line(&mut file, &format!("{}\n", line), self.config.sync)
    }
}

/// Why an append did not complete
#[derive(Debug)]
enum WriteFailure {
    /// Nothing of the line remains in the file
    NotWritten(io::Error),
    /// The whole line is in the file but `sync_data` failed
    Unsynced(io::Error),
}

type WriteResult = std::result::Result<(), WriteFailure>;

/// File operations a ledger append needs
trait LineSink: Write {
    fn current_len(&self) -> io::Result<u64>;
    fn restore_len(&self, len: u64) -> io::Result<()>;
    fn sync(&self) -> io::Result<()>;
}

impl LineSink for File {
    fn current_len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn restore_len(&self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&self) -> io::Result<()> {
        self.sync_data()
    }
}

/// Write `text` in one `write_all`, cutting the file back to its previous
/// length if the write fails part way.
fn write_whole_line<S: LineSink>(sink: &mut S, text: &str, sync: bool) -> WriteResult {
    let before = sink.current_len().map_err(WriteFailure::NotWritten)?;
    if let Err(source) = sink.write_all(text.as_bytes()).and_then(|()| sink.flush()) {
        if let Err(rollback) = sink.restore_len(before) {
            error!(
                target: "tasknet::ledger",
                length = before,
                error = %rollback,
                "Partial ledger line could not be removed"
            );
        }
        return Err(WriteFailure::NotWritten(source));
    }
    if sync {
        sink.sync().map_err(WriteFailure::Unsynced)?;
    }
    Ok(())
}

/// Parse every line of a ledger file.
///
/// # Errors
///
/// `PersistenceFailure` if the file cannot be read, `InvalidInput` for a
/// line that does not parse.
pub fn read_lines(path: &Path) -> Result<Vec<LedgerLine>> {
    let persistence = |source: io::Error| Error::PersistenceFailure {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(persistence)?;
    let mut lines = Vec::new();
    for raw in BufReader::new(file).lines() {
        let raw = raw.map_err(persistence)?;
        if raw.trim().is_empty() {
            continue;
        }
        lines.push(raw.parse()?);
    }
    Ok(lines)
}
