//! Console boundary.
//!
//! Everything user-visible goes through a `Console`: the fast value stream,
//! capture confirmations, the lookup prompt and its answer. Logs go to
//! `tracing` instead, so they can be routed elsewhere.

use parking_lot::Mutex;
use std::io::Write;

/// User-visible text output.
pub trait Console: Send + Sync {
    /// Write one full line
    fn line(&self, text: &str);

    /// Write a prompt without a trailing newline
    fn prompt(&self, text: &str);
}

/// Console writing to standard output.
#[derive(Debug, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn line(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout must not take down a generator thread
        let _ = writeln!(out, "{}", text);
    }

    fn prompt(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "{}", text);
        let _ = out.flush();
    }
}

/// Console that keeps everything in memory, for tests.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    lines: Mutex<Vec<String>>,
}

impl RecordingConsole {
    /// Empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far; prompts appear as their own entries
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Whether any entry contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|l| l.contains(needle))
    }

    /// Entries starting with `prefix`
    pub fn lines_starting_with(&self, prefix: &str) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|l| l.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl Console for RecordingConsole {
    fn line(&self, text: &str) {
        self.lines.lock().push(text.to_string());
    }

    fn prompt(&self, text: &str) {
        self.lines.lock().push(text.to_string());
    }
}
