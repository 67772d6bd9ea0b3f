//! Event dispatch
//!
//! An [`EventSource`] turns raw input into [`InputEvent`]s; the
//! [`EventDispatcher`] routes them to the capture and lookup coordinators
//! and writes every response to the console. How input is collected (a
//! terminal, a script, a socket) is the source's business.

use crate::capture::CaptureCoordinator;
use crate::console::Console;
use crate::lookup::{LookupCoordinator, PendingLookup};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::Arc;
use tasknet_core::{Error, Result};
use tracing::{debug, info, warn};

/// Prompt shown after a lookup request.
pub const LOOKUP_PROMPT: &str = "Please enter a 12-digit code: ";

/// One discrete input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Pair the current fast value with a slow value
    Capture,
    /// Pause the fast stream and prompt for a query
    LookupRequest,
    /// Query text answering a lookup prompt
    LookupQuery(String),
    /// Input that maps to no event
    Unrecognized(String),
    /// Stop dispatching
    Quit,
}

/// What the dispatcher expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// A command key
    Command,
    /// The answer to a lookup prompt
    Query,
}

/// Produces input events.
pub trait EventSource {
    /// Next event, or `None` at end of input
    fn next_event(&mut self, mode: InputMode) -> Option<InputEvent>;
}

/// Command keys, the `[keys]` section of the network config.
///
/// Keys match case-insensitively on the first character of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMap {
    /// Key that triggers a capture
    #[serde(default = "default_capture")]
    pub capture: char,
    /// Key that triggers a lookup
    #[serde(default = "default_lookup")]
    pub lookup: char,
    /// Key that stops the network
    #[serde(default = "default_quit")]
    pub quit: char,
}

fn default_capture() -> char {
    'c'
}

fn default_lookup() -> char {
    'g'
}

fn default_quit() -> char {
    'q'
}

impl Default for KeyMap {
    fn default() -> Self {
        KeyMap {
            capture: default_capture(),
            lookup: default_lookup(),
            quit: default_quit(),
        }
    }
}

impl KeyMap {
    /// Translate one line of command input.
    pub fn translate(&self, input: &str) -> InputEvent {
        let trimmed = input.trim();
        let mut chars = trimmed.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(key), None) => key.to_ascii_lowercase(),
            _ => return InputEvent::Unrecognized(trimmed.to_string()),
        };
        if key == self.capture.to_ascii_lowercase() {
            InputEvent::Capture
        } else if key == self.lookup.to_ascii_lowercase() {
            InputEvent::LookupRequest
        } else if key == self.quit.to_ascii_lowercase() {
            InputEvent::Quit
        } else {
            InputEvent::Unrecognized(trimmed.to_string())
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        let keys = [
            self.capture.to_ascii_lowercase(),
            self.lookup.to_ascii_lowercase(),
            self.quit.to_ascii_lowercase(),
        ];
        if keys.iter().any(|k| k.is_whitespace()) {
            return Err(Error::invalid_config("command keys must not be whitespace"));
        }
        if keys[0] == keys[1] || keys[0] == keys[2] || keys[1] == keys[2] {
            return Err(Error::invalid_config(format!(
                "command keys must be distinct, got capture '{}', lookup '{}', quit '{}'",
                self.capture, self.lookup, self.quit
            )));
        }
        Ok(())
    }
}

/// Reads one event per line from a buffered reader.
pub struct LineEventSource<R> {
    reader: R,
    keys: KeyMap,
}

impl<R: BufRead> LineEventSource<R> {
    /// Read lines from `reader`, translating commands with `keys`
    pub fn new(reader: R, keys: KeyMap) -> Self {
        LineEventSource { reader, keys }
    }
}

impl<R: BufRead> EventSource for LineEventSource<R> {
    fn next_event(&mut self, mode: InputMode) -> Option<InputEvent> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(match mode {
                InputMode::Command => self.keys.translate(&line),
                InputMode::Query => InputEvent::LookupQuery(line.trim().to_string()),
            }),
            Err(e) => {
                warn!(target: "tasknet::dispatch", error = %e, "Input closed");
                None
            }
        }
    }
}

/// Replays a fixed list of events, for tests and demos.
#[derive(Debug, Default)]
pub struct ScriptedEventSource {
    events: VecDeque<InputEvent>,
}

impl ScriptedEventSource {
    /// Replay `events` in order
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        ScriptedEventSource {
            events: events.into_iter().collect(),
        }
    }

    /// Events not yet delivered
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for ScriptedEventSource {
    fn next_event(&mut self, _mode: InputMode) -> Option<InputEvent> {
        self.events.pop_front()
    }
}

/// Counters for one dispatch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Captures that produced a ledger line
    pub captures: u64,
    /// Failed captures
    pub capture_failures: u64,
    /// Lookups answered, found or not
    pub lookups: u64,
    /// Lookups that found a match
    pub lookups_found: u64,
    /// Lookups rejected or abandoned
    pub lookup_failures: u64,
    /// Events that mapped to nothing
    pub unrecognized: u64,
}

/// Routes input events to the coordinators.
pub struct EventDispatcher {
    capture: Arc<CaptureCoordinator>,
    lookup: Arc<LookupCoordinator>,
    console: Arc<dyn Console>,
}

impl EventDispatcher {
    /// Dispatch to `capture` and `lookup`, answering on `console`
    pub fn new(
        capture: Arc<CaptureCoordinator>,
        lookup: Arc<LookupCoordinator>,
        console: Arc<dyn Console>,
    ) -> Self {
        EventDispatcher {
            capture,
            lookup,
            console,
        }
    }

    /// Consume events until `Quit` or end of input.
    ///
    /// Coordinator errors are reported on the console and never end the run.
    pub fn run(&self, source: &mut dyn EventSource) -> DispatchStats {
        let mut stats = DispatchStats::default();
        let mut pending: Option<PendingLookup<'_>> = None;

        loop {
            let mode = if pending.is_some() {
                InputMode::Query
            } else {
                InputMode::Command
            };
            let Some(event) = source.next_event(mode) else {
                break;
            };
            debug!(target: "tasknet::dispatch", ?event, ?mode, "Event received");

            if let Some(lookup) = pending.take() {
                match event {
                    InputEvent::LookupQuery(raw) => {
                        self.answer(lookup, &raw, &mut stats);
                        continue;
                    }
                    other => {
                        // Anything but a query abandons the lookup
                        drop(lookup);
                        stats.lookup_failures += 1;
                        self.console.line("Lookup cancelled");
                        if !self.handle_command(other, &mut pending, &mut stats) {
                            break;
                        }
                        continue;
                    }
                }
            }

            if !self.handle_command(event, &mut pending, &mut stats) {
                break;
            }
        }

        info!(
            target: "tasknet::dispatch",
            captures = stats.captures,
            lookups = stats.lookups,
            "Dispatcher stopped"
        );
        stats
    }

    /// Returns `false` when dispatching should stop.
    fn handle_command<'a>(
        &'a self,
        event: InputEvent,
        pending: &mut Option<PendingLookup<'a>>,
        stats: &mut DispatchStats,
    ) -> bool {
        match event {
            InputEvent::Capture => match self.capture.capture() {
                Ok(outcome) => {
                    stats.captures += 1;
                    self.console.line(&format!("Captured: {}", outcome.line));
                }
                Err(e) => {
                    stats.capture_failures += 1;
                    warn!(target: "tasknet::dispatch", error = %e, "Capture failed");
                    self.console.line(&format!("Capture failed: {}", e));
                }
            },
            InputEvent::LookupRequest => match self.lookup.begin() {
                Ok(lookup) => {
                    self.console.prompt(LOOKUP_PROMPT);
                    *pending = Some(lookup);
                }
                Err(e) => {
                    stats.lookup_failures += 1;
                    warn!(target: "tasknet::dispatch", error = %e, "Lookup rejected");
                    self.console.line(&format!("Lookup failed: {}", e));
                }
            },
            InputEvent::LookupQuery(raw) => {
                // A query with no prompt outstanding runs the whole protocol
                match self.lookup.begin() {
                    Ok(lookup) => self.answer(lookup, &raw, stats),
                    Err(e) => {
                        stats.lookup_failures += 1;
                        self.console.line(&format!("Lookup failed: {}", e));
                    }
                }
            }
            InputEvent::Unrecognized(raw) => {
                stats.unrecognized += 1;
                warn!(target: "tasknet::dispatch", input = %raw, "Unrecognized input");
            }
            InputEvent::Quit => return false,
        }
        true
    }

    fn answer(&self, lookup: PendingLookup<'_>, raw: &str, stats: &mut DispatchStats) {
        match lookup.submit(raw) {
            Ok(outcome) => {
                stats.lookups += 1;
                if outcome.is_found() {
                    stats.lookups_found += 1;
                }
                self.console.line(&outcome.to_string());
            }
            Err(e) => {
                stats.lookup_failures += 1;
                warn!(target: "tasknet::dispatch", error = %e, "Lookup query rejected");
                self.console.line(&format!("Invalid query: {}", e));
            }
        }
    }
}
