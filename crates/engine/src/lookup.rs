//! Lookup coordination
//!
//! ## Protocol
//!
//! `Idle -> AwaitingSuspend -> AwaitingInput -> Idle`
//!
//! [`LookupCoordinator::begin`] suspends the fast generator and waits for
//! the suspension to take effect before handing back a [`PendingLookup`].
//! The pending lookup holds the suspension; the fast generator resumes when
//! it is submitted or dropped, whatever the outcome.

use crate::generator::{SuspendGuard, Suspendable};
use crate::producers::PairingStore;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tasknet_core::{Error, FastValue, PairingRecord, Result};
use tracing::{debug, info};

/// Where the coordinator is in the lookup protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupState {
    /// No lookup in progress
    Idle,
    /// Waiting for the fast generator to acknowledge suspension
    AwaitingSuspend,
    /// Fast generator suspended, waiting for the query
    AwaitingInput,
}

/// Answer to a lookup query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// A pairing captured with the queried value
    Found {
        /// Queried value
        query: FastValue,
        /// Pairing-store slot holding the match
        slot: usize,
        /// The matching pairing
        record: PairingRecord,
    },
    /// No populated slot holds the queried value
    NotFound {
        /// Queried value
        query: FastValue,
    },
}

impl LookupOutcome {
    /// The matching pairing, if any
    pub fn record(&self) -> Option<&PairingRecord> {
        match self {
            LookupOutcome::Found { record, .. } => Some(record),
            LookupOutcome::NotFound { .. } => None,
        }
    }

    /// Whether a match was found
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found { .. })
    }
}

impl fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupOutcome::Found { query, record, .. } => write!(
                f,
                "Value {} found. Slow time = {}, slow string = {}",
                query, record.slow.generated_at, record.slow.text
            ),
            LookupOutcome::NotFound { query } => {
                write!(f, "Value {} was not found in the pairing store", query)
            }
        }
    }
}

/// Answers queries against the pairing store with the fast stream paused.
pub struct LookupCoordinator {
    fast: Arc<dyn Suspendable>,
    pairing_store: Arc<PairingStore>,
    state: Mutex<LookupState>,
}

impl LookupCoordinator {
    /// Coordinate lookups that pause `fast`
    pub fn new(fast: Arc<dyn Suspendable>, pairing_store: Arc<PairingStore>) -> Self {
        LookupCoordinator {
            fast,
            pairing_store,
            state: Mutex::new(LookupState::Idle),
        }
    }

    /// Current protocol state
    pub fn state(&self) -> LookupState {
        *self.state.lock()
    }

    /// Start a lookup: suspend the fast generator and wait for the query.
    ///
    /// Returns once the suspension has taken effect, so a prompt issued
    /// afterwards is never interleaved with fresh fast values.
    ///
    /// # Errors
    ///
    /// `LookupInProgress` if another lookup has not finished yet.
    pub fn begin(&self) -> Result<PendingLookup<'_>> {
        {
            let mut state = self.state.lock();
            if *state != LookupState::Idle {
                return Err(Error::LookupInProgress);
            }
            *state = LookupState::AwaitingSuspend;
        }

        let guard = SuspendGuard::acquire(self.fast.as_ref());
        *self.state.lock() = LookupState::AwaitingInput;
        info!(target: "tasknet::lookup", "Fast stream suspended for lookup");

        Ok(PendingLookup {
            coordinator: self,
            guard: Some(guard),
        })
    }

    /// Run the whole protocol for an already known query.
    ///
    /// # Errors
    ///
    /// `LookupInProgress` or `InvalidInput`. The fast generator is resumed
    /// in every case.
    pub fn lookup(&self, raw: &str) -> Result<LookupOutcome> {
        self.begin()?.submit(raw)
    }

    /// Scan the pairing store without touching the fast generator.
    ///
    /// Duplicates resolve to the lowest slot index.
    pub fn find(&self, query: FastValue) -> LookupOutcome {
        match self.pairing_store.scan(|record| record.matches(query)) {
            Some((slot, record)) => LookupOutcome::Found {
                query,
                slot,
                record,
            },
            None => LookupOutcome::NotFound { query },
        }
    }
}

/// A lookup waiting for its query. Holds the fast generator suspended.
#[must_use = "dropping a pending lookup resumes the fast stream immediately"]
pub struct PendingLookup<'a> {
    coordinator: &'a LookupCoordinator,
    guard: Option<SuspendGuard<'a>>,
}

impl PendingLookup<'_> {
    /// Answer the lookup with the raw query text.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `raw` is not an unsigned integer.
    pub fn submit(self, raw: &str) -> Result<LookupOutcome> {
        let query: FastValue = raw.parse()?;
        debug!(target: "tasknet::lookup", %query, "Lookup query entered");
        let outcome = self.coordinator.find(query);
        debug!(target: "tasknet::lookup", found = outcome.is_found(), "Lookup finished");
        Ok(outcome)
    }
}

impl Drop for PendingLookup<'_> {
    fn drop(&mut self) {
        // Resume before reporting idle so a new lookup never sees a
        // suspension it did not take
        drop(self.guard.take());
        *self.coordinator.state.lock() = LookupState::Idle;
        info!(target: "tasknet::lookup", "Fast stream resumed");
    }
}
