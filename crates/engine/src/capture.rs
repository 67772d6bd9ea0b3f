//! Capture coordination
//!
//! A capture snapshots the current fast value, pairs it with a random slow
//! value, stores the pairing and appends it to the ledger. Captures are
//! serialized: at most one runs at a time, so ledger line numbers follow
//! pairing-store mutations in the same order.
//!
//! Order of effects: pairing store first, then ledger. A ledger failure
//! leaves the pairing searchable but unrecorded, and is reported as
//! `PersistenceFailure`.

use crate::generator::ValueSource;
use crate::producers::{PairingStore, SlowStore};
use parking_lot::Mutex;
use std::sync::Arc;
use tasknet_core::{CapturedFastValue, Clock, Error, FastValue, PairingRecord, Result};
use tasknet_durability::{LedgerLine, RecordLedger};
use tracing::{debug, error, warn};

/// Result of one successful capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// The pairing that was formed
    pub record: PairingRecord,
    /// Slow-store slot the slow value was picked from
    pub slow_slot: usize,
    /// Pairing-store slot the record was written to
    pub pairing_slot: usize,
    /// Ledger line the record was written as
    pub line: LedgerLine,
}

/// Turns capture events into pairings.
pub struct CaptureCoordinator {
    fast: Arc<dyn ValueSource<FastValue>>,
    slow_store: Arc<SlowStore>,
    pairing_store: Arc<PairingStore>,
    ledger: Arc<RecordLedger>,
    clock: Arc<dyn Clock>,
    in_flight: Mutex<()>,
}

impl CaptureCoordinator {
    /// Wire a coordinator to its collaborators
    pub fn new(
        fast: Arc<dyn ValueSource<FastValue>>,
        slow_store: Arc<SlowStore>,
        pairing_store: Arc<PairingStore>,
        ledger: Arc<RecordLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        CaptureCoordinator {
            fast,
            slow_store,
            pairing_store,
            ledger,
            clock,
            in_flight: Mutex::new(()),
        }
    }

    /// Handle one capture event.
    ///
    /// # Errors
    ///
    /// - `NoFastValueAvailable` before the fast stream's first value
    /// - `NoSlowValueAvailable` while the slow store is empty
    /// - `PersistenceFailure` if the ledger write fails
    ///
    /// The first two leave every store untouched.
    pub fn capture(&self) -> Result<CaptureOutcome> {
        let _serialized = self.in_flight.lock();

        let value = self.fast.current().ok_or(Error::NoFastValueAvailable)?;
        let captured = CapturedFastValue::new(value, self.clock.now());

        let (slow_slot, slow) = match self.slow_store.pick_random_populated() {
            Ok(picked) => picked,
            Err(Error::Empty { .. }) => {
                warn!(target: "tasknet::capture", "Capture before any slow value was generated");
                return Err(Error::NoSlowValueAvailable);
            }
            Err(e) => return Err(e),
        };

        let record = PairingRecord::new(slow, captured);
        let pairing_slot = self.pairing_store.insert(record.clone());
        debug!(
            target: "tasknet::capture",
            slow_slot,
            pairing_slot,
            %record,
            "Pairing formed"
        );

        let line = self.ledger.append(&record).map_err(|e| {
            error!(target: "tasknet::capture", error = %e, "Pairing not recorded");
            e
        })?;

        Ok(CaptureOutcome {
            record,
            slow_slot,
            pairing_slot,
            line,
        })
    }
}
