//! Bounded random-replacement store
//!
//! A fixed number of slots, indices `0..capacity`. Inserting always
//! succeeds: a slot is drawn uniformly from the full index range and
//! overwritten whether or not it was populated. Slots are never cleared,
//! so once populated a slot stays populated.
//!
//! ## Locking
//!
//! The slot array sits behind one `RwLock`. Reads (`scan`,
//! `pick_random_populated`, `snapshot`) take the read lock and clone items
//! out; `insert` takes the write lock. A reader can never observe an item
//! halfway through being overwritten.
//!
//! The store's own `RandomSource` is behind a separate mutex, always
//! acquired before the slot lock.

use parking_lot::{Mutex, RwLock};
use tasknet_core::{Error, RandomSource, Result};
use tracing::debug;

/// Outcome of an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion<T> {
    /// Slot that received the new item
    pub slot: usize,
    /// Item that was overwritten, if the slot was populated
    pub evicted: Option<T>,
}

/// Fixed-capacity slots with uniformly random eviction.
#[derive(Debug)]
pub struct BoundedRandomReplacementStore<T> {
    name: &'static str,
    slots: RwLock<Vec<Option<T>>>,
    rng: Mutex<RandomSource>,
}

impl<T: Clone> BoundedRandomReplacementStore<T> {
    /// Create a store with `capacity` empty slots.
    ///
    /// `name` identifies the store in logs and `Empty` errors.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `capacity` is zero.
    pub fn new(name: &'static str, capacity: usize, rng: RandomSource) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_config(format!(
                "store '{}' needs a positive capacity",
                name
            )));
        }
        Ok(BoundedRandomReplacementStore {
            name,
            slots: RwLock::new(vec![None; capacity]),
            rng: Mutex::new(rng),
        })
    }

    /// Store name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.read().len()
    }

    /// Number of populated slots
    pub fn populated(&self) -> usize {
        self.slots.read().iter().filter(|s| s.is_some()).count()
    }

    /// Whether no slot has been populated yet
    pub fn is_empty(&self) -> bool {
        self.populated() == 0
    }

    /// Overwrite a uniformly random slot with `item`, returning the slot.
    pub fn insert(&self, item: T) -> usize {
        self.insert_evicting(item).slot
    }

    /// Like [`insert`](Self::insert), also handing back the evicted item.
    pub fn insert_evicting(&self, item: T) -> Insertion<T> {
        let mut rng = self.rng.lock();
        let mut slots = self.slots.write();
        // Capacity is positive by construction
        let slot = rng.uniform_index(slots.len()).unwrap_or(0);
        let evicted = slots[slot].replace(item);
        debug!(
            target: "tasknet::store",
            store = self.name,
            slot,
            evicted = evicted.is_some(),
            "Slot overwritten"
        );
        Insertion { slot, evicted }
    }

    /// Pick one populated slot uniformly at random.
    ///
    /// # Errors
    ///
    /// `Empty` if no slot is populated. Never blocks or retries.
    pub fn pick_random_populated(&self) -> Result<(usize, T)> {
        let mut rng = self.rng.lock();
        let slots = self.slots.read();
        let populated: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| i))
            .collect();
        if populated.is_empty() {
            return Err(Error::Empty { store: self.name });
        }
        let pick = populated[rng.uniform_index(populated.len())?];
        match &slots[pick] {
            Some(item) => Ok((pick, item.clone())),
            None => Err(Error::Empty { store: self.name }),
        }
    }

    /// First populated slot, in index order, whose item satisfies `predicate`.
    pub fn scan<F>(&self, mut predicate: F) -> Option<(usize, T)>
    where
        F: FnMut(&T) -> bool,
    {
        self.slots
            .read()
            .iter()
            .enumerate()
            .find_map(|(i, s)| s.as_ref().filter(|item| predicate(item)).map(|item| (i, item.clone())))
    }

    /// Every populated slot, in index order, whose item satisfies `predicate`.
    pub fn scan_all<F>(&self, mut predicate: F) -> Vec<(usize, T)>
    where
        F: FnMut(&T) -> bool,
    {
        self.slots
            .read()
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().filter(|item| predicate(item)).map(|item| (i, item.clone())))
            .collect()
    }

    /// Copy of every slot
    pub fn snapshot(&self) -> Vec<Option<T>> {
        self.slots.read().clone()
    }
}
