//! What happens to each value a generator publishes.
//!
//! - `ConsoleEmitter`: writes every fast value to the observation channel
//! - `StoreInserter`: inserts every slow value into the slow store

use crate::console::Console;
use std::fmt::Display;
use std::sync::Arc;
use tasknet_concurrency::BoundedRandomReplacementStore;
use tasknet_core::SlowValue;
use tracing::debug;

/// Receives every value a generator publishes.
pub trait GeneratorObserver<T>: Send + Sync {
    /// Called once per published value, on the generator's thread
    fn observe(&self, value: &T);
}

impl<T, F> GeneratorObserver<T> for F
where
    F: Fn(&T) + Send + Sync,
{
    fn observe(&self, value: &T) {
        self(value)
    }
}

/// Emits one console line per value.
pub struct ConsoleEmitter {
    console: Arc<dyn Console>,
    label: &'static str,
}

impl ConsoleEmitter {
    /// Emit `"<label>: <value>"` lines to `console`
    pub fn new(console: Arc<dyn Console>, label: &'static str) -> Self {
        ConsoleEmitter { console, label }
    }
}

impl<T: Display> GeneratorObserver<T> for ConsoleEmitter {
    fn observe(&self, value: &T) {
        self.console.line(&format!("{}: {}", self.label, value));
    }
}

/// Inserts each slow value into a random slot of the slow store.
pub struct StoreInserter {
    store: Arc<BoundedRandomReplacementStore<SlowValue>>,
}

impl StoreInserter {
    /// Insert into `store`
    pub fn new(store: Arc<BoundedRandomReplacementStore<SlowValue>>) -> Self {
        StoreInserter { store }
    }
}

impl GeneratorObserver<SlowValue> for StoreInserter {
    fn observe(&self, value: &SlowValue) {
        let slot = self.store.insert(value.clone());
        debug!(target: "tasknet::slow", text = %value.text, tick = %value.generated_at, slot, "Slow value stored");
        for (i, entry) in self.store.snapshot().iter().enumerate() {
            match entry {
                Some(v) => debug!(target: "tasknet::slow", slot = i, tick = %v.generated_at, text = %v.text, "Slow store slot"),
                None => debug!(target: "tasknet::slow", slot = i, "Slow store slot empty"),
            }
        }
    }
}
