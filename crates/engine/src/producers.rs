//! The two value streams of the network.

use crate::generator::{PeriodicGenerator, Producer};
use tasknet_concurrency::BoundedRandomReplacementStore;
use tasknet_core::{Error, FastValue, PairingRecord, RandomSource, Result, SlowValue, Tick};
use tracing::{debug, trace};

/// Fast stream generator
pub type FastGenerator = PeriodicGenerator<FastProducer>;
/// Slow stream generator
pub type SlowGenerator = PeriodicGenerator<SlowProducer>;
/// Slow values awaiting pairing
pub type SlowStore = BoundedRandomReplacementStore<SlowValue>;
/// Recent pairings, searchable by captured fast value
pub type PairingStore = BoundedRandomReplacementStore<PairingRecord>;

/// Draws a fresh 12-digit number every tick.
#[derive(Debug)]
pub struct FastProducer {
    rng: RandomSource,
}

impl FastProducer {
    /// Draw from `rng`
    pub fn new(rng: RandomSource) -> Self {
        FastProducer { rng }
    }
}

impl Producer for FastProducer {
    type Output = FastValue;

    fn produce(&mut self, now: Tick) -> FastValue {
        let value = FastValue::new(self.rng.fast_value());
        trace!(target: "tasknet::fast", %value, tick = %now, "Fast value generated");
        value
    }
}

/// Generates a fixed-length alphanumeric string every tick.
#[derive(Debug)]
pub struct SlowProducer {
    length: usize,
    rng: RandomSource,
}

impl SlowProducer {
    /// Produce strings of `length` characters.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `length` is zero.
    pub fn new(length: usize, rng: RandomSource) -> Result<Self> {
        if length == 0 {
            return Err(Error::invalid_config("slow value length must be positive"));
        }
        Ok(SlowProducer { length, rng })
    }

    /// Length of every produced string
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Producer for SlowProducer {
    type Output = SlowValue;

    fn produce(&mut self, now: Tick) -> SlowValue {
        let text = self.rng.random_alphanumeric(self.length);
        debug!(target: "tasknet::slow", %text, tick = %now, "Slow value generated");
        SlowValue::new(text, now)
    }
}
