//! Seedable random source
//!
//! Every component that needs randomness owns its own `RandomSource`. A
//! network started with a master seed derives one stream per component, so
//! a seed reproduces the whole run.
//!
//! No cryptographic guarantees are made.

use crate::error::{Error, Result};
use crate::limits::{ALPHANUMERIC, FAST_VALUE_MIN, FAST_VALUE_SPAN};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

const STREAM_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

/// Uniform integer and alphanumeric string generation.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Deterministic source for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        RandomSource {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        RandomSource {
            rng: StdRng::from_entropy(),
        }
    }

    /// Restart the sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Derive an independent sub-stream.
    ///
    /// Consumes one draw from `self`, so deriving streams `0, 1, 2` from the
    /// same seeded parent always yields the same three children.
    pub fn derive(&mut self, stream: u64) -> RandomSource {
        let seed = self.rng.next_u64() ^ stream.wrapping_add(1).wrapping_mul(STREAM_MIX);
        RandomSource::from_seed(seed)
    }

    /// Integer in `[0, max_exclusive)`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `max_exclusive` is zero.
    pub fn uniform_int(&mut self, max_exclusive: u64) -> Result<u64> {
        if max_exclusive == 0 {
            return Err(Error::invalid_config(
                "uniform_int requires a positive upper bound",
            ));
        }
        Ok(self.rng.gen_range(0..max_exclusive))
    }

    /// Index in `[0, len)`, the `usize` flavour of [`uniform_int`](Self::uniform_int).
    pub fn uniform_index(&mut self, len: usize) -> Result<usize> {
        self.uniform_int(len as u64).map(|i| i as usize)
    }

    /// Raw 32-bit draw.
    pub fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    /// String of exactly `length` characters from `[a-zA-Z0-9]`.
    ///
    /// A zero length yields an empty string.
    pub fn random_alphanumeric(&mut self, length: usize) -> String {
        (0..length)
            .map(|_| ALPHANUMERIC[self.rng.gen_range(0..ALPHANUMERIC.len())] as char)
            .collect()
    }

    /// A 12-digit value built from two 32-bit draws.
    ///
    /// The draws are combined into one 64-bit integer, reduced modulo
    /// `FAST_VALUE_SPAN` and offset by `FAST_VALUE_MIN`.
    pub fn fast_value(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        fast_value_from_draws(high, low)
    }
}

/// Reduce two raw draws into the 12-digit range.
pub fn fast_value_from_draws(high: u64, low: u64) -> u64 {
    let raw = (high << 32) | low;
    (raw % FAST_VALUE_SPAN) + FAST_VALUE_MIN
}
