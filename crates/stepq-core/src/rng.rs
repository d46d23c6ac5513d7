#![forbid(unsafe_code)]

//! Seedable random source for end resolution and shuffling.
//!
//! A small 64-bit LCG rather than an external RNG crate: the queue only
//! needs coin flips and bounded indices, and tests need a reproducible
//! stream they can inject.

use std::time::{SystemTime, UNIX_EPOCH};

/// Fallback seed when the system clock reads before the epoch.
const FALLBACK_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seedable linear congruential generator.
///
/// Streams are deterministic per seed. Not suitable for cryptographic use.
#[derive(Debug, Clone)]
pub struct StepRng {
    state: u64,
}

impl StepRng {
    /// Create a generator with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    /// Create a generator seeded from wall-clock entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(FALLBACK_SEED, |d| d.as_nanos() as u64);
        Self::new(nanos ^ nanos.rotate_left(31))
    }

    /// Next raw value in the stream.
    pub fn next_u64(&mut self) -> u64 {
        // LCG parameters from Numerical Recipes
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Fair coin flip.
    ///
    /// Uses the top bit only; the low bits of an LCG have short periods.
    pub fn coin(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }

    /// Uniform index in `0..n`. Returns 0 when `n < 2`.
    pub fn next_below(&mut self, n: usize) -> usize {
        if n < 2 {
            return 0;
        }
        // reduce the high half of the stream, not the weak low bits
        ((self.next_u64() >> 32) % n as u64) as usize
    }
}
