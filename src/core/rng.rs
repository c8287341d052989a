//! Deterministic random stream for every randomized decision
//!
//! Menu choice, patience jitter, VIP rolls and think-cooldown jitter all draw
//! from one seeded ChaCha8 stream, so two simulations with the same seed and
//! the same inputs evolve identically.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded random stream owned by one simulation
#[derive(Debug, Clone)]
pub struct SimRng {
    seed: u64,
    inner: ChaCha8Rng,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform index in [0, len); `len` must be non-zero
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Uniform integer in [0, upper); zero when `upper` is zero
    pub fn below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            0
        } else {
            self.inner.gen_range(0..upper)
        }
    }

    /// Uniform float in [lo, hi)
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            lo
        } else {
            self.inner.gen_range(lo..hi)
        }
    }

    /// Bernoulli trial
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}
