//! Injectable randomness for the probabilistic gates and topology construction.
//!
//! Every stubbornness gate, confidence gate, random topology edge, and phase
//! disruption draws from this trait rather than calling `rand::thread_rng()`
//! directly, so tests can seed a reproducible source.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// A uniform random source usable from multiple agent tasks.
pub trait RngSource: Send + Sync {
    /// Uniform sample in `[0, 1)`.
    fn uniform(&self) -> f64;

    /// Uniform integer sample in `[0, bound)`. Returns 0 if `bound` is 0.
    fn uniform_below(&self, bound: usize) -> usize;
}

/// Default production RNG: a [`SmallRng`] behind a mutex, seeded from entropy
/// (or explicitly, for deterministic tests).
pub struct DefaultRng {
    inner: Mutex<SmallRng>,
}

impl DefaultRng {
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: Mutex::new(SmallRng::from_entropy()),
        }
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl Default for DefaultRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RngSource for DefaultRng {
    fn uniform(&self) -> f64 {
        self.inner.lock().expect("rng mutex poisoned").gen_range(0.0..1.0)
    }

    fn uniform_below(&self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        self.inner.lock().expect("rng mutex poisoned").gen_range(0..bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_rng_is_reproducible() {
        let a = DefaultRng::seeded(42);
        let b = DefaultRng::seeded(42);
        let seq_a: Vec<f64> = (0..10).map(|_| a.uniform()).collect();
        let seq_b: Vec<f64> = (0..10).map(|_| b.uniform()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn uniform_below_zero_bound_is_zero() {
        let rng = DefaultRng::seeded(1);
        assert_eq!(rng.uniform_below(0), 0);
    }

    #[test]
    fn uniform_is_in_unit_interval() {
        let rng = DefaultRng::seeded(7);
        for _ in 0..1000 {
            let u = rng.uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
