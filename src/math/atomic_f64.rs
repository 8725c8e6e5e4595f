//! Torn-free `f64` storage for fields neighbors read without synchronization.
//!
//! The language has no native atomic float; we store the IEEE-754 bit pattern
//! in an `AtomicU64` instead, per the arena/atomics redesign note. Every load
//! observes some previously-stored value in full -- never a mix of two writes.

use std::sync::atomic::{AtomicU64, Ordering};

/// An `f64` that can be read and written from multiple tasks without tearing.
#[derive(Debug)]
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    pub fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }

    pub fn store(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::SeqCst);
    }

    /// Atomically replaces the value, returning the previous one.
    pub fn swap(&self, value: f64) -> f64 {
        f64::from_bits(self.bits.swap(value.to_bits(), Ordering::SeqCst))
    }
}

impl Clone for AtomicF64 {
    fn clone(&self) -> Self {
        Self::new(self.load())
    }
}

impl From<f64> for AtomicF64 {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}
