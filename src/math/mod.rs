//! Phase arithmetic, the Kuramoto order parameter, and torn-free float storage.

mod atomic_f64;
mod phase;

pub use atomic_f64::AtomicF64;
pub use phase::{coherence, coherence_weighted, diff, wrap};
