//! `Context`: an agent's local view of its neighborhood, recomputed each cycle.

use crate::math;

/// Snapshot of an agent's neighborhood, rebuilt every decision cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Context {
    /// `|neighbors| / max_neighbors_assumed`, in `[0,1]`.
    pub density: f64,
    /// `1 / (1 + Σ(neighbor_phase - self_phase)²)`, in `(0,1]`.
    pub stability: f64,
    /// Convergence-rate hint; defaults to 0.5 absent better information.
    pub progress: f64,
    /// Kuramoto R computed over the neighbor set alone.
    pub local_coherence: f64,
}

impl Context {
    /// Builds a context from a snapshot of neighbor phases and bounds.
    #[must_use]
    pub fn from_neighbors(self_phase: f64, neighbor_phases: &[f64], max_neighbors_assumed: usize) -> Self {
        let n = neighbor_phases.len();
        let density = if max_neighbors_assumed == 0 {
            0.0
        } else {
            (n as f64 / max_neighbors_assumed as f64).min(1.0)
        };

        let sum_sq: f64 = neighbor_phases
            .iter()
            .map(|&phi| math::diff(phi, self_phase).powi(2))
            .sum();
        let stability = 1.0 / (1.0 + sum_sq);

        let local_coherence = math::coherence(neighbor_phases);

        Self {
            density,
            stability,
            progress: 0.5,
            local_coherence,
        }
    }

    /// A context with no neighbors: maximal stability, zero density/coherence.
    #[must_use]
    pub fn isolated() -> Self {
        Self {
            density: 0.0,
            stability: 1.0,
            progress: 0.5,
            local_coherence: 0.0,
        }
    }
}
