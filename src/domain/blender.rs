//! `GoalBlender`: circular interpolation between a local and a global target.

use crate::domain::state::State;
use crate::math;

/// Blends a local goal `State` with a shared global goal `State` by a weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalBlender;

impl GoalBlender {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Blends `local` and `global` by `weight` (the agent's `influence`,
    /// clamped to `[0,1]`).
    ///
    /// - phase: `wrap(local.phase + weight * diff(global.phase, local.phase))`
    /// - coherence: `(1-weight)*local.coherence + weight*global.coherence`
    /// - frequency: passed through from `local`
    #[must_use]
    pub fn blend(&self, local: &State, global: &State, weight: f64) -> State {
        let weight = weight.clamp(0.0, 1.0);
        let phase = math::wrap(local.phase + weight * math::diff(global.phase, local.phase));
        let coherence = (1.0 - weight) * local.coherence + weight * global.coherence;
        State {
            phase,
            frequency: local.frequency,
            coherence: coherence.clamp(0.0, 1.0),
        }
    }
}
