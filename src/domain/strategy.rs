//! Strategies: stateless (or nearly so) rules turning `(current, target,
//! context)` into a candidate `Action` and a confidence.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::domain::action::{Action, ActionType};
use crate::domain::context::Context;
use crate::domain::state::State;
use crate::math;

/// A rule for turning local observations into a candidate action.
///
/// A trait object rather than a closed enum: `Adaptive` needs to hold an
/// arbitrary, user-supplied set of child strategies (including custom ones),
/// so the collaborator is chosen for extensibility over dispatch cost here.
pub trait Strategy: Send + Sync {
    /// Proposes an action given the current state, the blended target, and
    /// the agent's local context. Returns `(action, confidence in [0,1])`.
    fn propose(&self, current: &State, target: &State, context: &Context) -> (Action, f64);
}

/// Nudges phase toward the target by a fixed fraction each cycle.
pub struct PhaseNudge {
    pub rate: f64,
}

impl PhaseNudge {
    #[must_use]
    pub fn new(rate: f64) -> Self {
        Self { rate: rate.clamp(0.0, 1.0) }
    }
}

impl Strategy for PhaseNudge {
    fn propose(&self, current: &State, target: &State, context: &Context) -> (Action, f64) {
        let raw_diff = math::diff(target.phase, current.phase);
        let adjustment = raw_diff * self.rate;
        let action = Action::new(
            ActionType::PhaseNudge,
            adjustment,
            2.0 * adjustment.abs(),
            1.5 * (1.0 - raw_diff.abs() / std::f64::consts::PI),
        );
        let confidence = (1.0 - context.local_coherence).max(0.5);
        (action, confidence)
    }
}

/// Locks onto the target phase with a configurable coupling strength.
///
/// Despite the name, this does not modulate `frequency` directly -- per the
/// source system, frequency adaptation is modeled as a phase adjustment
/// scaled by `strength`. Whether true frequency modulation belongs in a
/// future version is an open question (see DESIGN.md).
pub struct FrequencyLock {
    pub strength: f64,
}

impl FrequencyLock {
    #[must_use]
    pub fn new(strength: f64) -> Self {
        Self { strength: strength.clamp(0.0, 1.0) }
    }
}

impl Strategy for FrequencyLock {
    fn propose(&self, current: &State, target: &State, context: &Context) -> (Action, f64) {
        let adjustment = math::diff(target.phase, current.phase) * self.strength;
        let action = Action::new(
            ActionType::FrequencyLock,
            adjustment,
            3.0 * adjustment.abs(),
            2.0 * context.local_coherence,
        );
        let confidence = context.local_coherence * self.strength;
        (action, confidence)
    }
}

/// Avoids spending energy on small corrections.
pub struct EnergyAware {
    pub threshold: f64,
}

impl EnergyAware {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold: threshold.max(0.0) }
    }
}

impl Strategy for EnergyAware {
    fn propose(&self, current: &State, target: &State, context: &Context) -> (Action, f64) {
        let raw_diff = math::diff(target.phase, current.phase);
        if raw_diff.abs() < 0.1 {
            (Action::new(ActionType::Maintain, 0.0, 0.1, context.stability), 0.5)
        } else {
            let adjustment = raw_diff * 0.1;
            let action = Action::new(
                ActionType::EnergySave,
                adjustment,
                adjustment.abs().max(0.5),
                0.5 * context.progress,
            );
            (action, 0.3)
        }
    }
}

/// Holds until a fixed period elapses, then emits a single strong pulse.
pub struct Pulse {
    pub period: Duration,
    pub amplitude: f64,
    last_pulse: Mutex<Instant>,
}

impl Pulse {
    #[must_use]
    pub fn new(period: Duration, amplitude: f64) -> Self {
        Self {
            period,
            amplitude: amplitude.clamp(0.0, 1.0),
            last_pulse: Mutex::new(Instant::now()),
        }
    }
}

impl Strategy for Pulse {
    fn propose(&self, current: &State, target: &State, context: &Context) -> (Action, f64) {
        let mut last_pulse = self.last_pulse.lock().expect("pulse mutex poisoned");
        if last_pulse.elapsed() >= self.period {
            *last_pulse = Instant::now();
            let adjustment = math::diff(target.phase, current.phase) * self.amplitude;
            let action = Action::new(ActionType::Pulse, adjustment, 4.0 * adjustment.abs(), 2.0);
            (action, self.amplitude)
        } else {
            let _ = context;
            (Action::new(ActionType::Maintain, 0.0, 0.1, context.stability), 0.3)
        }
    }
}

/// Delegates to one of several child strategies, chosen by `Context`.
pub struct Adaptive {
    children: Vec<Arc<dyn Strategy>>,
    selector: Option<Box<dyn Fn(&Context) -> usize + Send + Sync>>,
}

impl Adaptive {
    #[must_use]
    pub fn new(children: Vec<Arc<dyn Strategy>>) -> Self {
        Self { children, selector: None }
    }

    /// Overrides the default selection rule with a custom one.
    #[must_use]
    pub fn with_selector(mut self, selector: impl Fn(&Context) -> usize + Send + Sync + 'static) -> Self {
        self.selector = Some(Box::new(selector));
        self
    }

    fn select(&self, context: &Context) -> usize {
        let n = self.children.len();
        if n == 0 {
            return 0;
        }
        if let Some(selector) = &self.selector {
            return selector(context).min(n - 1);
        }
        if context.stability > 0.7 {
            0
        } else if context.local_coherence > 0.5 {
            1.min(n - 1)
        } else {
            2.min(n - 1)
        }
    }
}

impl Strategy for Adaptive {
    fn propose(&self, current: &State, target: &State, context: &Context) -> (Action, f64) {
        if self.children.is_empty() {
            return (Action::maintain(context.stability), 0.5);
        }
        let index = self.select(context);
        self.children[index].propose(current, target, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    fn state(phase: f64) -> State {
        State::new(phase, StdDuration::from_millis(100), 0.5).unwrap()
    }

    fn ctx(stability: f64, local_coherence: f64) -> Context {
        Context {
            density: 0.5,
            stability,
            progress: 0.5,
            local_coherence,
        }
    }

    #[test]
    fn phase_nudge_scales_by_rate() {
        let strategy = PhaseNudge::new(0.5);
        let (action, _) = strategy.propose(&state(0.0), &state(1.0), &ctx(0.5, 0.5));
        assert!((action.value - 0.5).abs() < 1e-9);
    }

    #[test]
    fn energy_aware_maintains_on_small_diff() {
        let strategy = EnergyAware::new(1.0);
        let (action, confidence) = strategy.propose(&state(0.0), &state(0.05), &ctx(0.5, 0.5));
        assert_eq!(action.kind, ActionType::Maintain);
        assert_eq!(confidence, 0.5);
    }

    #[test]
    fn energy_aware_acts_on_large_diff() {
        let strategy = EnergyAware::new(1.0);
        let (action, _) = strategy.propose(&state(0.0), &state(1.0), &ctx(0.5, 0.5));
        assert_eq!(action.kind, ActionType::EnergySave);
    }

    #[test]
    fn pulse_maintains_before_period_elapses() {
        let strategy = Pulse::new(Duration::from_secs(3600), 0.8);
        let (action, _) = strategy.propose(&state(0.0), &state(1.0), &ctx(0.5, 0.5));
        assert_eq!(action.kind, ActionType::Maintain);
    }

    #[test]
    fn pulse_fires_once_past_due_period() {
        let strategy = Pulse::new(Duration::from_nanos(1), 0.8);
        std::thread::sleep(Duration::from_millis(1));
        let (action, _) = strategy.propose(&state(0.0), &state(1.0), &ctx(0.5, 0.5));
        assert_eq!(action.kind, ActionType::Pulse);
    }

    #[test]
    fn adaptive_picks_stable_branch() {
        let adaptive = Adaptive::new(vec![
            Arc::new(PhaseNudge::new(1.0)),
            Arc::new(FrequencyLock::new(1.0)),
            Arc::new(EnergyAware::new(1.0)),
        ]);
        let (action, _) = adaptive.propose(&state(0.0), &state(1.0), &ctx(0.9, 0.1));
        // index 0 is PhaseNudge with rate 1.0 -> adjustment equals raw diff.
        assert_eq!(action.kind, ActionType::PhaseNudge);
    }

    #[test]
    fn adaptive_picks_coherent_branch() {
        let adaptive = Adaptive::new(vec![
            Arc::new(PhaseNudge::new(1.0)),
            Arc::new(FrequencyLock::new(1.0)),
            Arc::new(EnergyAware::new(1.0)),
        ]);
        let (action, _) = adaptive.propose(&state(0.0), &state(1.0), &ctx(0.1, 0.9));
        assert_eq!(action.kind, ActionType::FrequencyLock);
    }

    #[test]
    fn adaptive_falls_back_to_energy_aware_branch() {
        let adaptive = Adaptive::new(vec![
            Arc::new(PhaseNudge::new(1.0)),
            Arc::new(FrequencyLock::new(1.0)),
            Arc::new(EnergyAware::new(1.0)),
        ]);
        let (action, _) = adaptive.propose(&state(0.0), &state(1.0), &ctx(0.1, 0.1));
        assert_eq!(action.kind, ActionType::EnergySave);
    }

    #[test]
    fn custom_selector_overrides_default_rule() {
        let adaptive = Adaptive::new(vec![
            Arc::new(PhaseNudge::new(1.0)),
            Arc::new(EnergyAware::new(1.0)),
        ])
        .with_selector(|_ctx| 1);
        let (action, _) = adaptive.propose(&state(0.0), &state(1.0), &ctx(0.9, 0.9));
        assert_eq!(action.kind, ActionType::EnergySave);
    }
}
