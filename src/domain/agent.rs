//! `Agent`: an autonomous oscillator running the propose/decide/apply cycle.
//!
//! Per the arena redesign note (see DESIGN.md), an agent never owns or
//! references its neighbors directly. It holds their arena indices; the
//! owning [`crate::swarm::Swarm`] resolves those indices to phases each
//! cycle and hands the snapshot back in. This sidesteps cyclic ownership
//! entirely and keeps neighbor lookup O(1).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::action::{Action, ActionType};
use crate::domain::attractor::AttractorBasin;
use crate::domain::context::Context;
use crate::domain::decision::DecisionMaker;
use crate::domain::resource_pool::ResourcePool;
use crate::domain::state::State;
use crate::domain::strategy::Strategy;
use crate::error::{SwarmError, SwarmResult};
use crate::math::{self, AtomicF64};
use crate::rng::RngSource;

use super::blender::GoalBlender;

/// Below this fraction of a requested reservation, the decision cycle treats
/// the action as unaffordable and falls back to `maintain`. An unexplained
/// magic number in the source system, reproduced here verbatim -- see
/// DESIGN.md.
const MIN_AFFORDABLE_FRACTION: f64 = 0.8;

/// The outcome of one full decision cycle: what was decided, whether it was
/// actually committed, and any error encountered while committing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutcome {
    pub action: Action,
    pub accepted: bool,
    pub error: Option<SwarmError>,
}

/// An autonomous oscillator: identity, mutable phase/frequency/energy/traits,
/// a read-only neighbor index set, and its decision-making collaborators.
pub struct Agent {
    id: String,
    phase: AtomicF64,
    frequency: AtomicF64,
    local_goal: AtomicF64,
    influence: AtomicF64,
    stubbornness: AtomicF64,
    energy: ResourcePool,
    context: Mutex<Context>,
    neighbors: Vec<usize>,
    strategy: Arc<dyn Strategy>,
    decision_maker: DecisionMaker,
    blender: GoalBlender,
}

impl Agent {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        initial_phase: f64,
        frequency: Duration,
        local_goal: f64,
        influence: f64,
        stubbornness: f64,
        initial_energy: f64,
        max_energy: f64,
        strategy: Arc<dyn Strategy>,
    ) -> Self {
        Self {
            id: id.into(),
            phase: AtomicF64::new(math::wrap(initial_phase)),
            frequency: AtomicF64::new(frequency.as_secs_f64()),
            local_goal: AtomicF64::new(math::wrap(local_goal)),
            influence: AtomicF64::new(influence.clamp(0.0, 1.0)),
            stubbornness: AtomicF64::new(stubbornness.clamp(0.0, 1.0)),
            energy: ResourcePool::new(initial_energy, max_energy),
            context: Mutex::new(Context::isolated()),
            neighbors: Vec::new(),
            strategy,
            decision_maker: DecisionMaker::new(),
            blender: GoalBlender::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn phase(&self) -> f64 {
        self.phase.load()
    }

    /// Sets phase, wrapping the input into `[0,2π)`.
    pub fn set_phase(&self, phase: f64) {
        self.phase.store(math::wrap(phase));
    }

    #[must_use]
    pub fn frequency(&self) -> Duration {
        Duration::from_secs_f64(self.frequency.load().max(0.0))
    }

    pub fn set_frequency(&self, frequency: Duration) {
        self.frequency.store(frequency.as_secs_f64());
    }

    #[must_use]
    pub fn local_goal(&self) -> f64 {
        self.local_goal.load()
    }

    pub fn set_local_goal(&self, phase: f64) {
        self.local_goal.store(math::wrap(phase));
    }

    #[must_use]
    pub fn influence(&self) -> f64 {
        self.influence.load()
    }

    pub fn set_influence(&self, influence: f64) {
        self.influence.store(influence.clamp(0.0, 1.0));
    }

    #[must_use]
    pub fn stubbornness(&self) -> f64 {
        self.stubbornness.load()
    }

    pub fn set_stubbornness(&self, stubbornness: f64) {
        self.stubbornness.store(stubbornness.clamp(0.0, 1.0));
    }

    #[must_use]
    pub fn energy(&self) -> f64 {
        self.energy.available()
    }

    #[must_use]
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// Called once by the swarm at topology-build time. Not mutated again
    /// while `Swarm::run` is in progress.
    pub(crate) fn set_neighbors(&mut self, neighbors: Vec<usize>) {
        self.neighbors = neighbors;
    }

    /// Step 1 of the decision cycle: rebuilds the local `Context` from a
    /// snapshot of neighbor phases.
    pub fn refresh_context(&self, neighbor_phases: &[f64], max_neighbors_assumed: usize) -> Context {
        let context = Context::from_neighbors(self.phase.load(), neighbor_phases, max_neighbors_assumed);
        *self.context.lock().expect("context mutex poisoned") = context;
        context
    }

    #[must_use]
    pub fn context(&self) -> Context {
        *self.context.lock().expect("context mutex poisoned")
    }

    /// Builds this agent's local-goal `State` and blends it with the global
    /// goal using `influence` as weight (step 2).
    #[must_use]
    pub fn blended_target(&self, global_goal: &State) -> State {
        let context = self.context();
        let local = State {
            phase: self.local_goal.load(),
            frequency: self.frequency(),
            coherence: context.local_coherence,
        };
        self.blender.blend(&local, global_goal, self.influence.load())
    }

    /// Steps 2-8 of the decision cycle: blends goals, asks the strategy for a
    /// proposal, assembles candidates, decides, and gates the result through
    /// a speculative affordability check, a stubbornness draw, and a
    /// confidence draw. Does not mutate phase -- call [`Self::apply_action`]
    /// with the returned action to commit an accepted proposal.
    pub fn propose_adjustment(&self, global_goal: &State, rng: &dyn RngSource) -> (Action, bool) {
        let context = self.context();
        let current = State {
            phase: self.phase.load(),
            frequency: self.frequency(),
            coherence: context.local_coherence,
        };
        let target = self.blended_target(global_goal);

        let (proposed, strategy_confidence) = self.strategy.propose(&current, &target, &context);
        let candidates = [proposed, Action::maintain(context.stability)];
        let (chosen, decision_confidence) = self.decision_maker.decide(&current, &candidates);
        let confidence = strategy_confidence.max(decision_confidence);

        if chosen.kind != ActionType::Maintain {
            let granted = self.energy.request(chosen.cost);
            self.energy.release(granted);
            if granted < MIN_AFFORDABLE_FRACTION * chosen.cost {
                return (Action::maintain(context.stability), false);
            }
        }

        if rng.uniform() < self.stubbornness.load() {
            return (Action::maintain(context.stability), false);
        }

        if rng.uniform() < confidence {
            (chosen, true)
        } else {
            (Action::maintain(context.stability), false)
        }
    }

    /// Commits `action`: mutates phase for every non-`maintain` action type,
    /// requesting its declared cost from the energy pool up front. Returns
    /// `(success, cost_paid, error)`. Never mutates phase on failure.
    pub fn apply_action(&self, action: Action) -> (bool, f64, Option<SwarmError>) {
        if action.kind == ActionType::Maintain {
            let granted = self.energy.request(action.cost);
            return (true, granted, None);
        }

        let granted = self.energy.request(action.cost);
        if granted < action.cost {
            self.energy.release(granted);
            return (
                false,
                0.0,
                Some(SwarmError::InsufficientEnergy {
                    requested: action.cost,
                    available: granted,
                }),
            );
        }

        let new_phase = math::wrap(self.phase.load() + action.value);
        self.phase.store(new_phase);
        (true, action.cost, None)
    }

    pub fn release_energy(&self, amount: f64) {
        self.energy.release(amount);
    }

    /// Runs one complete decision cycle against a fresh neighbor snapshot:
    /// refresh context, propose, and -- if accepted -- apply. This is what
    /// [`crate::swarm::Swarm::run`] drives on each agent's task.
    pub fn cycle(
        &self,
        global_goal: &State,
        neighbor_phases: &[f64],
        max_neighbors_assumed: usize,
        rng: &dyn RngSource,
    ) -> CycleOutcome {
        self.refresh_context(neighbor_phases, max_neighbors_assumed);
        let (proposed, gate_accepted) = self.propose_adjustment(global_goal, rng);
        if !gate_accepted {
            return CycleOutcome {
                action: proposed,
                accepted: false,
                error: None,
            };
        }
        let (applied, _cost, error) = self.apply_action(proposed);
        CycleOutcome {
            action: proposed,
            accepted: applied,
            error,
        }
    }

    /// `force`-driven adjustment toward an attractor basin, bypassing the
    /// strategy layer entirely -- used by callers who want pure basin
    /// attraction instead of strategy-mediated proposals.
    #[must_use]
    pub fn basin_adjustment(&self, basin: &AttractorBasin) -> f64 {
        let current = State {
            phase: self.phase.load(),
            frequency: self.frequency(),
            coherence: self.context().local_coherence,
        };
        basin.optimal_adjustment(&current)
    }
}
