//! `Swarm`: owns the agent arena, builds the neighbor topology, and drives
//! concurrent execution.

mod topology;

pub use topology::{FullyConnected, Ring, RandomTopology, Star, TopologyBuilder};

use std::f64::consts::TAU;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::config::SwarmConfig;
use crate::convergence::ConvergenceMonitor;
use crate::domain::{Adaptive, Agent, AttractorBasin, EnergyAware, FrequencyLock, PhaseNudge, State, Strategy};
use crate::error::{SwarmError, SwarmResult};
use crate::math;
use crate::rng::{DefaultRng, RngSource};

/// Builds a strategy for the `index`-th agent created. Lets callers give
/// different agents different behaviors; defaults to a uniform `Adaptive`
/// blend of the three non-periodic strategies.
pub type StrategyFactory = dyn Fn(usize) -> Arc<dyn Strategy> + Send + Sync;

/// Construction-time collaborators a caller may override. Every field
/// defaults sensibly, matching the spec's "polymorphic collaborators" design
/// note: variants for the common path, trait objects for extensibility.
#[derive(Default)]
pub struct SwarmOptions {
    pub config: Option<SwarmConfig>,
    pub rng: Option<Arc<dyn RngSource>>,
    pub strategy_factory: Option<Arc<StrategyFactory>>,
    pub topology: Option<Arc<dyn TopologyBuilder>>,
}

fn default_strategy_factory(_index: usize) -> Arc<dyn Strategy> {
    Arc::new(Adaptive::new(vec![
        Arc::new(PhaseNudge::new(0.3)),
        Arc::new(FrequencyLock::new(0.5)),
        Arc::new(EnergyAware::new(0.1)),
    ]))
}

struct SwarmInner {
    agents: Vec<Agent>,
    id_index: DashMap<String, usize>,
    goal: State,
    basin: AttractorBasin,
    config: SwarmConfig,
    monitor: ConvergenceMonitor,
    rng: Arc<dyn RngSource>,
}

/// A collection of agents coupled through a shared goal and neighbor
/// topology, run concurrently and observed through a convergence monitor.
#[derive(Clone)]
pub struct Swarm {
    inner: Arc<SwarmInner>,
}

impl Swarm {
    /// Creates a swarm of `size` agents pursuing `goal`, with sensible
    /// auto-scaled defaults for every collaborator not explicitly overridden
    /// in `options`.
    pub fn new(size: usize, goal: State, options: SwarmOptions) -> SwarmResult<Self> {
        if size == 0 || size > 1_000_000 {
            return Err(SwarmError::InvalidSwarmSize { size });
        }

        let config = match options.config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => SwarmConfig::for_size(size),
        };

        let rng: Arc<dyn RngSource> = options.rng.unwrap_or_else(|| Arc::new(DefaultRng::from_entropy()));
        let strategy_factory = options.strategy_factory.unwrap_or_else(|| Arc::new(default_strategy_factory));
        let topology_builder: Arc<dyn TopologyBuilder> = options.topology.unwrap_or_else(|| Arc::new(RandomTopology));

        let basin = AttractorBasin::new(goal, config.basin_strength, config.basin_radius);

        let mut agents: Vec<Agent> = (0..size)
            .map(|i| {
                Agent::new(
                    format!("agent-{i}"),
                    rng.uniform() * TAU,
                    goal.frequency,
                    rng.uniform() * TAU,
                    config.default_influence,
                    config.default_stubbornness,
                    config.initial_energy,
                    config.max_energy,
                    strategy_factory(i),
                )
            })
            .collect();

        let adjacency = topology_builder.build(size, &config, rng.as_ref());
        for (i, neighbors) in adjacency.into_iter().enumerate() {
            agents[i].set_neighbors(neighbors);
        }

        let id_index = DashMap::with_capacity(size);
        for (i, agent) in agents.iter().enumerate() {
            id_index.insert(agent.id().to_string(), i);
        }

        let monitor = ConvergenceMonitor::new(goal.coherence, config.history_capacity);

        Ok(Self {
            inner: Arc::new(SwarmInner {
                agents,
                id_index,
                goal,
                basin,
                config,
                monitor,
                rng,
            }),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.agents.is_empty()
    }

    #[must_use]
    pub fn config(&self) -> &SwarmConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn basin(&self) -> &AttractorBasin {
        &self.inner.basin
    }

    #[must_use]
    pub fn goal(&self) -> State {
        self.inner.goal
    }

    #[must_use]
    pub fn monitor(&self) -> &ConvergenceMonitor {
        &self.inner.monitor
    }

    /// Looks up an agent by its stable id.
    #[must_use]
    pub fn get_agent(&self, id: &str) -> Option<&Agent> {
        let index = *self.inner.id_index.get(id)?;
        self.inner.agents.get(index)
    }

    /// Collects every agent's phase and returns the global Kuramoto order
    /// parameter. Never fails; returns 0 for an empty swarm.
    #[must_use]
    pub fn measure_coherence(&self) -> f64 {
        let phases: Vec<f64> = self.inner.agents.iter().map(Agent::phase).collect();
        math::coherence(&phases)
    }

    /// Randomizes the phase of `floor(fraction * size)` agents, chosen
    /// without replacement, to a uniform value in `[0, 2π)`. Returns the
    /// number of agents disrupted.
    pub fn disrupt_agents(&self, fraction: f64) -> usize {
        let fraction = fraction.clamp(0.0, 1.0);
        let n = self.inner.agents.len();
        let count = ((fraction * n as f64).floor() as usize).min(n);

        let mut indices: Vec<usize> = (0..n).collect();
        for i in 0..count {
            let remaining = n - i;
            let j = i + self.inner.rng.uniform_below(remaining);
            indices.swap(i, j);
        }

        for &idx in &indices[..count] {
            let new_phase = self.inner.rng.uniform() * TAU;
            self.inner.agents[idx].set_phase(new_phase);
        }
        tracing::warn!(count, fraction, "disrupted agents");
        count
    }

    /// Spawns one cooperative task per agent plus a monitor task, and runs
    /// until `cancellation` fires. Returns once every spawned task has
    /// exited.
    pub async fn run(&self, cancellation: Cancellation) -> SwarmResult<()> {
        let size = self.inner.agents.len();
        if size == 0 {
            return Err(SwarmError::InsufficientAgents { needed: 1, have: 0 });
        }

        let span = tracing::info_span!("swarm", size, target_coherence = self.inner.goal.coherence);
        self.run_tasks(cancellation).instrument(span).await
    }

    async fn run_tasks(&self, mut cancellation: Cancellation) -> SwarmResult<()> {
        let size = self.inner.agents.len();
        let mut tasks = JoinSet::new();

        for index in 0..size {
            let swarm = self.clone();
            let mut cancellation = cancellation.clone();
            tasks.spawn(async move {
                swarm.run_agent_cycle_loop(index, &mut cancellation).await;
            });
        }

        {
            let swarm = self.clone();
            let mut cancellation = cancellation.clone();
            tasks.spawn(async move {
                swarm.run_monitor_loop(&mut cancellation).await;
            });
        }

        cancellation.cancelled().await;
        while tasks.join_next().await.is_some() {}
        Ok(())
    }

    async fn run_agent_cycle_loop(&self, index: usize, cancellation: &mut Cancellation) {
        loop {
            if cancellation.is_cancelled() {
                return;
            }
            let neighbor_phases: Vec<f64> = self.inner.agents[index]
                .neighbors()
                .iter()
                .map(|&j| self.inner.agents[j].phase())
                .collect();
            let outcome = self.inner.agents[index].cycle(
                &self.inner.goal,
                &neighbor_phases,
                self.inner.config.max_neighbors,
                self.inner.rng.as_ref(),
            );
            tracing::debug!(
                agent = self.inner.agents[index].id(),
                accepted = outcome.accepted,
                phase = self.inner.agents[index].phase(),
                "agent cycle"
            );

            tokio::select! {
                () = tokio::time::sleep(self.inner.config.cycle_interval) => {},
                () = cancellation.cancelled() => return,
            }
        }
    }

    async fn run_monitor_loop(&self, cancellation: &mut Cancellation) {
        let mut was_converged = false;
        loop {
            if cancellation.is_cancelled() {
                return;
            }
            let coherence = self.measure_coherence();
            self.inner.monitor.record(coherence);
            if self.inner.monitor.is_converged() && !was_converged {
                was_converged = true;
                tracing::info!(coherence, "swarm converged");
            }

            tokio::select! {
                () = tokio::time::sleep(self.inner.config.monitor_interval) => {},
                () = cancellation.cancelled() => return,
            }
        }
    }
}

/// A handle used to signal every task spawned by [`Swarm::run`] to stop at
/// its next suspension point.
#[derive(Clone)]
pub struct CancellationToken {
    tx: watch::Sender<bool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> (Self, Cancellation) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, Cancellation { rx })
    }

    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new().0
    }
}

/// The receiving half of a [`CancellationToken`], cloned into every spawned
/// task.
#[derive(Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

impl Cancellation {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the token has been cancelled.
    pub async fn cancelled(&mut self) {
        while !*self.rx.borrow() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}
