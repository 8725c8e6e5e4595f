//! kuramoto-swarm - decentralized phase-coupling swarm coordination.
//!
//! A collection of autonomous agents, each an oscillator with a phase and
//! frequency, that coordinate toward a shared goal purely through pairwise
//! neighbor coupling -- no central coordinator observes or directs the whole.
//! Built around the Kuramoto model of coupled oscillators: global coherence
//! emerges from local phase-nudging decisions.

pub mod config;
pub mod convergence;
pub mod domain;
pub mod error;
pub mod math;
pub mod rng;
pub mod swarm;

pub use config::SwarmConfig;
pub use convergence::{ConvergenceMonitor, Statistics};
pub use domain::{
    Action, ActionType, Adaptive, Agent, AttractorBasin, Context, CycleOutcome, DecisionMaker,
    EnergyAware, FrequencyLock, GoalBlender, PhaseNudge, Pulse, ResourcePool, State, Strategy,
};
pub use error::{SwarmError, SwarmResult};
pub use rng::{DefaultRng, RngSource};
pub use swarm::{
    Cancellation, CancellationToken, FullyConnected, RandomTopology, Ring, Star, Swarm,
    SwarmOptions, TopologyBuilder,
};
