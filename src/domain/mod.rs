//! Domain model: the data and decision-making types the core operates on.
//!
//! Pure domain entities with business logic and validation rules. Framework
//! agnostic: no tokio, no networking, no persistence.

pub mod action;
pub mod agent;
pub mod attractor;
pub mod blender;
pub mod context;
pub mod decision;
pub mod resource_pool;
pub mod state;
pub mod strategy;

pub use action::{Action, ActionType};
pub use agent::{Agent, CycleOutcome};
pub use attractor::AttractorBasin;
pub use blender::GoalBlender;
pub use context::Context;
pub use decision::DecisionMaker;
pub use resource_pool::ResourcePool;
pub use state::State;
pub use strategy::{Adaptive, EnergyAware, FrequencyLock, PhaseNudge, Pulse, Strategy};
