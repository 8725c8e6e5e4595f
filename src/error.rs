//! Crate-wide error taxonomy.

use thiserror::Error;

/// Errors surfaced by construction, configuration, and the agent action cycle.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SwarmError {
    /// An agent could not reserve enough energy for the chosen action.
    #[error("insufficient energy: requested {requested}, available {available}")]
    InsufficientEnergy { requested: f64, available: f64 },

    /// `apply_action` was asked to apply an action type it does not recognize.
    #[error("unknown action type: {0}")]
    UnknownActionType(String),

    /// An action was accepted by the decision cycle but failed to apply.
    #[error("action failed: {0}")]
    ActionFailed(String),

    /// `Swarm::new` was asked for a size outside `1..=1_000_000`.
    #[error("invalid swarm size: {size} (must be in 1..=1_000_000)")]
    InvalidSwarmSize { size: usize },

    /// The caller-supplied goal `State` failed normalisation (non-finite phase).
    #[error("invalid goal state: field `{field}` = {value}")]
    InvalidGoalState { field: &'static str, value: f64 },

    /// A `SwarmConfig` field was out of its valid range.
    #[error("config validation failed: field `{field}` = {value}")]
    ConfigValidation { field: &'static str, value: f64 },

    /// A resource pool could not satisfy a release/request invariant.
    #[error("resource exhausted: pool `{pool}`")]
    ResourceExhausted { pool: String },

    /// A caller supplied a malformed request (e.g. negative duration).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Topology construction could not satisfy the configured neighbor bounds.
    #[error("topology build failed: {0}")]
    TopologyBuild(String),

    /// An operation needs more agents than the swarm currently has.
    #[error("insufficient agents: need {needed}, have {have}")]
    InsufficientAgents { needed: usize, have: usize },
}

/// The crate's standard fallible-operation result alias.
pub type SwarmResult<T> = Result<T, SwarmError>;
