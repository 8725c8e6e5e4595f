//! Layered, validated configuration for swarm construction.
//!
//! Grounded in the teacher's `infrastructure/config` module: a typed struct
//! with `serde` defaults, optionally merged from a YAML fragment and
//! `SWARM_`-prefixed environment variables via `figment`, then validated
//! before it ever reaches `Swarm::new`.

use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{SwarmError, SwarmResult};

/// Numeric knobs consumed by [`crate::swarm::Swarm::new`].
///
/// This is the concrete shape of the "configuration provider" external
/// collaborator named by the core spec: domain-specific tuning *presets*
/// (e.g. a named profile for a particular batching workload) stay out of
/// scope, but the generic numeric tuple itself is part of the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Probability of a random topology edge between any unordered pair.
    pub connection_probability: f64,
    /// Minimum neighbors every agent is force-connected up to.
    pub min_neighbors: usize,
    /// Maximum neighbors an agent may accumulate.
    pub max_neighbors: usize,
    /// Default weight given to the global goal when blending (`influence`).
    pub default_influence: f64,
    /// Attractor basin pull strength in `[0,1]`.
    pub basin_strength: f64,
    /// Attractor basin radius in radians.
    pub basin_radius: f64,
    /// Confidence floor used by strategies that blend in a base rate.
    pub base_confidence: f64,
    /// Default per-agent rejection probability for the stubbornness gate.
    pub default_stubbornness: f64,
    /// Energy an agent's resource pool starts with.
    pub initial_energy: f64,
    /// Energy an agent's resource pool is capped at.
    pub max_energy: f64,
    /// Sleep between an agent's decision cycles.
    pub cycle_interval: Duration,
    /// Sleep between the monitor task's coherence samples.
    pub monitor_interval: Duration,
    /// Bounded coherence-sample history kept by the convergence monitor.
    pub history_capacity: usize,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self::for_size(20)
    }
}

impl SwarmConfig {
    /// Auto-scaled configuration for a swarm of `size` agents.
    ///
    /// Implements the five-tier table from the core spec: as a swarm grows,
    /// per-agent connectivity and coupling strength are dialed back to keep
    /// topology construction and per-cycle contention sub-quadratic.
    #[must_use]
    pub fn for_size(size: usize) -> Self {
        let (connection_probability, min_neighbors, max_neighbors, basin_strength, base_confidence) =
            if size < 10 {
                (0.6, 2, 6, 0.6, 0.6)
            } else if size < 20 {
                (0.4, 3, 8, 0.55, 0.55)
            } else if size < 100 {
                (0.2, 4, 12, 0.5, 0.5)
            } else if size < 1000 {
                (0.05, 4, 16, 0.45, 0.45)
            } else {
                (0.01, 3, 10, 0.4, 0.4)
            };

        Self {
            connection_probability,
            min_neighbors,
            max_neighbors,
            default_influence: 0.5,
            basin_strength,
            basin_radius: std::f64::consts::FRAC_PI_2,
            base_confidence,
            default_stubbornness: 0.05,
            initial_energy: 10.0,
            max_energy: 10.0,
            cycle_interval: Duration::from_millis(50),
            monitor_interval: Duration::from_millis(100),
            history_capacity: 100,
        }
    }

    /// Loads configuration layered as struct defaults -> optional YAML file
    /// -> `SWARM_`-prefixed environment variables, then validates it.
    pub fn load(default: &Self, yaml_path: Option<&std::path::Path>) -> SwarmResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(default));
        if let Some(path) = yaml_path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed("SWARM_"));

        let config: Self = figment
            .extract()
            .map_err(|e| SwarmError::ConfigValidation {
                field: "<figment>",
                value: f64::from(u32::try_from(e.to_string().len()).unwrap_or(0)),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every numeric field against its documented range.
    pub fn validate(&self) -> SwarmResult<()> {
        let checks: &[(&'static str, f64, bool)] = &[
            (
                "connection_probability",
                self.connection_probability,
                (0.0..=1.0).contains(&self.connection_probability),
            ),
            (
                "default_influence",
                self.default_influence,
                (0.0..=1.0).contains(&self.default_influence),
            ),
            (
                "basin_strength",
                self.basin_strength,
                (0.0..=1.0).contains(&self.basin_strength),
            ),
            ("basin_radius", self.basin_radius, self.basin_radius >= 0.0),
            (
                "base_confidence",
                self.base_confidence,
                (0.0..=1.0).contains(&self.base_confidence),
            ),
            ("initial_energy", self.initial_energy, self.initial_energy >= 0.0),
            (
                "max_energy",
                self.max_energy,
                self.max_energy >= self.initial_energy,
            ),
        ];
        for (field, value, ok) in checks {
            if !ok {
                return Err(SwarmError::ConfigValidation { field, value: *value });
            }
        }
        if self.min_neighbors > self.max_neighbors {
            return Err(SwarmError::ConfigValidation {
                field: "min_neighbors",
                value: self.min_neighbors as f64,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_monotone_in_connectivity() {
        let tiny = SwarmConfig::for_size(5);
        let huge = SwarmConfig::for_size(5000);
        assert!(tiny.connection_probability > huge.connection_probability);
    }

    #[test]
    fn default_config_validates() {
        assert!(SwarmConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_neighbor_bounds() {
        let mut config = SwarmConfig::default();
        config.min_neighbors = 20;
        config.max_neighbors = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let mut config = SwarmConfig::default();
        config.connection_probability = 1.5;
        assert!(config.validate().is_err());
    }
}
