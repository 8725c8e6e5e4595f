//! Topology construction: deciding which agents are whose neighbors.

use crate::config::SwarmConfig;
use crate::rng::RngSource;

/// Builds a neighbor adjacency list for `size` agents.
///
/// The default [`RandomTopology`] implements the core spec's random-pair
/// construction; [`FullyConnected`], [`Ring`], and [`Star`] are provided as
/// the alternative builders the spec calls out as injectable.
pub trait TopologyBuilder: Send + Sync {
    fn build(&self, size: usize, config: &SwarmConfig, rng: &dyn RngSource) -> Vec<Vec<usize>>;
}

/// Above this size, the random pairwise pass is skipped in favor of direct
/// random-edge assignment, to keep construction sub-quadratic.
const DIRECT_ASSIGNMENT_THRESHOLD: usize = 50_000;

/// Random-graph construction: for each unordered pair, add a bidirectional
/// edge with probability `connection_probability` (subject to
/// `max_neighbors`); then force-connect any agent still below
/// `min_neighbors`. Above [`DIRECT_ASSIGNMENT_THRESHOLD`], skips the
/// quadratic random pass and assigns `min_neighbors` random edges directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTopology;

impl TopologyBuilder for RandomTopology {
    fn build(&self, size: usize, config: &SwarmConfig, rng: &dyn RngSource) -> Vec<Vec<usize>> {
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); size];

        if size > DIRECT_ASSIGNMENT_THRESHOLD {
            for i in 0..size {
                while adjacency[i].len() < config.min_neighbors {
                    let j = rng.uniform_below(size);
                    if j != i && !adjacency[i].contains(&j) {
                        connect(&mut adjacency, i, j, config.max_neighbors);
                    }
                }
            }
            return adjacency;
        }

        for i in 0..size {
            for j in (i + 1)..size {
                if adjacency[i].len() >= config.max_neighbors || adjacency[j].len() >= config.max_neighbors {
                    continue;
                }
                if rng.uniform() < config.connection_probability {
                    connect(&mut adjacency, i, j, config.max_neighbors);
                }
            }
        }

        for i in 0..size {
            let mut guard = 0;
            while adjacency[i].len() < config.min_neighbors.min(size.saturating_sub(1)) && guard < size * 2 {
                guard += 1;
                let j = rng.uniform_below(size);
                if j != i && !adjacency[i].contains(&j) && adjacency[j].len() < config.max_neighbors {
                    connect(&mut adjacency, i, j, config.max_neighbors);
                }
            }
        }

        adjacency
    }
}

fn connect(adjacency: &mut [Vec<usize>], i: usize, j: usize, max_neighbors: usize) {
    if adjacency[i].len() < max_neighbors && !adjacency[i].contains(&j) {
        adjacency[i].push(j);
    }
    if adjacency[j].len() < max_neighbors && !adjacency[j].contains(&i) {
        adjacency[j].push(i);
    }
}

/// Every agent is neighbors with every other agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullyConnected;

impl TopologyBuilder for FullyConnected {
    fn build(&self, size: usize, _config: &SwarmConfig, _rng: &dyn RngSource) -> Vec<Vec<usize>> {
        (0..size).map(|i| (0..size).filter(|&j| j != i).collect()).collect()
    }
}

/// Each agent is neighbors with its immediate predecessor and successor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ring;

impl TopologyBuilder for Ring {
    fn build(&self, size: usize, _config: &SwarmConfig, _rng: &dyn RngSource) -> Vec<Vec<usize>> {
        if size < 2 {
            return vec![Vec::new(); size];
        }
        (0..size)
            .map(|i| {
                let prev = (i + size - 1) % size;
                let next = (i + 1) % size;
                if prev == next {
                    vec![prev]
                } else {
                    vec![prev, next]
                }
            })
            .collect()
    }
}

/// Agent 0 is neighbors with everyone; everyone else is neighbors with only
/// agent 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Star;

impl TopologyBuilder for Star {
    fn build(&self, size: usize, _config: &SwarmConfig, _rng: &dyn RngSource) -> Vec<Vec<usize>> {
        if size == 0 {
            return Vec::new();
        }
        let mut adjacency = vec![Vec::new(); size];
        for i in 1..size {
            adjacency[0].push(i);
            adjacency[i].push(0);
        }
        adjacency
    }
}
