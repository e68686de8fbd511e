//! Process-lifetime simulation context.
//!
//! Every stochastic operation in the engine draws from the context's RNG
//! stream, and every NEAT structural mutation registers with its innovation
//! table. Holding both in one explicitly passed object lets independent
//! simulations coexist and lets tests inject deterministic streams.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hidden-node ids start above the sensor/output id range so initial node
/// ids never collide with split-created ones.
const FIRST_HIDDEN_NODE_ID: u32 = 1000;

/// Global innovation bookkeeping for NEAT genomes.
///
/// Maps each (source, target) connection pair to a monotonically increasing
/// innovation number so that historically identical structural mutations
/// receive identical markings, which is what makes crossover alignment work.
/// The registry lives for the whole process and is never reset, even across
/// generations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InnovationRegistry {
    history: HashMap<(u32, u32), u32>,
    next_innovation: u32,
    next_node_id: u32,
}

impl InnovationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            history: HashMap::new(),
            next_innovation: 0,
            next_node_id: FIRST_HIDDEN_NODE_ID,
        }
    }

    /// Returns the innovation number for a connection, issuing a fresh one
    /// the first time a (source, target) pair is seen.
    pub fn innovation_for(&mut self, source: u32, target: u32) -> u32 {
        let next = &mut self.next_innovation;
        *self.history.entry((source, target)).or_insert_with(|| {
            *next += 1;
            *next
        })
    }

    /// Issues an id for a newly split-in hidden node.
    pub fn fresh_node_id(&mut self) -> u32 {
        self.next_node_id += 1;
        self.next_node_id
    }

    /// Number of distinct innovations issued so far.
    pub fn issued(&self) -> usize {
        self.history.len()
    }
}

/// Mutable context threaded through every stochastic engine operation.
///
/// Tick outcomes are sensitive to RNG call order; there is no replay log,
/// only the stream itself.
#[derive(Debug, Clone)]
pub struct SimContext {
    /// The process-wide random stream.
    pub rng: SmallRng,
    /// The process-wide NEAT innovation table.
    pub innovations: InnovationRegistry,
}

impl SimContext {
    /// Creates a context seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
            innovations: InnovationRegistry::new(),
        }
    }

    /// Creates a context with a fixed seed, for deterministic tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            innovations: InnovationRegistry::new(),
        }
    }

    /// Uniform float in `[min, max)`.
    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..max)
    }

    /// Bernoulli trial at probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.rng.random::<f32>() < p
    }

    /// Fair coin flip.
    #[inline]
    pub fn coin(&mut self) -> bool {
        self.rng.random::<bool>()
    }
}

impl Default for SimContext {
    fn default() -> Self {
        Self::new()
    }
}
