//! Simulation parameters.
//!
//! Every tunable the engine reads lives here. The binary owns a `Params`
//! value and passes it into each tick, so UI sliders take effect on the
//! next tick without any command plumbing.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::brain::BrainKind;

/// Errors from the config file layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid parameter JSON.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Preset arena dimensions. Population and food caps scale with area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaSize {
    /// 800 x 600
    Small,
    /// 1280 x 720
    Medium,
    /// 1920 x 1080
    Large,
    /// 2560 x 1440
    Huge,
}

impl ArenaSize {
    /// Arena dimensions in world units.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            ArenaSize::Small => (800.0, 600.0),
            ArenaSize::Medium => (1280.0, 720.0),
            ArenaSize::Large => (1920.0, 1080.0),
            ArenaSize::Huge => (2560.0, 1440.0),
        }
    }

    /// Area factor relative to the medium arena; scales population targets
    /// and food caps.
    pub fn scale(self) -> f32 {
        match self {
            ArenaSize::Small => 0.5,
            ArenaSize::Medium => 1.0,
            ArenaSize::Large => 2.25,
            ArenaSize::Huge => 4.0,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ArenaSize::Small => "Small",
            ArenaSize::Medium => "Medium",
            ArenaSize::Large => "Large",
            ArenaSize::Huge => "Huge",
        }
    }
}

/// Relative weights for the brain variant assigned to randomly spawned
/// agents. They need not sum to one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BrainMix {
    /// Weight of the fixed-topology feed-forward brain.
    pub feed_forward: f32,
    /// Weight of the recurrent brain.
    pub recurrent: f32,
    /// Weight of the NEAT evolving-topology brain.
    pub neat: f32,
}

impl BrainMix {
    /// Picks a brain kind from the weights using `roll` in `[0, 1)`.
    pub fn pick(&self, roll: f32) -> BrainKind {
        let total = (self.feed_forward + self.recurrent + self.neat).max(f32::EPSILON);
        let r = roll * total;
        if r < self.feed_forward {
            BrainKind::FeedForward
        } else if r < self.feed_forward + self.recurrent {
            BrainKind::Recurrent
        } else {
            BrainKind::Neat
        }
    }
}

/// Simulation parameters that control arena, agents, genetics and seasons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Arena size preset.
    pub arena: ArenaSize,
    /// Spatial grid cell size in world units.
    pub grid_cell_size: f32,

    /// Maximum distance agents can sense entities.
    pub vision_radius: f32,
    /// Energy ceiling for every agent.
    pub max_energy: f32,
    /// Energy of a freshly spawned agent.
    pub start_energy: f32,
    /// Base metabolic drain per second, before phenotype/species/season
    /// modifiers.
    pub metabolism_rate: f32,
    /// Rotation speed factor for the differential drive (radians/sec at
    /// full differential).
    pub rotation_speed: f32,
    /// Forward speed in world units/sec at full throttle, before the
    /// phenotype multiplier.
    pub move_speed: f32,

    /// Energy gained from eating a fruit (herbivores get a bonus on top).
    pub fruit_energy: f32,
    /// Energy lost to a poison (scavengers instead gain from it).
    pub poison_damage: f32,
    /// Distance within which fruit/poison are consumed.
    pub eat_radius: f32,

    /// Baseline fruit count on the medium arena; scaled by arena and season.
    pub fruit_cap: usize,
    /// Baseline poison count on the medium arena; scaled by arena and season.
    pub poison_cap: usize,

    /// Target population on the medium arena; scaled by arena size.
    pub target_population: usize,
    /// Living-population threshold at or below which dying agents become
    /// eligible for the elite archive.
    pub low_population: usize,
    /// Minimum fitness for a dying agent to enter the elite archive.
    pub archive_fitness_bar: f32,
    /// Maximum elite records kept when assembling the next generation.
    pub archive_cap: usize,

    /// Energy threshold both partners need before mating.
    pub mating_threshold: f32,
    /// Energy each parent pays at mating.
    pub mating_cost: f32,
    /// Mating range in world units.
    pub mating_range: f32,
    /// Brain mutation probability applied to newborns.
    pub child_brain_mutation_rate: f32,
    /// Brain mutation noise applied to newborns.
    pub child_brain_mutation_power: f32,
    /// Phenotype mutation probability applied to newborns.
    pub child_phenotype_mutation_rate: f32,

    /// Global multiplier on all mutation probabilities.
    pub mutation_multiplier: f32,

    /// Fruit energy multiplier for herbivores.
    pub herbivore_fruit_bonus: f32,
    /// Fraction of `poison_damage` a scavenger gains instead of losing.
    pub scavenger_poison_gain: f32,
    /// Energy a predator steals from adjacent prey.
    pub predator_steal: f32,
    /// Metabolism multiplier for predators.
    pub predator_metabolism: f32,

    /// Whether brains learn from rewards during their lifetime.
    pub lifetime_learning: bool,
    /// Learning rate for the reward-driven weight adjustment.
    pub learning_rate: f32,
    /// Energy lost when colliding with an obstacle.
    pub collision_energy_penalty: f32,
    /// Scale on the negative learning signal from collisions.
    pub collision_learning_boost: f32,

    /// Number of obstacles generated by the random layout.
    pub obstacle_count: usize,

    /// Season length in seconds.
    pub season_duration: f32,

    /// Whether agents carry the pheromone sense/emission channel
    /// (7 inputs / 3 outputs instead of 6 / 2).
    pub pheromone_enabled: bool,

    /// Brain variant weights for randomly spawned agents.
    pub brain_mix: BrainMix,
    /// Hidden layer width for feed-forward and recurrent brains.
    pub hidden_size: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            arena: ArenaSize::Medium,
            grid_cell_size: 50.0,
            vision_radius: 200.0,
            max_energy: 200.0,
            start_energy: 100.0,
            metabolism_rate: 15.0,
            rotation_speed: 3.0,
            move_speed: 120.0,
            fruit_energy: 50.0,
            poison_damage: 50.0,
            eat_radius: 15.0,
            fruit_cap: 40,
            poison_cap: 15,
            target_population: 80,
            low_population: 20,
            archive_fitness_bar: 5.0,
            archive_cap: 30,
            mating_threshold: 120.0,
            mating_cost: 60.0,
            mating_range: 50.0,
            child_brain_mutation_rate: 0.1,
            child_brain_mutation_power: 0.15,
            child_phenotype_mutation_rate: 0.1,
            mutation_multiplier: 1.0,
            herbivore_fruit_bonus: 1.5,
            scavenger_poison_gain: 0.5,
            predator_steal: 30.0,
            predator_metabolism: 1.2,
            lifetime_learning: true,
            learning_rate: 0.02,
            collision_energy_penalty: 5.0,
            collision_learning_boost: 1.5,
            obstacle_count: 5,
            season_duration: 45.0,
            pheromone_enabled: false,
            brain_mix: BrainMix {
                feed_forward: 0.5,
                recurrent: 0.25,
                neat: 0.25,
            },
            hidden_size: 8,
        }
    }
}

impl Params {
    /// Number of brain inputs under the current configuration.
    pub fn input_size(&self) -> usize {
        if self.pheromone_enabled { 7 } else { 6 }
    }

    /// Number of brain outputs under the current configuration.
    pub fn output_size(&self) -> usize {
        if self.pheromone_enabled { 3 } else { 2 }
    }

    /// Arena width in world units.
    pub fn arena_width(&self) -> f32 {
        self.arena.dimensions().0
    }

    /// Arena height in world units.
    pub fn arena_height(&self) -> f32 {
        self.arena.dimensions().1
    }

    /// Population target scaled by arena size.
    pub fn scaled_population(&self) -> usize {
        ((self.target_population as f32 * self.arena.scale()).round() as usize).max(4)
    }

    /// Fruit cap scaled by arena size (seasonal factor applied by the world).
    pub fn scaled_fruit_cap(&self) -> usize {
        (self.fruit_cap as f32 * self.arena.scale()).round() as usize
    }

    /// Poison cap scaled by arena size (seasonal factor applied by the world).
    pub fn scaled_poison_cap(&self) -> usize {
        (self.poison_cap as f32 * self.arena.scale()).round() as usize
    }

    /// Loads parameters from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Saves parameters to a JSON file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
