//! # Vivarium - Evolutionary Arena Simulation
//!
//! A bounded 2D arena populated by agents that sense fruit, poison, obstacles
//! and each other, act through interchangeable neural controllers, and
//! reproduce sexually with inheritance and mutation. Population behaviour
//! evolves across generations without any external training signal.
//!
//! ## Features
//!
//! - Three brain representations: feed-forward, recurrent, and NEAT-style
//!   evolving topology with innovation tracking
//! - Sexual reproduction with per-parameter crossover and mutation
//! - Heritable phenotype traits (speed, size, metabolic efficiency)
//! - Uniform-grid spatial indexing rebuilt every tick
//! - Three species with distinct feeding rules, plus seasonal modifiers
//! - Generational selection with a bounded elite archive
//! - Optional lifetime learning from food/collision rewards
//! - Real-time visualization with egui/macroquad
//!
//! ## Core Modules
//!
//! - [`simulation::world`] - Tick loop, interactions, and generation control
//! - [`simulation::brain`] - The three brain variants and their genetics
//! - [`simulation::genome`] - NEAT genome engine and innovation registry
//! - [`simulation::agent`] - Agent state, species, and fitness
//! - [`simulation::grid`] - Spatial bucket grid for neighbor queries

/// Core simulation logic and data structures.
pub mod simulation {
    /// Agent state, species rules, and fitness scoring.
    pub mod agent;
    /// Neural controllers: feed-forward, recurrent, and NEAT brains.
    pub mod brain;
    /// Process-lifetime context: RNG stream and innovation registry.
    pub mod context;
    /// NEAT genome representation and topology mutation operators.
    pub mod genome;
    /// Uniform bucket grid for spatial queries.
    pub mod grid;
    /// Obstacle shapes and layout generators.
    pub mod obstacle;
    /// Simulation parameters and the config file layer.
    pub mod params;
    /// Heritable phenotype traits.
    pub mod phenotype;
    /// Seasonal cycle and its environmental modifiers.
    pub mod season;
    /// Aggregate statistics and per-generation history.
    pub mod stats;
    /// The world: entities, tick loop, and god-mode commands.
    pub mod world;
}
