//! Heritable phenotype traits.
//!
//! The phenotype is a small continuous trait vector inherited independently
//! of the brain. Traits trade off against each other: fast agents burn more
//! energy, large agents move slower.

use serde::{Deserialize, Serialize};

use super::context::SimContext;

/// Energy cost factor per unit of the speed trait.
const SPEED_ENERGY_MULTIPLIER: f32 = 1.5;
/// Speed penalty factor per unit of the size trait.
const SIZE_SPEED_MULTIPLIER: f32 = 0.8;

/// Continuous trait vector carried by every agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Phenotype {
    /// Movement speed multiplier, clamped to [0.5, 2.0].
    pub speed: f32,
    /// Body size multiplier, clamped to [0.7, 1.5].
    pub size: f32,
    /// Metabolic efficiency, clamped to [0.7, 1.3].
    pub efficiency: f32,
}

impl Phenotype {
    /// Draws a fresh phenotype near the neutral point.
    pub fn random(ctx: &mut SimContext) -> Self {
        Self {
            speed: ctx.range(0.8, 1.2),
            size: ctx.range(0.85, 1.15),
            efficiency: ctx.range(0.9, 1.1),
        }
    }

    /// Effective movement speed: larger bodies are slower.
    pub fn actual_speed(&self) -> f32 {
        self.speed * (2.0 - self.size * SIZE_SPEED_MULTIPLIER)
    }

    /// Effective metabolic rate: speed costs energy, efficiency recovers it.
    pub fn metabolic_rate(&self) -> f32 {
        (self.speed * SPEED_ENERGY_MULTIPLIER) / self.efficiency
    }

    /// On-screen body radius, proportional to size.
    pub fn visual_radius(&self) -> f32 {
        5.0 * self.size
    }

    /// Uniform per-trait coin-flip inheritance.
    pub fn crossover(a: &Phenotype, b: &Phenotype, ctx: &mut SimContext) -> Phenotype {
        Phenotype {
            speed: if ctx.coin() { a.speed } else { b.speed },
            size: if ctx.coin() { a.size } else { b.size },
            efficiency: if ctx.coin() { a.efficiency } else { b.efficiency },
        }
    }

    /// Per-trait Bernoulli mutation with a clamped uniform nudge.
    pub fn mutate(&mut self, rate: f32, ctx: &mut SimContext) {
        if ctx.chance(rate) {
            self.speed = (self.speed + ctx.range(-0.1, 0.1)).clamp(0.5, 2.0);
        }
        if ctx.chance(rate) {
            self.size = (self.size + ctx.range(-0.1, 0.1)).clamp(0.7, 1.5);
        }
        if ctx.chance(rate) {
            self.efficiency = (self.efficiency + ctx.range(-0.1, 0.1)).clamp(0.7, 1.3);
        }
    }
}

impl Default for Phenotype {
    fn default() -> Self {
        Self {
            speed: 1.0,
            size: 1.0,
            efficiency: 1.0,
        }
    }
}
