//! Seasonal cycle and its environmental modifiers.

use serde::{Deserialize, Serialize};

/// The four seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    /// Abundant food, mild weather.
    Spring,
    /// Baseline, slightly higher activity cost.
    Summer,
    /// Food thins out, poison peaks.
    Autumn,
    /// Scarce food, expensive metabolism.
    Winter,
}

impl Season {
    /// Fruit cap multiplier for this season.
    pub fn fruit_factor(&self) -> f32 {
        match self {
            Season::Spring => 1.5,
            Season::Summer => 1.0,
            Season::Autumn => 0.7,
            Season::Winter => 0.3,
        }
    }

    /// Poison cap multiplier for this season.
    pub fn poison_factor(&self) -> f32 {
        match self {
            Season::Spring => 0.8,
            Season::Summer => 1.0,
            Season::Autumn => 1.2,
            Season::Winter => 0.6,
        }
    }

    /// Metabolic drain multiplier for this season.
    pub fn metabolism_factor(&self) -> f32 {
        match self {
            Season::Spring => 1.0,
            Season::Summer => 1.1,
            Season::Autumn => 1.0,
            Season::Winter => 1.25,
        }
    }

    /// The season that follows this one.
    pub fn next(&self) -> Season {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

/// Tracks the current season against the configured duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonClock {
    /// The season in effect.
    pub current: Season,
    /// Seconds elapsed within the current season.
    pub elapsed: f32,
}

impl SeasonClock {
    /// Starts a clock in spring.
    pub fn new() -> Self {
        Self {
            current: Season::Spring,
            elapsed: 0.0,
        }
    }

    /// Advances the clock; returns true when the season rolled over.
    pub fn advance(&mut self, dt: f32, duration: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= duration.max(1.0) {
            self.skip();
            true
        } else {
            false
        }
    }

    /// Jumps to the next season immediately.
    pub fn skip(&mut self) {
        self.current = self.current.next();
        self.elapsed = 0.0;
    }

    /// Fraction of the season elapsed, in [0, 1].
    pub fn progress(&self, duration: f32) -> f32 {
        (self.elapsed / duration.max(1.0)).clamp(0.0, 1.0)
    }
}

impl Default for SeasonClock {
    fn default() -> Self {
        Self::new()
    }
}
