//! Engine configuration
//!
//! Built once at startup and handed to the generators by reference. Nothing
//! in the engine reads configuration from the environment or from globals.

use aura_core::TargetState;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Probability of a shock event per generated machine sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShockProbability {
    /// No target, or target `fair`
    pub baseline: f64,
    /// Target `good`
    pub good: f64,
    /// Target `poor`
    pub poor: f64,
}

impl Default for ShockProbability {
    fn default() -> Self {
        Self {
            baseline: 0.08,
            good: 0.01,
            poor: 0.25,
        }
    }
}

impl ShockProbability {
    /// Probability to use for a generation call, clamped to `[0, 1]`
    pub fn for_target(&self, target: Option<TargetState>) -> f64 {
        let p = match target {
            Some(TargetState::Good) => self.good,
            Some(TargetState::Poor) => self.poor,
            Some(TargetState::Fair) | None => self.baseline,
        };
        if p.is_finite() {
            p.clamp(0.0, 1.0)
        } else {
            self.baseline.clamp(0.0, 1.0)
        }
    }
}

/// Immutable generation engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Shock event probabilities
    pub shock_probability: ShockProbability,
    /// Seed for the engine's random source; entropy when absent
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the random seed for reproducible runs
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override shock probabilities
    pub fn shock_probability(mut self, shock_probability: ShockProbability) -> Self {
        self.shock_probability = shock_probability;
        self
    }

    /// Random source described by this configuration
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
