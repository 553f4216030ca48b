use crate::common::utils::check_probability;
use crate::error::{GridError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Dynamic programming parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub gamma: f64,
    pub max_iter: usize,
    pub threshold: f64,
    /// Probability that the intended action executes in the windy variants.
    pub windy: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            max_iter: 100,
            threshold: 1e-3,
            windy: 0.5,
        }
    }
}

/// Monte Carlo episode parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EpisodeConfig {
    pub gamma: f64,
    /// Probability that the policy's action is kept.
    pub windy: f64,
    /// Episodes longer than this are truncated.
    pub max_steps: usize,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            windy: 0.9,
            max_steps: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub solver: SolverConfig,
    pub episodes: EpisodeConfig,
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        for gamma in [self.solver.gamma, self.episodes.gamma] {
            if !(gamma > 0. && gamma <= 1.) {
                return Err(GridError::InvalidDiscount { value: gamma });
            }
        }
        if !(self.solver.threshold > 0.) {
            return Err(GridError::InvalidSetting {
                name: "threshold",
                value: self.solver.threshold,
            });
        }
        if self.solver.max_iter == 0 {
            return Err(GridError::InvalidSetting {
                name: "max_iter",
                value: 0.,
            });
        }
        check_probability(self.solver.windy)?;
        check_probability(self.episodes.windy)?;

        Ok(())
    }
}
