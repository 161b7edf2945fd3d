//! Run configuration, presets and validation.
//!
//! Raw configuration uses signed integers so that negative inputs (from a
//! JSON file or the command line) surface as
//! [`BlottoError::InvalidConfiguration`] instead of a parse failure.
//! [`GameConfig::validate`] turns the raw form into a checked [`Game`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BlottoError, BlottoResult};
use crate::exact::DEFAULT_TOP_K;
use crate::game::Battlefields;

/// Default cap on the size of each enumerated strategy space.
pub const DEFAULT_MAX_STRATEGIES: u64 = 5_000_000;
pub const DEFAULT_POOL_SIZE: usize = 5000;
pub const DEFAULT_ITERATIONS: usize = 5000;

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Five unit-valued battlefields, 15 defenders against 16 attackers.
    Base,
    /// Eight weighted battlefields, 17 defenders against 16 attackers.
    Extended,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Base => "base",
            Preset::Extended => "extended",
        }
    }

    pub fn game(&self) -> GameConfig {
        match self {
            Preset::Base => GameConfig {
                attacker_budget: 16,
                defender_budget: 15,
                capacities: vec![4, 3, 6, 4, 3],
                values: None,
            },
            Preset::Extended => GameConfig {
                attacker_budget: 16,
                defender_budget: 17,
                capacities: vec![4, 4, 4, 4, 4, 1, 2, 1],
                values: Some(vec![2.0, 3.0, 4.0, 2.0, 3.0, 4.0, 4.0, 4.0]),
            },
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// Budgets and battlefields as supplied by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub attacker_budget: i64,
    pub defender_budget: i64,
    pub capacities: Vec<i64>,
    #[serde(default)]
    pub values: Option<Vec<f64>>,
}

/// A validated game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub attacker_budget: u32,
    pub defender_budget: u32,
    pub battlefields: Battlefields,
}

fn checked_units(name: &str, raw: i64) -> BlottoResult<u32> {
    if raw < 0 {
        return Err(BlottoError::InvalidConfiguration(format!(
            "{} must not be negative, got {}",
            name, raw
        )));
    }
    u32::try_from(raw).map_err(|_| {
        BlottoError::InvalidConfiguration(format!("{} is too large: {}", name, raw))
    })
}

impl GameConfig {
    pub fn validate(&self) -> BlottoResult<Game> {
        let attacker_budget = checked_units("Attacker budget", self.attacker_budget)?;
        let defender_budget = checked_units("Defender budget", self.defender_budget)?;

        let capacities = self
            .capacities
            .iter()
            .enumerate()
            .map(|(i, &c)| checked_units(&format!("Capacity of battlefield {}", i + 1), c))
            .collect::<BlottoResult<Vec<u32>>>()?;

        let battlefields = Battlefields::new(&capacities, self.values.as_deref())?;

        Ok(Game {
            attacker_budget,
            defender_budget,
            battlefields,
        })
    }
}

// ---------------------------------------------------------------------------
// Exact path
// ---------------------------------------------------------------------------

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_max_strategies() -> u64 {
    DEFAULT_MAX_STRATEGIES
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactConfig {
    #[serde(flatten)]
    pub game: GameConfig,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_max_strategies")]
    pub max_strategies: u64,
}

impl ExactConfig {
    pub fn new(game: GameConfig) -> Self {
        ExactConfig {
            game,
            top_k: DEFAULT_TOP_K,
            max_strategies: DEFAULT_MAX_STRATEGIES,
        }
    }

    pub fn from_preset(preset: Preset) -> Self {
        Self::new(preset.game())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> BlottoResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn validate(&self) -> BlottoResult<Game> {
        if self.top_k == 0 {
            return Err(BlottoError::InvalidConfiguration(
                "Top-K must be positive".to_string(),
            ));
        }
        if self.max_strategies == 0 {
            return Err(BlottoError::InvalidConfiguration(
                "Strategy limit must be positive".to_string(),
            ));
        }
        self.game.validate()
    }
}

// ---------------------------------------------------------------------------
// Approximate path
// ---------------------------------------------------------------------------

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproxConfig {
    #[serde(flatten)]
    pub game: GameConfig,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub regret_tolerance: Option<f64>,
}

impl ApproxConfig {
    pub fn new(game: GameConfig) -> Self {
        ApproxConfig {
            game,
            pool_size: DEFAULT_POOL_SIZE,
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            regret_tolerance: None,
        }
    }

    pub fn from_preset(preset: Preset) -> Self {
        Self::new(preset.game())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> BlottoResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn validate(&self) -> BlottoResult<Game> {
        if self.pool_size == 0 {
            return Err(BlottoError::InvalidConfiguration(
                "Pool size must be positive".to_string(),
            ));
        }
        if self.iterations == 0 {
            return Err(BlottoError::InvalidConfiguration(
                "Iteration count must be positive".to_string(),
            ));
        }
        if let Some(tol) = self.regret_tolerance {
            if !tol.is_finite() || tol < 0.0 {
                return Err(BlottoError::InvalidConfiguration(format!(
                    "Regret tolerance must be a non-negative number, got {}",
                    tol
                )));
            }
        }
        self.game.validate()
    }
}
