//! Configuration types for computer players
//!
//! Level 4 - Utilities and configuration

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use hexai_core::GraphSearch;
use hexai_mcts::RolloutConfig;
use serde::{Deserialize, Serialize};

/// Fraction of a requested time budget actually handed to the search
pub const TIME_SAFETY_FACTOR: f64 = 0.99;

/// Seconds per move when nothing else is configured
pub const DEFAULT_TIME_BUDGET_SECS: f64 = 90.0;

/// Which engine a computer player uses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiType {
    /// Pick per position: opening, mirroring, graph or rollouts
    #[default]
    Combo,
    /// Always the two-ply graph search
    Graph,
    /// Always the rollout search
    Rollout,
}

impl fmt::Display for AiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiType::Combo => write!(f, "combo"),
            AiType::Graph => write!(f, "graph"),
            AiType::Rollout => write!(f, "rollout"),
        }
    }
}

impl FromStr for AiType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combo" => Ok(AiType::Combo),
            "graph" => Ok(AiType::Graph),
            "rollout" | "mcts" => Ok(AiType::Rollout),
            other => anyhow::bail!("Unknown AI type: {other} (expected combo, graph or rollout)"),
        }
    }
}

/// AI configuration for a computer player
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub ai_type: AiType,
    /// Requested seconds per move; the search gets `TIME_SAFETY_FACTOR` of it
    pub time_budget_secs: f64,
    /// Worker count for both engines (None = rayon thread count)
    pub workers: Option<usize>,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            ai_type: AiType::Combo,
            time_budget_secs: DEFAULT_TIME_BUDGET_SECS,
            workers: None,
            seed: None,
        }
    }
}

impl AiConfig {
    /// Create config for a given engine
    pub fn new(ai_type: AiType) -> Self {
        Self {
            ai_type,
            ..Default::default()
        }
    }

    /// Load config from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn with_time_budget(mut self, secs: f64) -> Self {
        self.time_budget_secs = secs;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Search budget: the requested seconds less the safety margin.
    /// Negative or NaN budgets become zero.
    pub fn time_budget(&self) -> Duration {
        let secs = (self.time_budget_secs * TIME_SAFETY_FACTOR).max(0.0);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Settings for the rollout engine
    pub fn rollout_config(&self) -> RolloutConfig {
        let mut config = RolloutConfig::default().with_time_budget(self.time_budget());
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }

    /// A graph engine with this config's seed and workers
    pub fn graph_search(&self) -> GraphSearch {
        let search = match self.seed {
            Some(seed) => GraphSearch::with_seed(seed),
            None => GraphSearch::with_seed(rand::random()),
        };
        match self.workers {
            Some(workers) => search.with_workers(workers),
            None => search,
        }
    }
}
