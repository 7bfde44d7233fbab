use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SearchConfig {
    pub limits: LimitsConfig,
    pub store: StoreConfig,
    pub ranking: RankingConfig,
    pub dedupe: DedupeConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LimitsConfig {
    /// Hard cap on returned results, whatever the caller asks for
    pub max_results: usize,
    pub default_limit: usize,
    /// Candidates requested from the store before filtering
    pub candidate_pool: usize,
    /// Hop ceiling when walking a containment chain
    pub max_hierarchy_depth: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_results: 50,
            default_limit: 10,
            candidate_pool: 200,
            max_hierarchy_depth: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { timeout_ms: 5000 }
    }
}

/// Weights of the ranking terms, highest priority first.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RankingConfig {
    pub text_match: f64,
    pub importance: f64,
    pub proximity: f64,
    pub rank_fit: f64,
    pub exact_match: f64,
    pub partial_match: f64,
    pub fuzzy_match: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            text_match: 25.0,
            importance: 4.0,
            proximity: 2.0,
            rank_fit: 1.0,
            exact_match: 1.0,
            partial_match: 0.6,
            fuzzy_match: 0.3,
        }
    }
}

impl RankingConfig {
    /// Whether every step between match qualities outweighs all lower-priority
    /// terms together, so scores never disagree with the match-quality order.
    pub fn text_match_dominates(&self) -> bool {
        let rest = self.importance + self.proximity + self.rank_fit;
        let steps = [
            self.exact_match - self.partial_match,
            self.partial_match - self.fuzzy_match,
            self.fuzzy_match,
        ];
        steps.iter().all(|step| self.text_match * step > rest)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DedupeConfig {
    /// Centroids closer than this (degrees) may be duplicates
    pub distance_degrees: f64,
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            distance_degrees: 0.05,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub icon_base_url: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            icon_base_url: "https://nominatim.openstreetmap.org/ui/mapicons".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: SearchConfig =
            toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
