//! Detection configuration.
//!
//! Every tunable the pattern searches depend on lives here, so the engine
//! can be validated against different thresholds in tests. Validation
//! happens at construction time, so a detector never sees an invalid
//! configuration.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Hard cap on cycle lengths and chain hop counts. Keeps the bounded-depth
/// DFS bounded no matter what a config file asks for.
pub const MAX_SEARCH_DEPTH: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Country codes whose accounts qualify as chain terminals. Empty is
    /// allowed; the chain detector then finds nothing.
    pub high_risk_countries: BTreeSet<String>,
    /// Minimum number of distinct source accounts for a fan-in star.
    pub fan_in_size: usize,
    /// Per-edge amount ceiling for star edges (strictly-below test).
    pub fan_in_amount_threshold: f64,
    /// Cycle lengths (edge counts) the loop detector searches.
    pub cycle_lengths: Vec<usize>,
    /// Path hop counts the chain detector searches.
    pub chain_hop_lengths: Vec<usize>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            high_risk_countries: BTreeSet::new(),
            fan_in_size: 5,
            fan_in_amount_threshold: 10_000.0,
            cycle_lengths: vec![3, 4],
            chain_hop_lengths: vec![3, 4],
        }
    }
}

impl DetectionConfig {
    /// Load from a JSON file. Missing fields fall back to the defaults.
    pub fn load(path: &str) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values a detector cannot work with. Called by
    /// `DetectionEngine::new` and `load`.
    pub fn validate(&self) -> EngineResult<()> {
        if self.fan_in_size < 2 {
            return Err(EngineError::InvalidConfig(format!(
                "fan_in_size must be at least 2, got {}",
                self.fan_in_size
            )));
        }
        if !self.fan_in_amount_threshold.is_finite() || self.fan_in_amount_threshold < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "fan_in_amount_threshold must be finite and non-negative, got {}",
                self.fan_in_amount_threshold
            )));
        }
        for &len in &self.cycle_lengths {
            if !(2..=MAX_SEARCH_DEPTH).contains(&len) {
                return Err(EngineError::InvalidConfig(format!(
                    "cycle length {len} outside supported range 2..={MAX_SEARCH_DEPTH}"
                )));
            }
        }
        for &hops in &self.chain_hop_lengths {
            if !(2..=MAX_SEARCH_DEPTH).contains(&hops) {
                return Err(EngineError::InvalidConfig(format!(
                    "chain hop length {hops} outside supported range 2..={MAX_SEARCH_DEPTH}"
                )));
            }
        }
        Ok(())
    }
}
