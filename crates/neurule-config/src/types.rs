// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines the structs that map to sections in `neurule.toml`.

use neurule_npu_neural::{NeuronRule, DEFAULT_TIME_STEP};
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NeuruleConfig {
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
    pub population: PopulationConfig,
}

/// Tick loop settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Integration step `dt`
    pub time_step: f64,
    pub ticks: u64,
    /// Base seed; neuron `i` uses `seed + i` for its noise stream
    pub seed: u64,
    /// Populations at least this large update in parallel
    pub parallel_threshold: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            ticks: 1000,
            seed: 0,
            parallel_threshold: 1024,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
    /// Crates to log at debug level regardless of `level`
    pub debug_crates: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            debug_crates: Vec::new(),
        }
    }
}

/// Population built by the simulate tool
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub size: usize,
    /// Rule preset, e.g. `{ type = "izhikevich", a = 0.02 }`
    pub rule: NeuronRule,
    /// Probability of a connection between any ordered pair of neurons
    pub connection_probability: f64,
    pub connection_weight: f64,
    /// Constant external drive applied to every neuron
    pub external_input: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 100,
            rule: NeuronRule::default(),
            connection_probability: 0.0,
            connection_weight: 1.0,
            external_input: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurule_npu_neural::RuleKind;

    #[test]
    fn test_rule_preset_from_toml() {
        let config: NeuruleConfig = toml::from_str(
            r#"
            [population]
            size = 10

            [population.rule]
            type = "morris_lecar"
            i_bg = 95.0
            "#,
        )
        .unwrap();
        assert_eq!(config.population.size, 10);
        assert_eq!(config.population.rule.kind(), RuleKind::MorrisLecar);
        assert_eq!(
            config.population.rule.parameter("i_bg").and_then(|v| v.as_f64()),
            Some(95.0)
        );
        // Untouched sections keep their defaults
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn test_config_serializes_back_to_toml() {
        let config = NeuruleConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: NeuruleConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
