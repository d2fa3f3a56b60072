// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent, within valid ranges, and that the configured rule preset is
//! usable.

use crate::{ConfigError, ConfigResult, NeuruleConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["text", "json"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl ConfigValidationError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Positive, finite time step
/// - Non-empty population with a valid rule preset
/// - Connection probability within [0, 1]
/// - Known log level and format
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &NeuruleConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_simulation(config, &mut errors);
    validate_population(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_simulation(config: &NeuruleConfig, errors: &mut Vec<ConfigValidationError>) {
    let dt = config.simulation.time_step;
    if !(dt.is_finite() && dt > 0.0) {
        errors.push(ConfigValidationError::invalid(
            "simulation.time_step",
            format!("must be positive and finite, got {}", dt),
        ));
    }
}

fn validate_population(config: &NeuruleConfig, errors: &mut Vec<ConfigValidationError>) {
    let population = &config.population;

    if population.size == 0 {
        errors.push(ConfigValidationError::invalid("population.size", "must be at least 1"));
    }

    let p = population.connection_probability;
    if !(0.0..=1.0).contains(&p) {
        errors.push(ConfigValidationError::invalid(
            "population.connection_probability",
            "must be between 0.0 and 1.0",
        ));
    }

    if !population.connection_weight.is_finite() {
        errors.push(ConfigValidationError::invalid("population.connection_weight", "must be finite"));
    }
    if !population.external_input.is_finite() {
        errors.push(ConfigValidationError::invalid("population.external_input", "must be finite"));
    }

    if let Err(e) = population.rule.validate() {
        errors.push(ConfigValidationError::invalid("population.rule", e.to_string()));
    }
}

fn validate_logging(config: &NeuruleConfig, errors: &mut Vec<ConfigValidationError>) {
    let logging = &config.logging;

    if logging.level.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "logging.level".to_string(),
        });
    } else if !LOG_LEVELS.contains(&logging.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigValidationError::invalid(
            "logging.level",
            format!("must be one of {}", LOG_LEVELS.join(", ")),
        ));
    }

    if !LOG_FORMATS.contains(&logging.format.as_str()) {
        errors.push(ConfigValidationError::invalid("logging.format", "must be 'text' or 'json'"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurule_npu_neural::NeuronRule;

    #[test]
    fn test_default_config_is_valid() {
        let config = NeuruleConfig::default();
        let result = validate_config(&config);
        if let Err(e) = &result {
            eprintln!("Validation error: {}", e);
        }
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_time_step() {
        let mut config = NeuruleConfig::default();
        config.simulation.time_step = 0.0;
        assert!(validate_config(&config).is_err());

        config.simulation.time_step = f64::INFINITY;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_probability_and_size() {
        let mut config = NeuruleConfig::default();
        config.population.connection_probability = 1.5;
        config.population.size = 0;

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("population.connection_probability"));
        assert!(message.contains("population.size"));
    }

    #[test]
    fn test_invalid_rule_preset() {
        let mut config = NeuruleConfig::default();
        let mut rule = NeuronRule::from_tag("izhikevich").unwrap();
        if let NeuronRule::Izhikevich(izh) = &mut rule {
            izh.i_bg = f64::NAN;
        }
        config.population.rule = rule;
        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("population.rule"));
    }

    #[test]
    fn test_invalid_logging() {
        let mut config = NeuruleConfig::default();
        config.logging.level = "loud".to_string();
        config.logging.format = "xml".to_string();
        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("logging.level"));
        assert!(message.contains("logging.format"));

        config.logging.level = String::new();
        config.logging.format = "json".to_string();
        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("Missing required configuration: logging.level"));
    }
}
