// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neurule Configuration System
//!
//! Type-safe configuration loader for simulations with support for:
//! - TOML file parsing (`neurule.toml`)
//! - Environment variable overrides
//! - CLI argument overrides
//! - Rule presets written inline as tagged tables
//!
//! ## Usage
//!
//! ```rust,no_run
//! use neurule_config::{load_config, validate_config};
//!
//! // Load configuration with automatic file discovery and overrides
//! let config = load_config(None, None).expect("Failed to load config");
//! validate_config(&config).expect("Invalid config");
//!
//! println!("dt = {}", config.simulation.time_step);
//! println!("rule = {}", config.population.rule.name());
//! ```
//!
//! ```toml
//! [simulation]
//! time_step = 0.5
//! ticks = 2000
//!
//! [population]
//! size = 200
//! connection_probability = 0.05
//!
//! [population.rule]
//! type = "izhikevich"
//! a = 0.02
//! d = 8.0
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{apply_cli_overrides, apply_environment_overrides, find_config_file, load_config, CONFIG_FILE_NAME};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = NeuruleConfig::default();
        assert!(validate_config(&config).is_ok());
    }
}
