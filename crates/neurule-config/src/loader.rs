// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, NeuruleConfig};
use neurule_npu_neural::NeuronRule;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "neurule.toml";

/// Find the configuration file
///
/// Search order:
/// 1. `NEURULE_CONFIG_PATH` environment variable
/// 2. Current working directory: `./neurule.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("NEURULE_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by NEURULE_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet NEURULE_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or an
/// override names an unknown rule
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<NeuruleConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: NeuruleConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config)?;
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    Ok(config)
}

fn parse_into<T: FromStr>(slot: &mut T, value: &str) {
    if let Ok(parsed) = value.parse::<T>() {
        *slot = parsed;
    }
}

/// Switch the population to another rule type, unless it already runs it.
fn override_rule(config: &mut NeuruleConfig, tag: &str) -> ConfigResult<()> {
    let rule = NeuronRule::from_tag(tag).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
    if rule.kind() != config.population.rule.kind() {
        config.population.rule = rule;
    }
    Ok(())
}

/// Apply one named override. Shared by the environment and CLI tiers.
fn apply_override(config: &mut NeuruleConfig, key: &str, value: &str) -> ConfigResult<()> {
    match key {
        "time_step" => parse_into(&mut config.simulation.time_step, value),
        "ticks" => parse_into(&mut config.simulation.ticks, value),
        "seed" => parse_into(&mut config.simulation.seed, value),
        "parallel_threshold" => parse_into(&mut config.simulation.parallel_threshold, value),
        "log_level" => config.logging.level = value.to_string(),
        "log_format" => config.logging.format = value.to_string(),
        "size" => parse_into(&mut config.population.size, value),
        "connection_probability" => parse_into(&mut config.population.connection_probability, value),
        "connection_weight" => parse_into(&mut config.population.connection_weight, value),
        "external_input" => parse_into(&mut config.population.external_input, value),
        "rule" => override_rule(config, value)?,
        _ => {}
    }
    Ok(())
}

/// Environment variable to override key
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("NEURULE_TIME_STEP", "time_step"),
    ("NEURULE_TICKS", "ticks"),
    ("NEURULE_SEED", "seed"),
    ("NEURULE_PARALLEL_THRESHOLD", "parallel_threshold"),
    ("NEURULE_LOG_LEVEL", "log_level"),
    ("NEURULE_LOG_FORMAT", "log_format"),
    ("NEURULE_POPULATION_SIZE", "size"),
    ("NEURULE_CONNECTION_PROBABILITY", "connection_probability"),
    ("NEURULE_CONNECTION_WEIGHT", "connection_weight"),
    ("NEURULE_EXTERNAL_INPUT", "external_input"),
    ("NEURULE_RULE", "rule"),
];

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `NEURULE_TIME_STEP` -> `simulation.time_step`
/// - `NEURULE_TICKS` -> `simulation.ticks`
/// - `NEURULE_SEED` -> `simulation.seed`
/// - `NEURULE_PARALLEL_THRESHOLD` -> `simulation.parallel_threshold`
/// - `NEURULE_LOG_LEVEL` / `NEURULE_LOG_FORMAT` -> `logging.*`
/// - `NEURULE_POPULATION_SIZE` -> `population.size`
/// - `NEURULE_CONNECTION_PROBABILITY` / `NEURULE_CONNECTION_WEIGHT` -> `population.*`
/// - `NEURULE_EXTERNAL_INPUT` -> `population.external_input`
/// - `NEURULE_RULE` -> `population.rule` (rule tag, default parameters)
///
/// Unparseable numbers are ignored.
pub fn apply_environment_overrides(config: &mut NeuruleConfig) -> ConfigResult<()> {
    for (var, key) in ENV_OVERRIDES {
        if let Ok(value) = env::var(var) {
            apply_override(config, key, &value)?;
        }
    }
    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of CLI arguments (e.g., `{"ticks": "500", "rule": "sorn"}`)
pub fn apply_cli_overrides(config: &mut NeuruleConfig, cli_args: &HashMap<String, String>) -> ConfigResult<()> {
    for (key, value) in cli_args {
        apply_override(config, key, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurule_npu_neural::RuleKind;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for (var, _) in ENV_OVERRIDES {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        File::create(&config_path).unwrap();

        env::set_var("NEURULE_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("NEURULE_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_missing_env_path_is_an_error() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::set_var("NEURULE_CONFIG_PATH", "/definitely/not/here/neurule.toml");
        let result = find_config_file();
        env::remove_var("NEURULE_CONFIG_PATH");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[simulation]").unwrap();
        writeln!(file, "ticks = 42").unwrap();
        writeln!(file, "[population.rule]").unwrap();
        writeln!(file, "type = \"sorn\"").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();
        assert_eq!(config.simulation.ticks, 42);
        assert_eq!(config.population.rule.kind(), RuleKind::Sorn);
    }

    #[test]
    fn test_invalid_toml() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[simulation\nticks = ").unwrap();
        assert!(matches!(
            load_config(Some(&config_path), None),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let mut config = NeuruleConfig::default();

        env::set_var("NEURULE_TIME_STEP", "0.25");
        env::set_var("NEURULE_SEED", "not-a-number");
        env::set_var("NEURULE_RULE", "hodgkin_huxley");
        let result = apply_environment_overrides(&mut config);
        clear_env();

        result.unwrap();
        assert_eq!(config.simulation.time_step, 0.25);
        assert_eq!(config.simulation.seed, 0);
        assert_eq!(config.population.rule.kind(), RuleKind::HodgkinHuxley);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = NeuruleConfig::default();
        let cli_args = HashMap::from([
            ("ticks".to_string(), "7".to_string()),
            ("log_format".to_string(), "json".to_string()),
        ]);
        apply_cli_overrides(&mut config, &cli_args).unwrap();
        assert_eq!(config.simulation.ticks, 7);
        assert_eq!(config.logging.format, "json");

        let bad = HashMap::from([("rule".to_string(), "nonsense".to_string())]);
        assert!(matches!(
            apply_cli_overrides(&mut config, &bad),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_rule_override_keeps_tuned_parameters_of_same_kind() {
        let mut config = NeuruleConfig::default();
        config.population.rule.set_parameter("slope", 3.0).unwrap();
        let cli_args = HashMap::from([("rule".to_string(), "linear".to_string())]);
        apply_cli_overrides(&mut config, &cli_args).unwrap();
        assert_eq!(
            config.population.rule.parameter("slope").and_then(|v| v.as_f64()),
            Some(3.0)
        );
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[simulation]").unwrap();
        writeln!(file, "ticks = 10").unwrap();
        writeln!(file, "seed = 1").unwrap();

        env::set_var("NEURULE_TICKS", "20");
        env::set_var("NEURULE_SEED", "2");
        let cli_args = HashMap::from([("ticks".to_string(), "30".to_string())]);

        let config = load_config(Some(&config_path), Some(&cli_args));
        clear_env();
        let config = config.unwrap();

        // CLI wins for ticks, env wins for seed (no CLI override)
        assert_eq!(config.simulation.ticks, 30);
        assert_eq!(config.simulation.seed, 2);
    }
}
