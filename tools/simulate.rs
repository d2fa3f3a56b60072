// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Population Simulator

Runs a population described by `neurule.toml` and prints a spike summary.

Usage:
  cargo run --release --bin simulate -- [config.toml] [key=value ...] [--debug-<crate>]

Example:
  cargo run --release --bin simulate -- rule=izhikevich size=500 external_input=10 ticks=2000

Without a config path the usual search applies (NEURULE_CONFIG_PATH, then the
working directory and its parents); if nothing is found the built-in defaults
are used. `key=value` arguments override the file and the environment.
*/

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use neurule::config::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config, validate_config, NeuruleConfig,
};
use neurule::observability::{debug_flags_help, parse_debug_flags};
use neurule::simulation::{init_logging_from_config, population_from_config, run_population};
use tracing::{info, warn};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("Usage: simulate [config.toml] [key=value ...] [--debug-<crate>]\n");
        println!("{}", debug_flags_help());
        return Ok(());
    }

    let mut config_path: Option<PathBuf> = None;
    let mut overrides = HashMap::new();
    for arg in args.iter().filter(|a| !a.starts_with("--")) {
        match arg.split_once('=') {
            Some((key, value)) => {
                overrides.insert(key.to_string(), value.to_string());
            }
            None => config_path = Some(PathBuf::from(arg)),
        }
    }

    let (config, source) = resolve_config(config_path, &overrides)?;
    validate_config(&config)?;
    init_logging_from_config(&config.logging, &parse_debug_flags())?;

    match source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => warn!("No neurule.toml found, using built-in defaults"),
    }

    let mut population = population_from_config(&config)?;
    let summary = run_population(&mut population, config.simulation.ticks);

    println!("Rule:             {}", summary.rule);
    println!("Neurons:          {}", summary.neurons);
    println!("Ticks:            {}", summary.ticks);
    println!("Simulated time:   {:.3}", population.time());
    println!("Total spikes:     {}", summary.total_spikes);
    println!("Last-tick spikes: {}", summary.final_spikes);
    println!("Mean activation:  {:.6}", summary.mean_activation);
    println!(
        "Update time:      {:.2}ms ({:.1}us/tick)",
        summary.elapsed.as_secs_f64() * 1000.0,
        summary.elapsed.as_secs_f64() * 1e6 / summary.ticks.max(1) as f64
    );

    let mut by_kind: Vec<_> = population.spike_counts_by_kind().into_iter().collect();
    by_kind.sort_by_key(|(kind, _)| kind.tag());
    for (kind, count) in by_kind {
        println!("  {:<22} {} spiking now", kind.tag(), count);
    }

    Ok(())
}

/// Load the config file if one is given or can be found, else fall back to
/// defaults with the same override tiers applied.
fn resolve_config(
    config_path: Option<PathBuf>,
    overrides: &HashMap<String, String>,
) -> Result<(NeuruleConfig, Option<PathBuf>)> {
    let path = match config_path {
        Some(path) => Some(path),
        None => find_config_file().ok(),
    };

    match path {
        Some(path) => {
            let config = load_config(Some(&path), Some(overrides))
                .with_context(|| format!("Failed to load {}", path.display()))?;
            Ok((config, Some(path)))
        }
        None => {
            let mut config = NeuruleConfig::default();
            apply_environment_overrides(&mut config)?;
            apply_cli_overrides(&mut config, overrides)?;
            Ok((config, None))
        }
    }
}
