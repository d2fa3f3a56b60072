// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Config-driven population runs.
//!
//! Glue between [`NeuruleConfig`] and the runtime: build the population the
//! config describes, drive it for the configured number of ticks and
//! summarise what happened.

use std::time::Duration;

use anyhow::{Context, Result};
use neurule_config::{LoggingConfig, NeuruleConfig};
use neurule_npu_runtime::Population;
use neurule_observability::{init_logging, CrateDebugFlags, LogSettings};
use tracing::info;

/// Aggregate statistics of one run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub rule: &'static str,
    pub neurons: usize,
    pub ticks: u64,
    pub total_spikes: usize,
    /// Neurons spiking on the last tick
    pub final_spikes: usize,
    pub mean_activation: f64,
    pub elapsed: Duration,
}

/// Build the population a config describes.
///
/// Every neuron receives `population.external_input` as a constant drive.
pub fn population_from_config(config: &NeuruleConfig) -> Result<Population> {
    let simulation = &config.simulation;
    let population = &config.population;

    let mut builder = Population::builder(population.size)
        .rule(population.rule.clone())
        .time_step(simulation.time_step)
        .seed(simulation.seed)
        .parallel_threshold(simulation.parallel_threshold);
    if population.connection_probability > 0.0 {
        builder = builder.random_fan_in(population.connection_probability, population.connection_weight);
    }

    let mut pop = builder.build().context("Failed to build population from config")?;
    if population.external_input != 0.0 {
        pop.set_external_inputs(&vec![population.external_input; population.size])?;
    }
    Ok(pop)
}

/// Run `population` for `ticks` ticks and summarise.
pub fn run_population(pop: &mut Population, ticks: u64) -> SimulationSummary {
    let rule = pop.rule(0).map(|r| r.name()).unwrap_or("empty");
    let mut total_spikes = 0;
    let mut final_spikes = 0;
    let mut elapsed = Duration::ZERO;

    for _ in 0..ticks {
        let report = pop.step();
        total_spikes += report.spikes;
        final_spikes = report.spikes;
        elapsed += report.duration;
    }

    let activations = pop.activations();
    let mean_activation = if activations.is_empty() {
        0.0
    } else {
        activations.iter().sum::<f64>() / activations.len() as f64
    };

    SimulationSummary {
        rule,
        neurons: pop.len(),
        ticks,
        total_spikes,
        final_spikes,
        mean_activation,
        elapsed,
    }
}

/// Build and run the population described by `config`.
pub fn run_simulation(config: &NeuruleConfig) -> Result<SimulationSummary> {
    let mut pop = population_from_config(config)?;
    info!(
        "Running {} x {} for {} ticks (dt = {})",
        config.population.size,
        config.population.rule.name(),
        config.simulation.ticks,
        config.simulation.time_step
    );
    let summary = run_population(&mut pop, config.simulation.ticks);
    info!(
        "Finished: {} spikes, mean activation {:.4}, {:?} in update passes",
        summary.total_spikes, summary.mean_activation, summary.elapsed
    );
    Ok(summary)
}

/// Install the global subscriber described by the `[logging]` section.
///
/// Crates listed in `debug_crates` are added to `debug_flags`.
pub fn init_logging_from_config(logging: &LoggingConfig, debug_flags: &CrateDebugFlags) -> Result<()> {
    let settings = LogSettings::from_parts(&logging.level, &logging.format)?;
    let mut flags = debug_flags.clone();
    for crate_name in &logging.debug_crates {
        flags.enable(crate_name);
    }
    init_logging(&settings, &flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurule_npu_neural::NeuronRule;

    #[test]
    fn test_population_from_default_config() {
        let config = NeuruleConfig::default();
        let pop = population_from_config(&config).unwrap();
        assert_eq!(pop.len(), config.population.size);
        assert_eq!(pop.time_step(), config.simulation.time_step);
    }

    #[test]
    fn test_run_counts_spikes() {
        let mut config = NeuruleConfig::default();
        config.population.size = 10;
        config.population.rule = NeuronRule::from_tag("integrate_and_fire").unwrap();
        config.population.external_input = 40.0;

        let mut pop = population_from_config(&config).unwrap();
        let summary = run_population(&mut pop, 500);
        assert_eq!(summary.neurons, 10);
        assert_eq!(summary.ticks, 500);
        assert!(summary.total_spikes > 0);
        assert_eq!(summary.rule, "Integrate and Fire");
    }

    #[test]
    fn test_bad_config_is_reported() {
        let mut config = NeuruleConfig::default();
        config.simulation.time_step = -1.0;
        assert!(population_from_config(&config).is_err());
    }
}
