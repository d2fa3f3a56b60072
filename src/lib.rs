// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neurule - Neuron Update Rules
//!
//! A catalogue of neuron update rules (discrete, continuous and spiking)
//! behind one trait, plus a population harness that drives them through the
//! buffered tick. This crate re-exports the workspace members; each is also
//! usable on its own.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! neurule = "0.1"
//! ```
//!
//! ### A single neuron
//!
//! ```rust
//! use neurule::prelude::*;
//! use rand::SeedableRng;
//!
//! let rule = NeuronRule::from_tag("izhikevich")?;
//! let mut state = rule.create_state();
//! let mut neuron = NeuronState::new();
//! let mut rng = SimRng::seed_from_u64(7);
//!
//! let ctx = UpdateContext::new(DEFAULT_TIME_STEP, 0.0);
//! neuron.input = 10.0;
//! rule.update(&mut neuron, &mut state, &ctx, &mut rng);
//! neuron.commit(ctx.time);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### A population from a config file
//!
//! ```rust,no_run
//! use neurule::config::{load_config, validate_config};
//! use neurule::simulation::run_simulation;
//!
//! let config = load_config(None, None)?;
//! validate_config(&config)?;
//! let summary = run_simulation(&config)?;
//! println!("{} spikes in {} ticks", summary.total_spikes, summary.ticks);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Rules: neurule-npu-neural                              │
//! │  (NeuronState, squashing, randomizer, update rules)     │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Runtime: neurule-npu-runtime                           │
//! │  (fan-in aggregation, parallel update, commit)          │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Infrastructure: neurule-config, neurule-observability  │
//! │  (TOML presets, logging)                                │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export workspace members
pub use neurule_config as config;
pub use neurule_npu_neural as neural;
pub use neurule_npu_runtime as runtime;
pub use neurule_observability as observability;

pub mod simulation;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::neural::{
        Biased, Bounded, Clippable, Differentiable, FanInSample, Invertible, NeuronRule, NeuronState, Noisy, ParamValue,
        ProbDistribution, Randomizer, RuleError, RuleKind, RuleState, SimRng, SquashingFunction, TimeType,
        UpdateContext, UpdateRule, DEFAULT_TIME_STEP,
    };
    pub use crate::runtime::{Population, PopulationBuilder, TickReport};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let rule = NeuronRule::default();
        assert_eq!(rule.kind(), RuleKind::Linear);
        assert!(!crate::VERSION.is_empty());
    }
}
