// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neurule Neural Computation
//!
//! Everything a single neuron needs to advance one tick:
//! - **Types**: Per-neuron state, fan-in samples, time context, errors
//! - **Synapse**: Post-synaptic response and input aggregation
//! - **Math**: Parameterized squashing functions (logistic, tanh, arctan)
//! - **Random**: Probability distributions and the `Randomizer` noise source
//! - **Capabilities**: Bounded / Clippable / Biased / Noisy / Differentiable / Invertible
//! - **Models**: The update rules themselves and the closed `NeuronRule` set
//!
//! ## Tick contract
//!
//! A rule reads `activation`, `input` and its own parameters, then writes
//! `buffer` (and `spike_buffer` for spiking rules). The owner commits the
//! buffers once every neuron in the population has been updated, so the
//! result never depends on update order.
//!
//! ```
//! use neurule_npu_neural::{NeuronRule, NeuronState, UpdateContext, SimRng};
//! use rand::SeedableRng;
//!
//! let rule = NeuronRule::from_tag("linear").unwrap();
//! let mut state = rule.create_state();
//! let mut neuron = NeuronState::new();
//! let mut rng = SimRng::seed_from_u64(7);
//!
//! neuron.input = 0.25;
//! rule.update(&mut neuron, &mut state, &UpdateContext::default(), &mut rng);
//! neuron.commit(0.0);
//! assert_eq!(neuron.activation, 0.25);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Core type definitions
pub mod types;

// Post-synaptic response and fan-in aggregation
pub mod synapse;

// Squashing functions and friends
pub mod math;

// Noise sources
pub mod random;

// Optional rule capabilities
pub mod capabilities;

// Update rules
pub mod models;

// Re-export types
pub use types::{
    FanInSample, NeuronState, Result, RuleError, TimeType, UpdateContext, DEFAULT_INCREMENT,
    DEFAULT_TIME_STEP,
};

pub use synapse::{aggregate_fan_in, compute_psr, InputTotals};

pub use math::SquashingFunction;

pub use random::{ProbDistribution, Randomizer, SimRng};

pub use capabilities::{clip, Biased, Bounded, Clippable, Differentiable, Invertible, Noisy};

// Re-export rule set
pub use models::{NeuronRule, ParamValue, RuleKind, RuleState, UpdateRule};
