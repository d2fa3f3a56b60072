// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Sigmoidal Rules
//!
//! ```text
//! Discrete:
//!     buffer = f(input + bias [+ noise])
//!
//! Continuous:
//!     net(t+dt) = net(t) · (1 − leak·dt/τ) + (dt/τ) · (input + bias [+ noise])
//!     buffer    = f(net)
//! ```
//!
//! `f` is one of the squashing functions, scaled to `[lower_bound, upper_bound]`
//! with derivative `slope` at the midpoint.

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_biased, impl_bounded, impl_noisy, Differentiable, Invertible};
use crate::math::SquashingFunction;
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

/// Fraction of the output range kept between a saturated net activation and
/// the bounds
const SATURATION_MARGIN: f64 = 1e-9;

/// Memoryless sigmoid of the biased input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigmoidalRule {
    pub squashing_function: SquashingFunction,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub slope: f64,
    pub bias: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

impl SigmoidalRule {
    /// Rule using `function` with its natural bounds.
    pub fn with_function(function: SquashingFunction) -> Self {
        Self {
            squashing_function: function,
            upper_bound: function.default_upper_bound(),
            lower_bound: function.default_lower_bound(),
            slope: 1.0,
            bias: 0.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }

    pub fn squash(&self, x: f64) -> f64 {
        self.squashing_function
            .value_of(x, self.upper_bound, self.lower_bound, self.slope)
    }
}

impl Default for SigmoidalRule {
    fn default() -> Self {
        Self::with_function(SquashingFunction::Logistic)
    }
}

impl_bounded!(SigmoidalRule);
impl_biased!(SigmoidalRule);
impl_noisy!(SigmoidalRule);

impl Differentiable for SigmoidalRule {
    fn derivative(&self, x: f64) -> f64 {
        self.squashing_function
            .deriv_val(x, self.upper_bound, self.lower_bound, self.slope)
    }
}

impl Invertible for SigmoidalRule {
    fn inverse(&self, y: f64) -> f64 {
        self.squashing_function
            .inverse_val(y, self.upper_bound, self.lower_bound, self.slope)
    }
}

impl UpdateRule for SigmoidalRule {
    type State = ();

    fn rule_name(&self) -> &'static str {
        "Sigmoidal (Discrete)"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Discrete
    }

    fn create_state(&self) {}

    fn update(&self, neuron: &mut NeuronState, _state: &mut (), _ctx: &UpdateContext, rng: &mut SimRng) {
        let x = neuron.input + self.bias + noise_term(self, rng);
        neuron.buffer = self.squash(x);
    }

    fn validate(&self) -> Result<()> {
        validate_sigmoid(self.rule_name(), self.lower_bound, self.upper_bound, self.slope)?;
        self.noise.validate()
    }

    capability_accessors!(bounded, biased, noisy, differentiable, invertible);
}

/// Leaky integrator feeding a sigmoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuousSigmoidalRule {
    pub squashing_function: SquashingFunction,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub slope: f64,
    pub bias: f64,
    /// τ
    pub time_constant: f64,
    pub leak_constant: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

/// Internal (pre-squash) activation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContinuousSigmoidalState {
    pub net_activation: f64,
}

impl ContinuousSigmoidalRule {
    pub fn with_function(function: SquashingFunction) -> Self {
        Self {
            squashing_function: function,
            upper_bound: function.default_upper_bound(),
            lower_bound: function.default_lower_bound(),
            slope: 1.0,
            bias: 0.0,
            time_constant: 1.0,
            leak_constant: 1.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }

    pub fn squash(&self, x: f64) -> f64 {
        self.squashing_function
            .value_of(x, self.upper_bound, self.lower_bound, self.slope)
    }

    /// Move the output by `delta`, saturating at the bounds, and pull the
    /// internal net activation along so the next tick continues from there.
    pub fn shift_activation(&self, neuron: &mut NeuronState, state: &mut ContinuousSigmoidalState, delta: f64) {
        let target = neuron.activation + delta;
        let value = if target >= self.upper_bound {
            self.upper_bound
        } else if target <= self.lower_bound {
            self.lower_bound
        } else {
            target
        };
        neuron.force_set_activation(value);
        // The bounds invert to ±∞, which no input could pull back
        let margin = (self.upper_bound - self.lower_bound) * SATURATION_MARGIN;
        let inside = value.clamp(self.lower_bound + margin, self.upper_bound - margin);
        state.net_activation = self.inverse(inside);
    }
}

impl Default for ContinuousSigmoidalRule {
    fn default() -> Self {
        Self::with_function(SquashingFunction::Logistic)
    }
}

impl_bounded!(ContinuousSigmoidalRule);
impl_biased!(ContinuousSigmoidalRule);
impl_noisy!(ContinuousSigmoidalRule);

impl Differentiable for ContinuousSigmoidalRule {
    fn derivative(&self, x: f64) -> f64 {
        self.squashing_function
            .deriv_val(x, self.upper_bound, self.lower_bound, self.slope)
    }
}

impl Invertible for ContinuousSigmoidalRule {
    fn inverse(&self, y: f64) -> f64 {
        self.squashing_function
            .inverse_val(y, self.upper_bound, self.lower_bound, self.slope)
    }
}

impl UpdateRule for ContinuousSigmoidalRule {
    type State = ContinuousSigmoidalState;

    fn rule_name(&self) -> &'static str {
        "Sigmoidal (Continuous)"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Continuous
    }

    fn create_state(&self) -> ContinuousSigmoidalState {
        ContinuousSigmoidalState::default()
    }

    fn update(
        &self,
        neuron: &mut NeuronState,
        state: &mut ContinuousSigmoidalState,
        ctx: &UpdateContext,
        rng: &mut SimRng,
    ) {
        let dt = ctx.time_step;
        let inputs = neuron.input + self.bias + noise_term(self, rng);
        let retain = 1.0 - self.leak_constant * dt / self.time_constant;
        state.net_activation = state.net_activation * retain + (dt / self.time_constant) * inputs;
        neuron.buffer = self.squash(state.net_activation);
    }

    fn clear(&self, neuron: &mut NeuronState, state: &mut ContinuousSigmoidalState) {
        *state = self.create_state();
        neuron.force_set_activation(self.squash(0.0));
        neuron.clear_spikes();
    }

    fn validate(&self) -> Result<()> {
        validate_sigmoid(self.rule_name(), self.lower_bound, self.upper_bound, self.slope)?;
        validation::positive(self.rule_name(), "time_constant", self.time_constant)?;
        validation::non_negative(self.rule_name(), "leak_constant", self.leak_constant)?;
        self.noise.validate()
    }

    capability_accessors!(bounded, biased, noisy, differentiable, invertible);
}

fn validate_sigmoid(rule: &'static str, lower: f64, upper: f64, slope: f64) -> Result<()> {
    validation::ordered(rule, lower, upper)?;
    validation::positive(rule, "slope", slope)
}
