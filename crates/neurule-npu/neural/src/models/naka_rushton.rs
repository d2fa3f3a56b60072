// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Naka-Rushton Rule
//!
//! Rate neuron with a saturating response and optional spike-rate adaptation.
//!
//! ```text
//! S(P) = M · Pⁿ / ((σ − A)ⁿ + Pⁿ)     for P > 0, else 0
//!
//! τ  · dR/dt = −R + S(P)
//! τ_A · dA/dt = −A − α·S(P)            (only with adaptation enabled)
//! ```
//!
//! `A` is kept non-positive, so `σ − A` grows with sustained firing and the
//! response is pushed down.

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_noisy, Bounded};
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NakaRushtonRule {
    /// M, also the upper bound of the output
    pub max_spike_rate: f64,
    /// n
    pub steepness: f64,
    /// σ
    pub semi_saturation_constant: f64,
    /// τ
    pub time_constant: f64,
    pub use_adaptation: bool,
    /// α
    pub adaptation_parameter: f64,
    /// τ_A
    pub adaptation_time_constant: f64,
    pub lower_bound: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NakaRushtonState {
    /// Adaptation term A (≤ 0)
    pub adaptation: f64,
}

impl Default for NakaRushtonRule {
    fn default() -> Self {
        Self {
            max_spike_rate: 100.0,
            steepness: 2.0,
            semi_saturation_constant: 120.0,
            time_constant: 1.0,
            use_adaptation: false,
            adaptation_parameter: 0.7,
            adaptation_time_constant: 10.0,
            lower_bound: 0.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl NakaRushtonRule {
    /// Steady-state response to input `p` given adaptation `adaptation`.
    pub fn response(&self, p: f64, adaptation: f64) -> f64 {
        if p > 0.0 {
            let pn = p.powf(self.steepness);
            let sigma = self.semi_saturation_constant - adaptation;
            self.max_spike_rate * pn / (sigma.powf(self.steepness) + pn)
        } else {
            0.0
        }
    }
}

impl Bounded for NakaRushtonRule {
    fn upper_bound(&self) -> f64 {
        self.max_spike_rate
    }
    fn lower_bound(&self) -> f64 {
        self.lower_bound
    }
    fn set_upper_bound(&mut self, value: f64) {
        self.max_spike_rate = value;
    }
    fn set_lower_bound(&mut self, value: f64) {
        self.lower_bound = value;
    }
}

impl_noisy!(NakaRushtonRule);

impl UpdateRule for NakaRushtonRule {
    type State = NakaRushtonState;

    fn rule_name(&self) -> &'static str {
        "Naka-Rushton"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Continuous
    }

    fn create_state(&self) -> NakaRushtonState {
        NakaRushtonState::default()
    }

    fn update(&self, neuron: &mut NeuronState, state: &mut NakaRushtonState, ctx: &UpdateContext, rng: &mut SimRng) {
        let dt = ctx.time_step;
        let p = neuron.input + noise_term(self, rng);
        let adaptation = if self.use_adaptation { state.adaptation } else { 0.0 };
        let s = self.response(p, adaptation);

        if self.use_adaptation {
            state.adaptation += dt / self.adaptation_time_constant * (-state.adaptation - self.adaptation_parameter * s);
        }

        let r = neuron.activation;
        neuron.buffer = r + dt / self.time_constant * (-r + s);
    }

    fn validate(&self) -> Result<()> {
        let name = self.rule_name();
        validation::positive(name, "max_spike_rate", self.max_spike_rate)?;
        validation::positive(name, "steepness", self.steepness)?;
        validation::positive(name, "semi_saturation_constant", self.semi_saturation_constant)?;
        validation::positive(name, "time_constant", self.time_constant)?;
        validation::positive(name, "adaptation_time_constant", self.adaptation_time_constant)?;
        validation::non_negative(name, "adaptation_parameter", self.adaptation_parameter)?;
        validation::ordered(name, self.lower_bound, self.max_spike_rate)?;
        self.noise.validate()
    }

    capability_accessors!(bounded, noisy);
}
