// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Morris-Lecar Rule
//!
//! ```text
//! m∞(V)  = ½ · (1 + tanh((V − V1)/V2))
//! w∞(V)  = ½ · (1 + tanh((V − V3)/V4))
//! τw(V)  = 1 / cosh((V − V3) / (2·V4))
//!
//! C · dV/dt = I − g_L·(V − E_L) − g_Ca·m∞·(V − E_Ca) − g_K·w·(V − E_K)
//!     dw/dt = φ · (w∞ − w) / τw
//! ```
//!
//! Integrated with the explicit midpoint method. A spike is registered on
//! every tick that ends with `V ≥ threshold`.

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_noisy};
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorrisLecarRule {
    pub g_ca: f64,
    pub g_k: f64,
    pub g_l: f64,
    pub v_ca: f64,
    pub v_k: f64,
    pub v_l: f64,
    pub c_membrane: f64,
    pub i_bg: f64,
    /// Half-activation of the calcium gate (V1)
    pub v_m1: f64,
    /// Slope of the calcium gate (V2)
    pub v_m2: f64,
    /// Half-activation of the potassium gate (V3)
    pub v_w1: f64,
    /// Slope of the potassium gate (V4)
    pub v_w2: f64,
    pub phi: f64,
    pub threshold: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MorrisLecarState {
    /// Fraction of open potassium channels
    pub w: f64,
}

impl Default for MorrisLecarRule {
    fn default() -> Self {
        Self {
            g_ca: 4.4,
            g_k: 8.0,
            g_l: 2.0,
            v_ca: 120.0,
            v_k: -84.0,
            v_l: -60.0,
            c_membrane: 20.0,
            i_bg: 100.0,
            v_m1: -1.2,
            v_m2: 18.0,
            v_w1: 2.0,
            v_w2: 30.0,
            phi: 0.04,
            threshold: 8.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl MorrisLecarRule {
    pub fn m_inf(&self, v: f64) -> f64 {
        0.5 * (1.0 + ((v - self.v_m1) / self.v_m2).tanh())
    }

    pub fn w_inf(&self, v: f64) -> f64 {
        0.5 * (1.0 + ((v - self.v_w1) / self.v_w2).tanh())
    }

    pub fn tau_w(&self, v: f64) -> f64 {
        1.0 / ((v - self.v_w1) / (2.0 * self.v_w2)).cosh()
    }

    /// `(dV/dt, dw/dt)` at `(v, w)` under injected current `current`.
    pub fn derivatives(&self, v: f64, w: f64, current: f64) -> (f64, f64) {
        let i_l = self.g_l * (v - self.v_l);
        let i_ca = self.g_ca * self.m_inf(v) * (v - self.v_ca);
        let i_k = self.g_k * w * (v - self.v_k);
        let dv = (current - i_l - i_ca - i_k) / self.c_membrane;
        let dw = self.phi * (self.w_inf(v) - w) / self.tau_w(v);
        (dv, dw)
    }
}

impl_noisy!(MorrisLecarRule);

impl UpdateRule for MorrisLecarRule {
    type State = MorrisLecarState;

    fn rule_name(&self) -> &'static str {
        "Morris-Lecar"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Continuous
    }

    fn create_state(&self) -> MorrisLecarState {
        MorrisLecarState {
            w: self.w_inf(self.v_l),
        }
    }

    fn update(&self, neuron: &mut NeuronState, state: &mut MorrisLecarState, ctx: &UpdateContext, rng: &mut SimRng) {
        let dt = ctx.time_step;
        let v = neuron.activation;
        let w = state.w;
        let current = self.i_bg + neuron.input + noise_term(self, rng);

        let (dv1, dw1) = self.derivatives(v, w, current);
        let v_mid = v + 0.5 * dt * dv1;
        let w_mid = w + 0.5 * dt * dw1;
        let (dv2, dw2) = self.derivatives(v_mid, w_mid, current);

        let v_next = v + dt * dv2;
        state.w = w + dt * dw2;

        neuron.spike_buffer = v_next >= self.threshold;
        neuron.buffer = v_next;
    }

    fn clear(&self, neuron: &mut NeuronState, state: &mut MorrisLecarState) {
        *state = self.create_state();
        neuron.force_set_activation(self.v_l);
        neuron.clear_spikes();
    }

    fn validate(&self) -> Result<()> {
        let name = self.rule_name();
        validation::positive(name, "c_membrane", self.c_membrane)?;
        validation::positive(name, "phi", self.phi)?;
        for (param, value) in [("g_ca", self.g_ca), ("g_k", self.g_k), ("g_l", self.g_l)] {
            validation::non_negative(name, param, value)?;
        }
        if self.v_m2 == 0.0 || self.v_w2 == 0.0 {
            return Err(crate::types::RuleError::invalid(name, "v_m2", "gate slopes must be non-zero"));
        }
        self.noise.validate()
    }

    fn is_spiking(&self) -> bool {
        true
    }

    fn graphical_upper_bound(&self) -> f64 {
        50.0
    }

    fn graphical_lower_bound(&self) -> f64 {
        self.v_k
    }

    capability_accessors!(noisy);
}
