// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Hodgkin-Huxley Rule
//!
//! ```text
//! I_Na = ḡ_Na · (ρ_Na/100) · m³·h · (V − E_Na)
//! I_K  = ḡ_K  · (ρ_K/100)  · n⁴   · (V − E_K)
//! I_L  = g_L · (V − E_L)
//!
//! C_m · dV/dt = I − I_Na − I_K − I_L
//!     dx/dt   = φ · (α_x(V)·(1 − x) − β_x(V)·x)      for x ∈ {m, h, n}
//!     φ       = 3^((T − 6.3)/10)
//! ```
//!
//! Forward Euler on all four variables. `V` is advanced with the pre-step
//! gates and the gates are advanced with the pre-step `V`. The rate
//! functions have removable singularities (α_m at −40 mV, α_n at −55 mV)
//! that are left unguarded, so landing exactly on one yields NaN.

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_noisy};
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

/// Resting membrane potential the gates are initialized against (mV)
pub const RESTING_POTENTIAL: f64 = -65.0;

pub fn alpha_n(v: f64) -> f64 {
    0.01 * (v + 55.0) / (1.0 - (-(v + 55.0) / 10.0).exp())
}

pub fn beta_n(v: f64) -> f64 {
    0.125 * (-(v + 65.0) / 80.0).exp()
}

pub fn alpha_m(v: f64) -> f64 {
    0.1 * (v + 40.0) / (1.0 - (-(v + 40.0) / 10.0).exp())
}

pub fn beta_m(v: f64) -> f64 {
    4.0 * (-(v + 65.0) / 18.0).exp()
}

pub fn alpha_h(v: f64) -> f64 {
    0.07 * (-(v + 65.0) / 20.0).exp()
}

pub fn beta_h(v: f64) -> f64 {
    1.0 / (1.0 + (-(v + 35.0) / 10.0).exp())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HodgkinHuxleyRule {
    pub g_na: f64,
    pub g_k: f64,
    pub g_l: f64,
    pub e_na: f64,
    pub e_k: f64,
    pub e_l: f64,
    /// µF/cm²
    pub capacitance: f64,
    /// °C
    pub temperature: f64,
    /// Percentage of sodium channels present
    pub na_channel_density: f64,
    /// Percentage of potassium channels present
    pub k_channel_density: f64,
    pub i_bg: f64,
    pub threshold: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

/// Gating variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HodgkinHuxleyState {
    pub m: f64,
    pub h: f64,
    pub n: f64,
}

impl Default for HodgkinHuxleyState {
    fn default() -> Self {
        Self {
            m: 0.0529,
            h: 0.5961,
            n: 0.3177,
        }
    }
}

impl Default for HodgkinHuxleyRule {
    fn default() -> Self {
        Self {
            g_na: 120.0,
            g_k: 36.0,
            g_l: 0.3,
            e_na: 50.0,
            e_k: -77.0,
            e_l: -54.4,
            capacitance: 1.0,
            temperature: 6.3,
            na_channel_density: 100.0,
            k_channel_density: 100.0,
            i_bg: 0.0,
            threshold: 0.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl HodgkinHuxleyRule {
    /// Rate multiplier for the configured temperature (Q10 = 3).
    pub fn temperature_factor(&self) -> f64 {
        3f64.powf((self.temperature - 6.3) / 10.0)
    }
}

impl_noisy!(HodgkinHuxleyRule);

impl UpdateRule for HodgkinHuxleyRule {
    type State = HodgkinHuxleyState;

    fn rule_name(&self) -> &'static str {
        "Hodgkin-Huxley"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Continuous
    }

    fn create_state(&self) -> HodgkinHuxleyState {
        HodgkinHuxleyState::default()
    }

    fn update(
        &self,
        neuron: &mut NeuronState,
        state: &mut HodgkinHuxleyState,
        ctx: &UpdateContext,
        rng: &mut SimRng,
    ) {
        let dt = ctx.time_step;
        let v = neuron.activation;
        let HodgkinHuxleyState { m, h, n } = *state;
        let current = self.i_bg + neuron.input + noise_term(self, rng);

        let g_na = self.g_na * self.na_channel_density / 100.0;
        let g_k = self.g_k * self.k_channel_density / 100.0;
        let i_na = g_na * m.powi(3) * h * (v - self.e_na);
        let i_k = g_k * n.powi(4) * (v - self.e_k);
        let i_l = self.g_l * (v - self.e_l);
        let v_next = v + dt * (current - i_na - i_k - i_l) / self.capacitance;

        let phi = self.temperature_factor();
        state.m = m + dt * phi * (alpha_m(v) * (1.0 - m) - beta_m(v) * m);
        state.h = h + dt * phi * (alpha_h(v) * (1.0 - h) - beta_h(v) * h);
        state.n = n + dt * phi * (alpha_n(v) * (1.0 - n) - beta_n(v) * n);

        neuron.spike_buffer = v_next >= self.threshold;
        neuron.buffer = v_next;
    }

    fn clear(&self, neuron: &mut NeuronState, state: &mut HodgkinHuxleyState) {
        *state = self.create_state();
        neuron.force_set_activation(RESTING_POTENTIAL);
        neuron.clear_spikes();
    }

    fn validate(&self) -> Result<()> {
        let name = self.rule_name();
        validation::positive(name, "capacitance", self.capacitance)?;
        for (param, value) in [
            ("g_na", self.g_na),
            ("g_k", self.g_k),
            ("g_l", self.g_l),
            ("na_channel_density", self.na_channel_density),
            ("k_channel_density", self.k_channel_density),
        ] {
            validation::non_negative(name, param, value)?;
        }
        validation::finite(name, "temperature", self.temperature)?;
        self.noise.validate()
    }

    fn is_spiking(&self) -> bool {
        true
    }

    fn graphical_upper_bound(&self) -> f64 {
        self.e_na
    }

    fn graphical_lower_bound(&self) -> f64 {
        self.e_k - 10.0
    }

    capability_accessors!(noisy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick};

    fn at_rest(rule: &HodgkinHuxleyRule) -> (HodgkinHuxleyState, NeuronState) {
        let mut state = rule.create_state();
        let mut n = NeuronState::new();
        rule.clear(&mut n, &mut state);
        (state, n)
    }

    #[test]
    fn test_hh_rate_singularities_are_nan() {
        assert!(alpha_m(-40.0).is_nan());
        assert!(alpha_n(-55.0).is_nan());
        // Neighbourhood of the singularity is finite
        assert!((alpha_m(-40.0 + 1e-6) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hh_rests_without_input() {
        let rule = HodgkinHuxleyRule::default();
        let (mut state, mut n) = at_rest(&rule);
        let mut rng = rng();
        for _ in 0..2000 {
            tick(&rule, &mut n, &mut state, 0.01, &mut rng);
            assert!(!n.has_spiked);
        }
        assert!((n.activation - RESTING_POTENTIAL).abs() < 1.0);
    }

    #[test]
    fn test_hh_fires_under_current_injection() {
        let rule = HodgkinHuxleyRule {
            i_bg: 10.0,
            ..HodgkinHuxleyRule::default()
        };
        let (mut state, mut n) = at_rest(&rule);
        let mut rng = rng();
        let mut spikes = 0;
        for _ in 0..5000 {
            tick(&rule, &mut n, &mut state, 0.01, &mut rng);
            if n.has_spiked {
                spikes += 1;
            }
        }
        assert!(spikes >= 2, "spikes = {spikes}");
    }

    #[test]
    fn test_hh_gates_use_pre_step_voltage() {
        let rule = HodgkinHuxleyRule {
            i_bg: 50.0,
            ..HodgkinHuxleyRule::default()
        };
        let (mut state, mut n) = at_rest(&rule);
        let before = state;
        let v = n.activation;
        tick(&rule, &mut n, &mut state, 0.01, &mut rng());

        assert!(n.activation > v);
        let phi = rule.temperature_factor();
        let m = before.m + 0.01 * phi * (alpha_m(v) * (1.0 - before.m) - beta_m(v) * before.m);
        assert!((state.m - m).abs() < 1e-12);
    }

    #[test]
    fn test_hh_flags_every_tick_above_threshold() {
        let rule = HodgkinHuxleyRule::default();
        let (mut state, mut n) = at_rest(&rule);
        n.force_set_activation(20.0);
        let mut rng = rng();
        for _ in 0..2 {
            tick(&rule, &mut n, &mut state, 0.001, &mut rng);
            assert!(n.activation >= rule.threshold);
            assert!(n.has_spiked);
        }
    }

    #[test]
    fn test_hh_no_sodium_no_spike() {
        let rule = HodgkinHuxleyRule {
            i_bg: 10.0,
            na_channel_density: 0.0,
            ..HodgkinHuxleyRule::default()
        };
        let (mut state, mut n) = at_rest(&rule);
        let mut rng = rng();
        for _ in 0..5000 {
            tick(&rule, &mut n, &mut state, 0.01, &mut rng);
            assert!(!n.has_spiked);
        }
    }

    #[test]
    fn test_hh_temperature_factor() {
        let warm = HodgkinHuxleyRule {
            temperature: 16.3,
            ..HodgkinHuxleyRule::default()
        };
        assert!((warm.temperature_factor() - 3.0).abs() < 1e-12);
        assert_eq!(HodgkinHuxleyRule::default().temperature_factor(), 1.0);
    }
}
