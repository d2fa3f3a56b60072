// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Adaptive Exponential Integrate-and-Fire (AdEx)
//!
//! ```text
//! I_ex   = ḡ_e · E_in · (E_ex − V)
//! I_in   = −ḡ_i · I_in · (E_in − V)        (I_in is the signed, ≤ 0, inhibitory sum)
//! I_leak = g_L · (E_L − V)
//!
//! C · dV/dt = g_L·Δ_T·exp((V − V_T)/Δ_T) + I_leak + I_ex + I_in + I_bg − w
//! τ_w · dw/dt = a·(V − E_L) − w
//!
//! Euler step on (V, w), then
//!     if V ≥ V_peak: V = V_reset, w += b · 1000, spike unless refractory
//!     V clipped to [−1000, 1000]
//! ```
//!
//! Currents are in pA, `b` and `i_bg` are given in nA.

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, clip, impl_noisy};
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

/// nA → pA
pub const CURRENT_CONVERTER: f64 = 1000.0;

/// Saturation applied to the membrane potential after each step
pub const VOLTAGE_CLIP: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdExIfRule {
    /// mV
    pub v_reset: f64,
    /// Onset of the exponential upswing (mV)
    pub v_th: f64,
    /// Potential at which a spike is registered (mV)
    pub v_peak: f64,
    /// nS
    pub g_l: f64,
    pub g_e_bar: f64,
    pub g_i_bar: f64,
    pub leak_reversal: f64,
    pub ex_reversal: f64,
    pub in_reversal: f64,
    /// Spike-triggered adaptation (nA)
    pub b: f64,
    pub tau_w: f64,
    pub slope_factor: f64,
    /// Subthreshold adaptation coupling (nS)
    pub a: f64,
    /// pF
    pub mem_capacitance: f64,
    /// Background current (nA)
    pub i_bg: f64,
    /// Window after a spike during which threshold crossings reset but do
    /// not register as spikes
    pub refractory_period: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdExState {
    /// Adaptation current (pA)
    pub w: f64,
}

impl Default for AdExState {
    fn default() -> Self {
        Self { w: 200.0 }
    }
}

impl Default for AdExIfRule {
    fn default() -> Self {
        Self {
            v_reset: -47.7,
            v_th: -50.4,
            v_peak: 20.0,
            g_l: 30.0,
            g_e_bar: 10.0,
            g_i_bar: 10.0,
            leak_reversal: -70.6,
            ex_reversal: 0.0,
            in_reversal: -75.0,
            b: 0.0805,
            tau_w: 40.0,
            slope_factor: 2.0,
            a: 4.0,
            mem_capacitance: 281.0,
            i_bg: 0.0,
            refractory_period: 1.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl_noisy!(AdExIfRule);

impl UpdateRule for AdExIfRule {
    type State = AdExState;

    fn rule_name(&self) -> &'static str {
        "AdEx Integrate and Fire"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Continuous
    }

    fn create_state(&self) -> AdExState {
        AdExState::default()
    }

    fn update(&self, neuron: &mut NeuronState, state: &mut AdExState, ctx: &UpdateContext, rng: &mut SimRng) {
        let dt = ctx.time_step;
        let refractory = neuron.last_spike_time + self.refractory_period >= ctx.time;
        let mut v = neuron.activation;
        let mut w = state.w;

        let i_syn_ex = self.g_e_bar * neuron.excitatory_input * (self.ex_reversal - v);
        let i_syn_in = -self.g_i_bar * neuron.inhibitory_input * (self.in_reversal - v);
        let i_leak = self.g_l * (self.leak_reversal - v);
        let i_bg = self.i_bg * CURRENT_CONVERTER + noise_term(self, rng);

        let spike_drive = self.g_l * self.slope_factor * ((v - self.v_th) / self.slope_factor).exp();
        let dv = (spike_drive + i_leak + i_syn_ex + i_syn_in + i_bg - w) / self.mem_capacitance;
        let dw = (self.a * (v - self.leak_reversal) - w) / self.tau_w;

        v += dv * dt;
        w += dw * dt;

        let mut spiked = false;
        if v >= self.v_peak {
            v = self.v_reset;
            w += self.b * CURRENT_CONVERTER;
            spiked = !refractory;
        }

        state.w = w;
        neuron.spike_buffer = spiked;
        neuron.buffer = clip(v, -VOLTAGE_CLIP, VOLTAGE_CLIP);
    }

    fn clear(&self, neuron: &mut NeuronState, state: &mut AdExState) {
        *state = self.create_state();
        neuron.force_set_activation(self.leak_reversal);
        neuron.clear_spikes();
    }

    fn validate(&self) -> Result<()> {
        let name = self.rule_name();
        validation::positive(name, "mem_capacitance", self.mem_capacitance)?;
        validation::positive(name, "tau_w", self.tau_w)?;
        validation::positive(name, "slope_factor", self.slope_factor)?;
        validation::non_negative(name, "g_l", self.g_l)?;
        validation::non_negative(name, "g_e_bar", self.g_e_bar)?;
        validation::non_negative(name, "g_i_bar", self.g_i_bar)?;
        validation::non_negative(name, "refractory_period", self.refractory_period)?;
        self.noise.validate()
    }

    fn is_spiking(&self) -> bool {
        true
    }

    fn graphical_upper_bound(&self) -> f64 {
        self.v_th + 10.0
    }

    fn graphical_lower_bound(&self) -> f64 {
        self.leak_reversal - 20.0
    }

    capability_accessors!(noisy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick_at};

    fn resting() -> (AdExIfRule, AdExState, NeuronState) {
        let rule = AdExIfRule::default();
        let mut state = rule.create_state();
        let mut n = NeuronState::new();
        rule.clear(&mut n, &mut state);
        (rule, state, n)
    }

    #[test]
    fn test_adex_single_euler_step() {
        let (rule, mut state, mut n) = resting();
        state.w = 0.0;
        tick_at(&rule, &mut n, &mut state, 0.1, 0.0, &mut rng());

        let v0 = -70.6f64;
        let drive = 30.0 * 2.0 * ((v0 + 50.4) / 2.0).exp();
        let expected = v0 + 0.1 * drive / 281.0;
        assert!((n.activation - expected).abs() < 1e-12);
        // w relaxes with a·(V − E_L) = 0
        assert_eq!(state.w, 0.0);
    }

    #[test]
    fn test_adex_peak_resets_and_adapts() {
        let (rule, mut state, mut n) = resting();
        state.w = 0.0;
        n.force_set_activation(25.0);
        tick_at(&rule, &mut n, &mut state, 0.1, 10.0, &mut rng());

        assert!(n.has_spiked);
        assert_eq!(n.activation, rule.v_reset);
        assert!(state.w > 80.0);
    }

    #[test]
    fn test_adex_refractory_suppresses_spike_flag() {
        let (rule, mut state, mut n) = resting();
        n.force_set_activation(25.0);
        n.last_spike_time = 9.5;
        tick_at(&rule, &mut n, &mut state, 0.1, 10.0, &mut rng());

        // Reset still happens, but no spike inside the refractory window
        assert!(!n.has_spiked);
        assert_eq!(n.activation, rule.v_reset);
    }

    #[test]
    fn test_adex_voltage_is_clipped() {
        let (rule, mut state, mut n) = resting();
        n.force_set_activation(-5000.0);
        tick_at(&rule, &mut n, &mut state, 0.1, 0.0, &mut rng());
        assert_eq!(n.activation, -VOLTAGE_CLIP);
    }

    #[test]
    fn test_adex_excitation_depolarizes() {
        let (rule, mut state, mut quiet) = resting();
        let mut driven = quiet.clone();
        let mut driven_state = state;
        driven.set_input(5.0);
        tick_at(&rule, &mut quiet, &mut state, 0.1, 0.0, &mut rng());
        tick_at(&rule, &mut driven, &mut driven_state, 0.1, 0.0, &mut rng());
        assert!(driven.activation > quiet.activation);
    }
}
