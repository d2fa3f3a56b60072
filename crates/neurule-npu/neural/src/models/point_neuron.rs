// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Point Neuron Rule
//!
//! Conductance-based point neuron in the Leabra style.
//!
//! ```text
//! g_e  ← (1 − τ_net)·g_e + τ_net·E          E = Σ w·a over w > 0
//! g_i  ← (1 − τ_net)·g_i + τ_net·|I|        I = Σ w·a over w ≤ 0
//! I_e  = g_e · ḡ_e · (Vm − E_e)
//! I_i  = g_i · ḡ_i · (Vm − E_i)
//! I_l  = g_l · ḡ_l · (Vm − E_l)
//! Vm  += −τ_Vm · (I_e + I_i + I_l)
//! ```
//!
//! The output function then maps `Vm` to the neuron's activation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::traits::UpdateRule;
use super::validation;
use crate::capabilities::{capability_accessors, impl_biased};
use crate::random::SimRng;
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

/// Resting membrane potential of a freshly created or cleared neuron
pub const DEFAULT_MEMBRANE_POTENTIAL: f64 = 0.15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFunction {
    /// Emit 1 and reset `Vm` when above threshold, else 0
    #[default]
    DiscreteSpiking,
    /// `g·[Vm − θ]⁺ / (g·[Vm − θ]⁺ + 1) + bias`
    RateCode,
    /// `g·[Vm − θ]⁺ + bias`
    Linear,
    /// Raw `Vm`
    MembranePotential,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointNeuronRule {
    pub net_time_constant: f64,
    pub excitatory_max_conductance: f64,
    pub inhibitory_max_conductance: f64,
    pub excitatory_reversal: f64,
    pub inhibitory_reversal: f64,
    pub leak_reversal: f64,
    pub leak_max_conductance: f64,
    pub leak_conductance: f64,
    pub potential_time_constant: f64,
    pub output_function: OutputFunction,
    pub gain: f64,
    pub threshold_potential: f64,
    /// Membrane potential after a discrete spike
    pub refractory_potential: f64,
    pub bias: f64,
}

/// Per-neuron conductances and currents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointNeuronState {
    pub excitatory_conductance: f64,
    pub inhibitory_conductance: f64,
    pub membrane_potential: f64,
    pub excitatory_current: f64,
    pub inhibitory_current: f64,
    pub leak_current: f64,
    pub net_current: f64,
}

impl Default for PointNeuronState {
    fn default() -> Self {
        Self {
            excitatory_conductance: 0.0,
            inhibitory_conductance: 0.0,
            membrane_potential: DEFAULT_MEMBRANE_POTENTIAL,
            excitatory_current: 0.0,
            inhibitory_current: 0.0,
            leak_current: 0.0,
            net_current: 0.0,
        }
    }
}

impl Default for PointNeuronRule {
    fn default() -> Self {
        Self {
            net_time_constant: 0.7,
            excitatory_max_conductance: 0.4,
            inhibitory_max_conductance: 1.0,
            excitatory_reversal: 1.0,
            inhibitory_reversal: 0.15,
            leak_reversal: 0.15,
            leak_max_conductance: 2.8,
            leak_conductance: 1.0,
            potential_time_constant: 0.1,
            output_function: OutputFunction::DiscreteSpiking,
            gain: 600.0,
            threshold_potential: 0.25,
            refractory_potential: 0.0,
            bias: 0.0,
        }
    }
}

impl PointNeuronRule {
    /// Inhibitory conductance that would hold `Vm` exactly at threshold
    /// given the neuron's current excitatory conductance.
    pub fn inhibitory_threshold_conductance(&self, state: &PointNeuronState) -> f64 {
        let excitatory = state.excitatory_conductance
            * self.excitatory_max_conductance
            * (self.excitatory_reversal - self.threshold_potential);
        let leak = self.leak_conductance * self.leak_max_conductance * (self.leak_reversal - self.threshold_potential);
        (excitatory + leak) / (self.threshold_potential - self.inhibitory_reversal)
    }

    fn above_threshold(&self, vm: f64) -> f64 {
        (vm - self.threshold_potential).max(0.0)
    }
}

impl_biased!(PointNeuronRule);

impl UpdateRule for PointNeuronRule {
    type State = PointNeuronState;

    fn rule_name(&self) -> &'static str {
        "Point Neuron"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Discrete
    }

    fn create_state(&self) -> PointNeuronState {
        PointNeuronState::default()
    }

    fn update(&self, neuron: &mut NeuronState, state: &mut PointNeuronState, _ctx: &UpdateContext, _rng: &mut SimRng) {
        let tau = self.net_time_constant;
        let vm = state.membrane_potential;

        state.excitatory_conductance = (1.0 - tau) * state.excitatory_conductance + tau * neuron.excitatory_input;
        state.inhibitory_conductance = (1.0 - tau) * state.inhibitory_conductance + tau * -neuron.inhibitory_input;

        state.excitatory_current =
            state.excitatory_conductance * self.excitatory_max_conductance * (vm - self.excitatory_reversal);
        state.inhibitory_current =
            state.inhibitory_conductance * self.inhibitory_max_conductance * (vm - self.inhibitory_reversal);
        state.leak_current = self.leak_conductance * self.leak_max_conductance * (vm - self.leak_reversal);
        state.net_current = state.leak_current + state.excitatory_current + state.inhibitory_current;
        state.membrane_potential = vm - self.potential_time_constant * state.net_current;

        let vm = state.membrane_potential;
        neuron.spike_buffer = false;
        neuron.buffer = match self.output_function {
            OutputFunction::DiscreteSpiking => {
                if vm > self.threshold_potential {
                    state.membrane_potential = self.refractory_potential;
                    neuron.spike_buffer = true;
                    1.0
                } else {
                    0.0
                }
            }
            OutputFunction::RateCode => {
                let drive = self.gain * self.above_threshold(vm);
                drive / (drive + 1.0) + self.bias
            }
            OutputFunction::Linear => self.gain * self.above_threshold(vm) + self.bias,
            OutputFunction::MembranePotential => vm,
        };
    }

    fn validate(&self) -> Result<()> {
        let name = self.rule_name();
        validation::probability(name, "net_time_constant", self.net_time_constant)?;
        validation::positive(name, "potential_time_constant", self.potential_time_constant)?;
        for (param, value) in [
            ("excitatory_max_conductance", self.excitatory_max_conductance),
            ("inhibitory_max_conductance", self.inhibitory_max_conductance),
            ("leak_max_conductance", self.leak_max_conductance),
            ("leak_conductance", self.leak_conductance),
            ("gain", self.gain),
        ] {
            validation::non_negative(name, param, value)?;
        }
        validation::finite(name, "threshold_potential", self.threshold_potential)
    }

    fn is_spiking(&self) -> bool {
        self.output_function == OutputFunction::DiscreteSpiking
    }

    fn graphical_upper_bound(&self) -> f64 {
        match self.output_function {
            OutputFunction::Linear => self.gain,
            _ => 1.0,
        }
    }

    fn graphical_lower_bound(&self) -> f64 {
        0.0
    }

    fn random_value(&self, rng: &mut SimRng) -> f64 {
        match self.output_function {
            OutputFunction::DiscreteSpiking => {
                if rng.gen::<bool>() {
                    1.0
                } else {
                    0.0
                }
            }
            OutputFunction::Linear => self.gain * self.threshold_potential * rng.gen::<f64>(),
            OutputFunction::RateCode | OutputFunction::MembranePotential => rng.gen::<f64>(),
        }
    }

    capability_accessors!(biased);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick};

    #[test]
    fn test_point_neuron_rests_at_leak_reversal() {
        let rule = PointNeuronRule {
            output_function: OutputFunction::MembranePotential,
            ..PointNeuronRule::default()
        };
        let mut state = rule.create_state();
        let mut n = NeuronState::new();
        let mut rng = rng();
        for _ in 0..20 {
            tick(&rule, &mut n, &mut state, 1.0, &mut rng);
        }
        assert!((n.activation - DEFAULT_MEMBRANE_POTENTIAL).abs() < 1e-12);
    }

    #[test]
    fn test_point_neuron_first_step() {
        let rule = PointNeuronRule {
            output_function: OutputFunction::MembranePotential,
            ..PointNeuronRule::default()
        };
        let mut state = rule.create_state();
        let mut n = NeuronState::new();
        n.set_input(1.0);
        tick(&rule, &mut n, &mut state, 1.0, &mut rng());
        // g_e = .7, I_e = .7 · .4 · (.15 − 1) = −.238
        assert!((state.excitatory_current - -0.238).abs() < 1e-12);
        assert!((n.activation - 0.1738).abs() < 1e-12);
    }

    #[test]
    fn test_point_neuron_discrete_spikes_and_resets() {
        let rule = PointNeuronRule::default();
        let mut state = rule.create_state();
        let mut n = NeuronState::new();
        n.set_input(3.0);
        let mut rng = rng();
        let mut spiked = false;
        for _ in 0..50 {
            tick(&rule, &mut n, &mut state, 1.0, &mut rng);
            if n.has_spiked {
                spiked = true;
                assert_eq!(n.activation, 1.0);
                assert_eq!(state.membrane_potential, rule.refractory_potential);
            }
        }
        assert!(spiked);
    }

    #[test]
    fn test_point_neuron_inhibition_lowers_potential() {
        let rule = PointNeuronRule {
            output_function: OutputFunction::MembranePotential,
            inhibitory_reversal: 0.0,
            ..PointNeuronRule::default()
        };
        let mut state = rule.create_state();
        let mut n = NeuronState::new();
        n.set_input(-1.0);
        tick(&rule, &mut n, &mut state, 1.0, &mut rng());
        assert!(state.inhibitory_conductance > 0.0);
        assert!(n.activation < DEFAULT_MEMBRANE_POTENTIAL);
    }

    #[test]
    fn test_point_neuron_linear_output_is_bias_below_threshold() {
        let rule = PointNeuronRule {
            output_function: OutputFunction::Linear,
            bias: 0.3,
            ..PointNeuronRule::default()
        };
        let mut state = rule.create_state();
        let mut n = NeuronState::new();
        tick(&rule, &mut n, &mut state, 1.0, &mut rng());
        assert!((n.activation - 0.3).abs() < 1e-12);
        assert!(!rule.is_spiking());
    }

    #[test]
    fn test_inhibitory_threshold_conductance() {
        let rule = PointNeuronRule::default();
        let state = PointNeuronState {
            excitatory_conductance: 1.0,
            ..PointNeuronState::default()
        };
        // (.4·.75 + 2.8·(−.1)) / (.25 − .15) = .2
        assert!((rule.inhibitory_threshold_conductance(&state) - 0.2).abs() < 1e-9);
    }
}
