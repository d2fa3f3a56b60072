// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! FitzHugh-Nagumo rule.
//!
//! ```text
//! w(t+dt) = w + dt · a · (v + b − c·w)
//! v(t+dt) = v + dt · (v − v³/3 − w + I_bg + I)
//! ```
//!
//! A spike is registered on every tick that ends with `v ≥ threshold`.
//! There is no reset; the recovery variable brings `v` back down.

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_noisy};
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitzhughNagumoRule {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub i_bg: f64,
    pub threshold: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FitzhughNagumoState {
    /// Recovery variable
    pub w: f64,
}

impl Default for FitzhughNagumoRule {
    fn default() -> Self {
        Self {
            a: 0.08,
            b: 0.7,
            c: 0.8,
            i_bg: 0.5,
            threshold: 1.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl_noisy!(FitzhughNagumoRule);

impl UpdateRule for FitzhughNagumoRule {
    type State = FitzhughNagumoState;

    fn rule_name(&self) -> &'static str {
        "FitzHugh-Nagumo"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Continuous
    }

    fn create_state(&self) -> FitzhughNagumoState {
        FitzhughNagumoState::default()
    }

    fn update(
        &self,
        neuron: &mut NeuronState,
        state: &mut FitzhughNagumoState,
        ctx: &UpdateContext,
        rng: &mut SimRng,
    ) {
        let dt = ctx.time_step;
        let v = neuron.activation;
        let input = neuron.input + self.i_bg + noise_term(self, rng);

        state.w += dt * self.a * (v + self.b - self.c * state.w);
        let v_next = v + dt * (v - v * v * v / 3.0 - state.w + input);

        neuron.spike_buffer = v_next >= self.threshold;
        neuron.buffer = v_next;
    }

    fn validate(&self) -> Result<()> {
        let name = self.rule_name();
        validation::positive(name, "a", self.a)?;
        validation::finite(name, "b", self.b)?;
        validation::finite(name, "c", self.c)?;
        validation::finite(name, "threshold", self.threshold)?;
        self.noise.validate()
    }

    fn is_spiking(&self) -> bool {
        true
    }

    fn graphical_upper_bound(&self) -> f64 {
        2.5
    }

    fn graphical_lower_bound(&self) -> f64 {
        -2.5
    }

    capability_accessors!(noisy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick};

    #[test]
    fn test_fhn_single_step() {
        let rule = FitzhughNagumoRule::default();
        let mut state = rule.create_state();
        let mut n = NeuronState::with_activation(0.0);
        tick(&rule, &mut n, &mut state, 0.1, &mut rng());

        // w = 0.1 · 0.08 · 0.7, then v = 0.1 · (−w + 0.5)
        let w = 0.1 * 0.08 * 0.7;
        assert!((state.w - w).abs() < 1e-12);
        assert!((n.activation - 0.1 * (0.5 - w)).abs() < 1e-12);
        assert!(!n.has_spiked);
    }

    #[test]
    fn test_fhn_oscillates_with_repeated_spikes() {
        let rule = FitzhughNagumoRule::default();
        let mut state = rule.create_state();
        let mut n = NeuronState::with_activation(-1.2);
        let mut rng = rng();
        let mut spikes = 0;
        for _ in 0..5000 {
            tick(&rule, &mut n, &mut state, 0.1, &mut rng);
            if n.has_spiked {
                spikes += 1;
            }
        }
        // Limit cycle period is a few dozen time units
        assert!(spikes >= 3, "spikes = {spikes}");
    }

    #[test]
    fn test_fhn_spikes_every_tick_above_threshold() {
        let rule = FitzhughNagumoRule::default();
        let mut state = rule.create_state();
        let mut n = NeuronState::with_activation(1.5);
        n.set_input(5.0);
        let mut rng = rng();
        for _ in 0..3 {
            tick(&rule, &mut n, &mut state, 0.01, &mut rng);
            assert!(n.activation >= rule.threshold);
            assert!(n.has_spiked);
        }
    }
}
