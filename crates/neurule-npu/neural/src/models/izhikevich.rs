// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Izhikevich Rule
//!
//! ```text
//! u(t+dt) = u + dt · a · (b·v − u)                       (recovery first)
//! v(t+dt) = v + dt · (0.04·v² + 5·v + 140 − u + I_bg + I)
//!
//! if v(t+dt) ≥ θ: spike, v = c, u = u + d
//! ```
//!
//! The recovery update uses the membrane potential from the previous tick.

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_noisy};
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IzhikevichRule {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    /// Peak potential that counts as a spike
    pub threshold: f64,
    pub i_bg: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

/// Recovery variable `u`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IzhikevichState {
    pub recovery: f64,
}

impl Default for IzhikevichRule {
    fn default() -> Self {
        Self {
            a: 0.02,
            b: 0.2,
            c: -65.0,
            d: 6.0,
            threshold: 30.0,
            i_bg: 14.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl_noisy!(IzhikevichRule);

impl UpdateRule for IzhikevichRule {
    type State = IzhikevichState;

    fn rule_name(&self) -> &'static str {
        "Izhikevich"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Continuous
    }

    fn create_state(&self) -> IzhikevichState {
        IzhikevichState::default()
    }

    fn update(&self, neuron: &mut NeuronState, state: &mut IzhikevichState, ctx: &UpdateContext, rng: &mut SimRng) {
        let dt = ctx.time_step;
        let v = neuron.activation;
        let input = neuron.input + noise_term(self, rng);

        state.recovery += dt * (self.a * (self.b * v - state.recovery));
        let mut v_next = v + dt * (0.04 * v * v + 5.0 * v + 140.0 - state.recovery + self.i_bg + input);

        if v_next >= self.threshold {
            v_next = self.c;
            state.recovery += self.d;
            neuron.spike_buffer = true;
        } else {
            neuron.spike_buffer = false;
        }
        neuron.buffer = v_next;
    }

    fn clear(&self, neuron: &mut NeuronState, state: &mut IzhikevichState) {
        *state = self.create_state();
        neuron.force_set_activation(self.c);
        neuron.clear_spikes();
    }

    fn validate(&self) -> Result<()> {
        let name = self.rule_name();
        for (param, value) in [("a", self.a), ("b", self.b), ("c", self.c), ("d", self.d), ("i_bg", self.i_bg)] {
            validation::finite(name, param, value)?;
        }
        validation::finite(name, "threshold", self.threshold)?;
        self.noise.validate()
    }

    fn is_spiking(&self) -> bool {
        true
    }

    fn graphical_upper_bound(&self) -> f64 {
        self.threshold
    }

    fn graphical_lower_bound(&self) -> f64 {
        self.c - 15.0
    }

    capability_accessors!(noisy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick};

    #[test]
    fn test_izhikevich_recovery_updates_first() {
        let rule = IzhikevichRule::default();
        let mut state = IzhikevichState::default();
        let mut n = NeuronState::with_activation(-65.0);
        tick(&rule, &mut n, &mut state, 1.0, &mut rng());

        assert!((state.recovery - 0.02 * (0.2 * -65.0)).abs() < 1e-12);
        assert!((state.recovery + 0.26).abs() < 1e-12);
        assert!(!n.has_spiked);
    }

    #[test]
    fn test_izhikevich_spike_resets() {
        let rule = IzhikevichRule::default();
        let mut state = IzhikevichState { recovery: -10.0 };
        let mut n = NeuronState::with_activation(29.0);
        tick(&rule, &mut n, &mut state, 1.0, &mut rng());

        assert!(n.has_spiked);
        assert_eq!(n.activation, -65.0);
        // u = −10 + 0.02·(0.2·29 + 10) + 6
        assert!((state.recovery - (-10.0 + 0.02 * (0.2 * 29.0 + 10.0) + 6.0)).abs() < 1e-12);
    }

    #[test]
    fn test_izhikevich_tonic_spiking() {
        let rule = IzhikevichRule::default();
        let mut state = rule.create_state();
        let mut n = NeuronState::new();
        rule.clear(&mut n, &mut state);
        let mut rng = rng();
        let spikes = (0..2000)
            .filter(|_| {
                tick(&rule, &mut n, &mut state, 0.1, &mut rng);
                n.has_spiked
            })
            .count();
        assert!(spikes > 0);
    }
}
