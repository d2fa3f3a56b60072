// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Timed Accumulator Rule
//!
//! Stochastic spiking driven by a softmax over the incoming weights:
//!
//! ```text
//! p_j   = exp(κ·w_j) / Σ_k exp(κ·w_k)
//! drive = Σ_j p_j · a_j  [+ noise]
//! P     = p_base + (1 − p_base) · drive
//!
//! if refractory countdown > 0: no spike, countdown −= 1
//! else spike iff U(0,1) < P, then countdown = refractory_ticks
//! ```
//!
//! Large `κ` concentrates the drive on the strongest connection. The
//! softmax is computed directly, so an overflowing or empty denominator
//! produces NaN or zero drive rather than an error.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_noisy};
use crate::random::{Randomizer, SimRng};
use crate::types::{FanInSample, NeuronState, Result, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimedAccumulatorRule {
    /// Spontaneous firing probability per tick
    pub base_probability: f64,
    /// Softmax inverse temperature applied to weights
    pub kappa: f64,
    /// Ticks after a spike during which the neuron cannot fire
    pub refractory_ticks: u32,
    /// Output value on a spiking tick
    pub amplitude: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimedAccumulatorState {
    pub refractory_countdown: u32,
}

impl Default for TimedAccumulatorRule {
    fn default() -> Self {
        Self {
            base_probability: 0.001,
            kappa: 1.0,
            refractory_ticks: 5,
            amplitude: 1.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl TimedAccumulatorRule {
    /// Softmax-weighted source activation.
    pub fn drive(&self, fan_in: &[FanInSample]) -> f64 {
        let denominator: f64 = fan_in.iter().map(|s| (self.kappa * s.weight).exp()).sum();
        fan_in
            .iter()
            .map(|s| (self.kappa * s.weight).exp() / denominator * s.source_activation)
            .sum()
    }

    pub fn firing_probability(&self, drive: f64) -> f64 {
        self.base_probability + (1.0 - self.base_probability) * drive
    }
}

impl_noisy!(TimedAccumulatorRule);

impl UpdateRule for TimedAccumulatorRule {
    type State = TimedAccumulatorState;

    fn rule_name(&self) -> &'static str {
        "Timed Accumulator"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Discrete
    }

    fn create_state(&self) -> TimedAccumulatorState {
        TimedAccumulatorState::default()
    }

    fn update(
        &self,
        neuron: &mut NeuronState,
        state: &mut TimedAccumulatorState,
        _ctx: &UpdateContext,
        rng: &mut SimRng,
    ) {
        if state.refractory_countdown > 0 {
            state.refractory_countdown -= 1;
            neuron.spike_buffer = false;
            neuron.buffer = 0.0;
            return;
        }

        let drive = self.drive(&neuron.fan_in) + noise_term(self, rng);
        let fired = rng.gen::<f64>() < self.firing_probability(drive);
        if fired {
            state.refractory_countdown = self.refractory_ticks;
        }
        neuron.spike_buffer = fired;
        neuron.buffer = if fired { self.amplitude } else { 0.0 };
    }

    fn validate(&self) -> Result<()> {
        let name = self.rule_name();
        validation::probability(name, "base_probability", self.base_probability)?;
        validation::finite(name, "kappa", self.kappa)?;
        validation::finite(name, "amplitude", self.amplitude)?;
        self.noise.validate()
    }

    fn is_spiking(&self) -> bool {
        true
    }

    fn graphical_upper_bound(&self) -> f64 {
        self.amplitude.max(0.0)
    }

    fn graphical_lower_bound(&self) -> f64 {
        self.amplitude.min(0.0)
    }

    capability_accessors!(noisy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick};

    #[test]
    fn test_softmax_drive_weighted_average() {
        let rule = TimedAccumulatorRule {
            kappa: 0.0,
            ..TimedAccumulatorRule::default()
        };
        // κ = 0 gives uniform weighting
        let fan_in = [FanInSample::new(5.0, 1.0), FanInSample::new(-3.0, 0.0)];
        assert!((rule.drive(&fan_in) - 0.5).abs() < 1e-12);

        let sharp = TimedAccumulatorRule {
            kappa: 50.0,
            ..TimedAccumulatorRule::default()
        };
        assert!((sharp.drive(&fan_in) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_fan_in_has_zero_drive() {
        let rule = TimedAccumulatorRule::default();
        assert_eq!(rule.drive(&[]), 0.0);
    }

    #[test]
    fn test_certain_firing_then_refractory() {
        let rule = TimedAccumulatorRule {
            base_probability: 1.0,
            refractory_ticks: 3,
            ..TimedAccumulatorRule::default()
        };
        let mut state = rule.create_state();
        let mut n = NeuronState::new();
        let mut rng = rng();

        let pattern: Vec<bool> = (0..8)
            .map(|_| {
                tick(&rule, &mut n, &mut state, 1.0, &mut rng);
                n.has_spiked
            })
            .collect();
        assert_eq!(pattern, vec![true, false, false, false, true, false, false, false]);
    }

    #[test]
    fn test_zero_probability_never_fires() {
        let rule = TimedAccumulatorRule {
            base_probability: 0.0,
            ..TimedAccumulatorRule::default()
        };
        let mut state = rule.create_state();
        let mut n = NeuronState::new();
        let mut rng = rng();
        for _ in 0..100 {
            tick(&rule, &mut n, &mut state, 1.0, &mut rng);
            assert!(!n.has_spiked);
        }
    }
}
