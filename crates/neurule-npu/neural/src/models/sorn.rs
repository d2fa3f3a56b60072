// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! SORN rule: stochastic binary unit with an intrinsically plastic threshold.
//!
//! ```text
//! P(fire) = σ(gain · (input [+ noise] − θ))      (0 while refractory)
//! θ      += η · (activation − target_rate),  θ ≤ θ_max
//! ```
//!
//! The threshold adapts every tick, including refractory ones, from the
//! activation committed on the previous tick, pulling the long-run firing
//! rate toward `target_rate`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_noisy};
use crate::math::squashing::sigmoid;
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, RuleError, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SornRule {
    pub initial_threshold: f64,
    pub max_threshold: f64,
    /// Intrinsic plasticity learning rate η
    pub eta_ip: f64,
    pub target_rate: f64,
    pub gain: f64,
    /// Time after a spike during which the unit cannot fire
    pub refractory_period: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SornState {
    pub threshold: f64,
}

impl Default for SornRule {
    fn default() -> Self {
        Self {
            initial_threshold: 0.25,
            max_threshold: 0.5,
            eta_ip: 0.01,
            target_rate: 0.1,
            gain: 20.0,
            refractory_period: 1.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl_noisy!(SornRule);

impl UpdateRule for SornRule {
    type State = SornState;

    fn rule_name(&self) -> &'static str {
        "SORN"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Discrete
    }

    fn create_state(&self) -> SornState {
        SornState {
            threshold: self.initial_threshold,
        }
    }

    fn update(&self, neuron: &mut NeuronState, state: &mut SornState, ctx: &UpdateContext, rng: &mut SimRng) {
        let refractory = neuron.last_spike_time + self.refractory_period >= ctx.time;
        let input = neuron.input + noise_term(self, rng);

        let fired = if refractory {
            false
        } else {
            let p = sigmoid(self.gain * (input - state.threshold));
            rng.gen::<f64>() < p
        };
        let out = if fired { 1.0 } else { 0.0 };

        state.threshold += self.eta_ip * (neuron.activation - self.target_rate);
        if state.threshold > self.max_threshold {
            state.threshold = self.max_threshold;
        }

        neuron.spike_buffer = fired;
        neuron.buffer = out;
    }

    fn validate(&self) -> Result<()> {
        let name = self.rule_name();
        validation::probability(name, "target_rate", self.target_rate)?;
        validation::non_negative(name, "eta_ip", self.eta_ip)?;
        validation::non_negative(name, "gain", self.gain)?;
        validation::non_negative(name, "refractory_period", self.refractory_period)?;
        if self.initial_threshold > self.max_threshold {
            return Err(RuleError::invalid(name, "initial_threshold", "must not exceed max_threshold"));
        }
        self.noise.validate()
    }

    fn is_spiking(&self) -> bool {
        true
    }

    fn graphical_upper_bound(&self) -> f64 {
        1.0
    }

    fn graphical_lower_bound(&self) -> f64 {
        0.0
    }

    capability_accessors!(noisy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick_at};

    #[test]
    fn test_sorn_threshold_drops_when_silent() {
        let rule = SornRule::default();
        let mut state = rule.create_state();
        let mut n = NeuronState::new();
        n.input = -100.0;
        tick_at(&rule, &mut n, &mut state, 1.0, 0.0, &mut rng());
        assert!(!n.has_spiked);
        assert!((state.threshold - (0.25 - 0.01 * 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_sorn_threshold_follows_committed_activation() {
        let rule = SornRule::default();
        let mut state = rule.create_state();
        let mut n = NeuronState::with_activation(1.0);
        n.input = -100.0;
        tick_at(&rule, &mut n, &mut state, 1.0, 0.0, &mut rng());
        // Silent this tick, but the previous output still raises θ
        assert!(!n.has_spiked);
        assert_eq!(n.activation, 0.0);
        assert!((state.threshold - (0.25 + 0.01 * (1.0 - 0.1))).abs() < 1e-12);
    }

    #[test]
    fn test_sorn_threshold_capped() {
        let rule = SornRule {
            initial_threshold: 0.5,
            refractory_period: 0.0,
            ..SornRule::default()
        };
        let mut state = rule.create_state();
        let mut n = NeuronState::new();
        n.input = 100.0;
        let mut rng = rng();
        for t in 0..50 {
            tick_at(&rule, &mut n, &mut state, 1.0, f64::from(t), &mut rng);
            assert!(state.threshold <= rule.max_threshold);
        }
        assert_eq!(state.threshold, rule.max_threshold);
    }

    #[test]
    fn test_sorn_refractory_blocks_consecutive_spikes() {
        let rule = SornRule {
            refractory_period: 2.0,
            ..SornRule::default()
        };
        let mut state = rule.create_state();
        let mut n = NeuronState::new();
        n.input = 100.0;
        let mut rng = rng();
        let spikes: Vec<bool> = (0..6)
            .map(|t| {
                tick_at(&rule, &mut n, &mut state, 1.0, f64::from(t), &mut rng);
                n.has_spiked
            })
            .collect();
        assert_eq!(spikes, vec![true, false, false, true, false, false]);
    }
}
