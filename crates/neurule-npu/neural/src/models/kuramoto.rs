// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Kuramoto oscillator rule.
//!
//! ```text
//! θ' = ω + (1/N) · Σ_j w_j · sin(θ_j − θ)   [+ noise]
//! θ(t+dt) = wrap(θ + dt·θ')   into [0, 2π)
//! ```
//!
//! The activation is the phase. `N` is the fan-in size, taken as 1 when the
//! neuron has no incoming connections.

use core::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_noisy};
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KuramotoRule {
    /// ω (radians per unit time)
    pub natural_frequency: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KuramotoState {
    /// θ' from the most recent tick
    pub theta_dot: f64,
}

impl Default for KuramotoRule {
    fn default() -> Self {
        Self {
            natural_frequency: 1.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

/// Map a phase into `[0, 2π)`. NaN passes through.
pub fn wrap_phase(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly 2π for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

impl_noisy!(KuramotoRule);

impl UpdateRule for KuramotoRule {
    type State = KuramotoState;

    fn rule_name(&self) -> &'static str {
        "Kuramoto"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Continuous
    }

    fn create_state(&self) -> KuramotoState {
        KuramotoState::default()
    }

    fn update(&self, neuron: &mut NeuronState, state: &mut KuramotoState, ctx: &UpdateContext, rng: &mut SimRng) {
        let theta = neuron.activation;
        let coupling: f64 = neuron
            .fan_in
            .iter()
            .map(|s| s.weight * (s.source_activation - theta).sin())
            .sum();
        let n = neuron.fan_in.len().max(1) as f64;

        let theta_dot = self.natural_frequency + coupling / n + noise_term(self, rng);
        state.theta_dot = theta_dot;
        neuron.buffer = wrap_phase(theta + ctx.time_step * theta_dot);
    }

    fn validate(&self) -> Result<()> {
        validation::finite(self.rule_name(), "natural_frequency", self.natural_frequency)?;
        self.noise.validate()
    }

    fn graphical_upper_bound(&self) -> f64 {
        TAU
    }

    fn graphical_lower_bound(&self) -> f64 {
        0.0
    }

    fn random_value(&self, rng: &mut SimRng) -> f64 {
        use rand::Rng;
        TAU * rng.gen::<f64>()
    }

    capability_accessors!(noisy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick};
    use crate::types::FanInSample;
    use proptest::prelude::*;

    #[test]
    fn test_kuramoto_free_running() {
        let rule = KuramotoRule {
            natural_frequency: 2.0,
            ..KuramotoRule::default()
        };
        let mut state = rule.create_state();
        let mut n = NeuronState::with_activation(1.0);
        tick(&rule, &mut n, &mut state, 0.1, &mut rng());
        assert_eq!(state.theta_dot, 2.0);
        assert!((n.activation - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_kuramoto_coupling_pulls_toward_source() {
        let rule = KuramotoRule {
            natural_frequency: 0.0,
            ..KuramotoRule::default()
        };
        let mut state = rule.create_state();
        let mut n = NeuronState::with_activation(1.0);
        n.fan_in = vec![FanInSample::new(1.0, 1.5), FanInSample::new(1.0, 1.5)];
        tick(&rule, &mut n, &mut state, 0.1, &mut rng());
        assert!((state.theta_dot - 0.5f64.sin()).abs() < 1e-12);
        assert!(n.activation > 1.0);
    }

    #[test]
    fn test_wrap_phase() {
        assert_eq!(wrap_phase(0.0), 0.0);
        assert!((wrap_phase(TAU + 0.5) - 0.5).abs() < 1e-12);
        assert!((wrap_phase(-0.5) - (TAU - 0.5)).abs() < 1e-12);
        assert!(wrap_phase(-1e-18) < TAU);
        assert!(wrap_phase(f64::NAN).is_nan());
    }

    proptest! {
        #[test]
        fn prop_phase_stays_in_range(
            theta in -50.0f64..50.0,
            omega in -20.0f64..20.0,
            dt in 0.001f64..1.0,
            source in 0.0f64..TAU,
            weight in -5.0f64..5.0,
        ) {
            let rule = KuramotoRule { natural_frequency: omega, ..KuramotoRule::default() };
            let mut state = rule.create_state();
            let mut n = NeuronState::with_activation(theta);
            n.fan_in = vec![FanInSample::new(weight, source)];
            tick(&rule, &mut n, &mut state, dt, &mut rng());
            prop_assert!(n.activation >= 0.0 && n.activation < TAU);
        }
    }
}
