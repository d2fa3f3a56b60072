// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Linear rule: `buffer = slope · (input + bias)`, optionally noisy and clipped.

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_biased, impl_bounded, impl_clippable, impl_noisy, Clippable};
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearRule {
    pub slope: f64,
    pub bias: f64,
    pub clipping: bool,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

impl Default for LinearRule {
    fn default() -> Self {
        Self {
            slope: 1.0,
            bias: 0.0,
            clipping: true,
            upper_bound: 1.0,
            lower_bound: -1.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl_bounded!(LinearRule);
impl_clippable!(LinearRule);
impl_biased!(LinearRule);
impl_noisy!(LinearRule);

impl UpdateRule for LinearRule {
    type State = ();

    fn rule_name(&self) -> &'static str {
        "Linear"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Discrete
    }

    fn create_state(&self) {}

    fn update(&self, neuron: &mut NeuronState, _state: &mut (), _ctx: &UpdateContext, rng: &mut SimRng) {
        let mut value = self.slope * (neuron.input + self.bias);
        value += noise_term(self, rng);
        if self.clipping {
            value = self.clip(value);
        }
        neuron.buffer = value;
    }

    fn validate(&self) -> Result<()> {
        validation::finite(self.rule_name(), "slope", self.slope)?;
        validation::ordered(self.rule_name(), self.lower_bound, self.upper_bound)?;
        self.noise.validate()
    }

    capability_accessors!(bounded, clippable, biased, noisy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick};

    #[test]
    fn test_linear_slope_and_bias() {
        let rule = LinearRule {
            slope: 2.0,
            bias: 0.1,
            clipping: false,
            ..LinearRule::default()
        };
        let mut n = NeuronState::new();
        n.input = 0.4;
        tick(&rule, &mut n, &mut (), 1.0, &mut rng());
        assert!((n.activation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_clips_to_bounds() {
        let rule = LinearRule::default();
        let mut rng = rng();
        let mut n = NeuronState::new();
        n.input = 5.0;
        tick(&rule, &mut n, &mut (), 1.0, &mut rng);
        assert_eq!(n.activation, 1.0);
        n.input = -5.0;
        tick(&rule, &mut n, &mut (), 1.0, &mut rng);
        assert_eq!(n.activation, -1.0);
    }

    #[test]
    fn test_linear_noise_stays_clipped() {
        let rule = LinearRule {
            add_noise: true,
            noise: Randomizer::normal(0.0, 5.0),
            ..LinearRule::default()
        };
        let mut rng = rng();
        let mut n = NeuronState::new();
        for _ in 0..200 {
            tick(&rule, &mut n, &mut (), 1.0, &mut rng);
            assert!((-1.0..=1.0).contains(&n.activation));
        }
    }

    #[test]
    fn test_linear_validation() {
        assert!(LinearRule::default().validate().is_ok());
        let bad = LinearRule {
            lower_bound: 2.0,
            ..LinearRule::default()
        };
        assert!(bad.validate().is_err());
    }
}
