// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Binary rule: ceiling when biased input strictly exceeds the threshold,
//! floor otherwise.

use serde::{Deserialize, Serialize};

use super::traits::UpdateRule;
use super::validation;
use crate::capabilities::{capability_accessors, impl_biased, impl_bounded};
use crate::random::SimRng;
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryRule {
    pub threshold: f64,
    /// Output above threshold
    pub upper_bound: f64,
    /// Output at or below threshold
    pub lower_bound: f64,
    pub bias: f64,
}

impl Default for BinaryRule {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            upper_bound: 1.0,
            lower_bound: -1.0,
            bias: 0.0,
        }
    }
}

impl_bounded!(BinaryRule);
impl_biased!(BinaryRule);

impl UpdateRule for BinaryRule {
    type State = ();

    fn rule_name(&self) -> &'static str {
        "Binary"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Discrete
    }

    fn create_state(&self) {}

    fn update(&self, neuron: &mut NeuronState, _state: &mut (), _ctx: &UpdateContext, _rng: &mut SimRng) {
        neuron.buffer = if neuron.input + self.bias > self.threshold {
            self.upper_bound
        } else {
            self.lower_bound
        };
    }

    fn validate(&self) -> Result<()> {
        validation::finite(self.rule_name(), "threshold", self.threshold)?;
        validation::ordered(self.rule_name(), self.lower_bound, self.upper_bound)
    }

    /// Either the floor or the ceiling, with equal odds.
    fn random_value(&self, rng: &mut SimRng) -> f64 {
        use rand::Rng;
        if rng.gen::<bool>() {
            self.upper_bound
        } else {
            self.lower_bound
        }
    }

    capability_accessors!(bounded, biased);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick};

    #[test]
    fn test_binary_threshold_is_strict() {
        let rule = BinaryRule::default();
        let mut rng = rng();
        for (input, expected) in [(0.6, 1.0), (0.4, -1.0), (0.5, -1.0)] {
            let mut n = NeuronState::new();
            n.input = input;
            tick(&rule, &mut n, &mut (), 1.0, &mut rng);
            assert_eq!(n.activation, expected, "input {input}");
        }
    }

    #[test]
    fn test_binary_bias() {
        let rule = BinaryRule {
            bias: 0.2,
            ..BinaryRule::default()
        };
        let mut n = NeuronState::new();
        n.input = 0.4;
        tick(&rule, &mut n, &mut (), 1.0, &mut rng());
        assert_eq!(n.activation, 1.0);
    }

    #[test]
    fn test_binary_random_value_is_an_output_level() {
        let rule = BinaryRule::default();
        let mut rng = rng();
        for _ in 0..20 {
            let v = rule.random_value(&mut rng);
            assert!(v == 1.0 || v == -1.0);
        }
    }
}
