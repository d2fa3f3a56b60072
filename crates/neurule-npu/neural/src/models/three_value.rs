// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Three-value rule: a step function with two thresholds.

use serde::{Deserialize, Serialize};

use super::traits::UpdateRule;
use super::validation;
use crate::capabilities::{capability_accessors, impl_biased};
use crate::random::SimRng;
use crate::types::{NeuronState, Result, RuleError, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreeValueRule {
    pub bias: f64,
    pub lower_threshold: f64,
    pub upper_threshold: f64,
    pub lower_value: f64,
    pub middle_value: f64,
    pub upper_value: f64,
}

impl Default for ThreeValueRule {
    fn default() -> Self {
        Self {
            bias: 0.0,
            lower_threshold: 0.0,
            upper_threshold: 1.0,
            lower_value: -1.0,
            middle_value: 0.0,
            upper_value: 1.0,
        }
    }
}

impl_biased!(ThreeValueRule);

impl UpdateRule for ThreeValueRule {
    type State = ();

    fn rule_name(&self) -> &'static str {
        "Three Value"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Discrete
    }

    fn create_state(&self) {}

    fn update(&self, neuron: &mut NeuronState, _state: &mut (), _ctx: &UpdateContext, _rng: &mut SimRng) {
        let x = neuron.input + self.bias;
        neuron.buffer = if x < self.lower_threshold {
            self.lower_value
        } else if x > self.upper_threshold {
            self.upper_value
        } else {
            self.middle_value
        };
    }

    fn validate(&self) -> Result<()> {
        let name = self.rule_name();
        validation::finite(name, "lower_threshold", self.lower_threshold)?;
        validation::finite(name, "upper_threshold", self.upper_threshold)?;
        if self.lower_threshold > self.upper_threshold {
            return Err(RuleError::invalid(name, "lower_threshold", "must not exceed upper_threshold"));
        }
        Ok(())
    }

    fn graphical_upper_bound(&self) -> f64 {
        self.upper_value
    }

    fn graphical_lower_bound(&self) -> f64 {
        self.lower_value
    }

    capability_accessors!(biased);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick};

    #[test]
    fn test_three_value_regions() {
        let rule = ThreeValueRule::default();
        let mut rng = rng();
        for (input, expected) in [(-0.1, -1.0), (0.0, 0.0), (0.5, 0.0), (1.0, 0.0), (1.1, 1.0)] {
            let mut n = NeuronState::new();
            n.input = input;
            tick(&rule, &mut n, &mut (), 1.0, &mut rng);
            assert_eq!(n.activation, expected, "input {input}");
        }
    }

    #[test]
    fn test_three_value_rejects_crossed_thresholds() {
        let rule = ThreeValueRule {
            lower_threshold: 2.0,
            ..ThreeValueRule::default()
        };
        assert!(rule.validate().is_err());
    }
}
