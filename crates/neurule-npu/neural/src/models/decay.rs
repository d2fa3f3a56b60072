// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Decay rule: activation plus input relaxes toward a baseline each tick,
//! stopping exactly at the baseline instead of overshooting it.

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_bounded, impl_clippable, impl_noisy, Clippable};
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayType {
    /// Step is `decay_fraction · |value − baseline|`
    #[default]
    Relative,
    /// Step is `decay_amount`
    Absolute,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayRule {
    pub decay_type: DecayType,
    pub decay_amount: f64,
    pub decay_fraction: f64,
    pub base_line: f64,
    pub clipping: bool,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

impl Default for DecayRule {
    fn default() -> Self {
        Self {
            decay_type: DecayType::Relative,
            decay_amount: 0.1,
            decay_fraction: 0.1,
            base_line: 0.0,
            clipping: true,
            upper_bound: 1.0,
            lower_bound: -1.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl_bounded!(DecayRule);
impl_clippable!(DecayRule);
impl_noisy!(DecayRule);

impl UpdateRule for DecayRule {
    type State = ();

    fn rule_name(&self) -> &'static str {
        "Decay"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Discrete
    }

    fn create_state(&self) {}

    fn update(&self, neuron: &mut NeuronState, _state: &mut (), _ctx: &UpdateContext, rng: &mut SimRng) {
        let mut value = neuron.activation + neuron.input;
        let step = match self.decay_type {
            DecayType::Relative => self.decay_fraction * (value - self.base_line).abs(),
            DecayType::Absolute => self.decay_amount,
        };

        if value < self.base_line {
            value = (value + step).min(self.base_line);
        } else if value > self.base_line {
            value = (value - step).max(self.base_line);
        }

        value += noise_term(self, rng);
        if self.clipping {
            value = self.clip(value);
        }
        neuron.buffer = value;
    }

    fn validate(&self) -> Result<()> {
        validation::non_negative(self.rule_name(), "decay_amount", self.decay_amount)?;
        validation::probability(self.rule_name(), "decay_fraction", self.decay_fraction)?;
        validation::finite(self.rule_name(), "base_line", self.base_line)?;
        validation::ordered(self.rule_name(), self.lower_bound, self.upper_bound)?;
        self.noise.validate()
    }

    capability_accessors!(bounded, clippable, noisy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick};

    #[test]
    fn test_relative_decay() {
        let rule = DecayRule::default();
        let mut n = NeuronState::with_activation(0.5);
        tick(&rule, &mut n, &mut (), 1.0, &mut rng());
        assert!((n.activation - 0.45).abs() < 1e-12);

        let mut n = NeuronState::with_activation(-0.5);
        tick(&rule, &mut n, &mut (), 1.0, &mut rng());
        assert!((n.activation + 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_absolute_decay_stops_at_baseline() {
        let rule = DecayRule {
            decay_type: DecayType::Absolute,
            decay_amount: 0.3,
            base_line: 0.1,
            ..DecayRule::default()
        };
        let mut rng = rng();
        let mut n = NeuronState::with_activation(0.5);
        tick(&rule, &mut n, &mut (), 1.0, &mut rng);
        assert!((n.activation - 0.2).abs() < 1e-12);
        tick(&rule, &mut n, &mut (), 1.0, &mut rng);
        assert_eq!(n.activation, 0.1);
        tick(&rule, &mut n, &mut (), 1.0, &mut rng);
        assert_eq!(n.activation, 0.1);
    }

    #[test]
    fn test_decay_adds_input_then_clips() {
        let rule = DecayRule::default();
        let mut n = NeuronState::with_activation(0.9);
        n.input = 2.0;
        tick(&rule, &mut n, &mut (), 1.0, &mut rng());
        assert_eq!(n.activation, 1.0);
    }
}
