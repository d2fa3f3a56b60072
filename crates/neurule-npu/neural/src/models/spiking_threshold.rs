// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spiking threshold rule: spike and output 1 whenever input reaches the
//! threshold, otherwise output 0.

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_noisy};
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikingThresholdRule {
    pub threshold: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

impl Default for SpikingThresholdRule {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl_noisy!(SpikingThresholdRule);

impl UpdateRule for SpikingThresholdRule {
    type State = ();

    fn rule_name(&self) -> &'static str {
        "Spiking Threshold"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Discrete
    }

    fn create_state(&self) {}

    fn update(&self, neuron: &mut NeuronState, _state: &mut (), _ctx: &UpdateContext, rng: &mut SimRng) {
        let input = neuron.input + noise_term(self, rng);
        let spiked = input >= self.threshold;
        neuron.spike_buffer = spiked;
        neuron.buffer = if spiked { 1.0 } else { 0.0 };
    }

    fn validate(&self) -> Result<()> {
        validation::finite(self.rule_name(), "threshold", self.threshold)?;
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
    use crate::models::test_support::{rng, tick};

    #[test]
    fn test_spiking_threshold_inclusive() {
        let rule = SpikingThresholdRule::default();
        let mut rng = rng();
        for (input, spiked) in [(0.5, true), (0.7, true), (0.49, false)] {
            let mut n = NeuronState::new();
            n.input = input;
            tick(&rule, &mut n, &mut (), 1.0, &mut rng);
            assert_eq!(n.has_spiked, spiked, "input {input}");
            assert_eq!(n.activation, if spiked { 1.0 } else { 0.0 });
        }
    }
}
