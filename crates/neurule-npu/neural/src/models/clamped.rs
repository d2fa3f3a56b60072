// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Clamped rule: the neuron holds whatever activation it was given.

use serde::{Deserialize, Serialize};

use super::traits::UpdateRule;
use crate::random::SimRng;
use crate::types::{NeuronState, TimeType, UpdateContext};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClampedRule {}

impl UpdateRule for ClampedRule {
    type State = ();

    fn rule_name(&self) -> &'static str {
        "Clamped"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Discrete
    }

    fn create_state(&self) {}

    #[inline]
    fn update(&self, neuron: &mut NeuronState, _state: &mut (), _ctx: &UpdateContext, _rng: &mut SimRng) {
        neuron.buffer = neuron.activation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick};

    #[test]
    fn test_clamped_ignores_input() {
        let rule = ClampedRule::default();
        let mut rng = rng();
        for &input in &[-10.0, 0.0, 0.3, 1e9] {
            let mut n = NeuronState::with_activation(0.42);
            n.input = input;
            tick(&rule, &mut n, &mut (), 1.0, &mut rng);
            assert_eq!(n.activation, 0.42);
        }
    }
}
