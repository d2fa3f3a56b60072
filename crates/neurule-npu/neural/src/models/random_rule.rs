// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Random rule: ignores input, draws uniformly between the neuron's bounds.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::traits::UpdateRule;
use crate::random::SimRng;
use crate::types::{NeuronState, TimeType, UpdateContext};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RandomRule {}

impl UpdateRule for RandomRule {
    type State = ();

    fn rule_name(&self) -> &'static str {
        "Random"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Discrete
    }

    fn create_state(&self) {}

    fn update(&self, neuron: &mut NeuronState, _state: &mut (), _ctx: &UpdateContext, rng: &mut SimRng) {
        let (lower, upper) = (neuron.lower_bound, neuron.upper_bound);
        neuron.buffer = (upper - lower) * rng.gen::<f64>() + lower;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick};

    #[test]
    fn test_random_stays_in_neuron_bounds() {
        let rule = RandomRule::default();
        let mut n = NeuronState::new();
        n.lower_bound = 2.0;
        n.upper_bound = 3.0;
        n.input = 100.0;
        let mut rng = rng();
        for _ in 0..500 {
            tick(&rule, &mut n, &mut (), 1.0, &mut rng);
            assert!((2.0..3.0).contains(&n.activation));
        }
    }

    #[test]
    fn test_random_varies() {
        let rule = RandomRule::default();
        let mut n = NeuronState::new();
        let mut rng = rng();
        tick(&rule, &mut n, &mut (), 1.0, &mut rng);
        let first = n.activation;
        tick(&rule, &mut n, &mut (), 1.0, &mut rng);
        assert_ne!(first, n.activation);
    }
}
