// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Product rule: multiplies incoming responses (or raw source activations).

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_bounded, impl_clippable, impl_noisy, Clippable};
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductRule {
    /// Multiply post-synaptic responses instead of source activations
    pub use_weights: bool,
    pub clipping: bool,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

impl Default for ProductRule {
    fn default() -> Self {
        Self {
            use_weights: false,
            clipping: true,
            upper_bound: 1.0,
            lower_bound: -1.0,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl_bounded!(ProductRule);
impl_clippable!(ProductRule);
impl_noisy!(ProductRule);

impl UpdateRule for ProductRule {
    type State = ();

    fn rule_name(&self) -> &'static str {
        "Product"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Discrete
    }

    fn create_state(&self) {}

    fn update(&self, neuron: &mut NeuronState, _state: &mut (), _ctx: &UpdateContext, rng: &mut SimRng) {
        let mut value = if neuron.fan_in.is_empty() {
            0.0
        } else if self.use_weights {
            neuron.fan_in.iter().map(|s| s.psr).product::<f64>()
        } else {
            neuron.fan_in.iter().map(|s| s.source_activation).product::<f64>()
        };
        value += noise_term(self, rng);
        if self.clipping {
            value = self.clip(value);
        }
        neuron.buffer = value;
    }

    fn validate(&self) -> Result<()> {
        validation::ordered(self.rule_name(), self.lower_bound, self.upper_bound)?;
        self.noise.validate()
    }

    capability_accessors!(bounded, clippable, noisy);
}
