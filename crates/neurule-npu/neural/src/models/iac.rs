// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Interactive activation and competition (IAC) rule.
//!
//! Excitatory net input pushes the activation toward the upper bound,
//! inhibitory net input toward the lower bound, and both relax toward `rest`:
//!
//! ```text
//! I > 0:  a += I·(U − a) − decay·(a − rest)
//! else:   a += I·(a − L) − decay·(a − rest)
//! ```

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_bounded, impl_clippable, impl_noisy, Clippable};
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IacRule {
    pub decay: f64,
    pub rest: f64,
    pub clipping: bool,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

impl Default for IacRule {
    fn default() -> Self {
        Self {
            decay: 0.05,
            rest: 0.1,
            clipping: true,
            upper_bound: 1.0,
            lower_bound: -0.2,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl_bounded!(IacRule);
impl_clippable!(IacRule);
impl_noisy!(IacRule);

impl UpdateRule for IacRule {
    type State = ();

    fn rule_name(&self) -> &'static str {
        "IAC"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Discrete
    }

    fn create_state(&self) {}

    fn update(&self, neuron: &mut NeuronState, _state: &mut (), _ctx: &UpdateContext, rng: &mut SimRng) {
        let a = neuron.activation;
        let net = neuron.input;
        let leak = self.decay * (a - self.rest);

        let mut value = if net > 0.0 {
            a + net * (self.upper_bound - a) - leak
        } else {
            a + net * (a - self.lower_bound) - leak
        };
        value += noise_term(self, rng);
        if self.clipping {
            value = self.clip(value);
        }
        neuron.buffer = value;
    }

    fn validate(&self) -> Result<()> {
        let name = self.rule_name();
        validation::non_negative(name, "decay", self.decay)?;
        validation::finite(name, "rest", self.rest)?;
        validation::ordered(name, self.lower_bound, self.upper_bound)?;
        self.noise.validate()
    }

    capability_accessors!(bounded, clippable, noisy);
}
