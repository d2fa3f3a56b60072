// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Update Rule Trait
//!
//! A rule is an immutable parameter set. Everything that evolves from tick to
//! tick (recovery variables, adaptive thresholds, refractory counters) lives
//! in the associated `State`, one value per neuron, created by
//! `create_state` and handed back to `update` by the owner.

use core::fmt::Debug;

use rand::Rng;

use crate::capabilities::{Biased, Bounded, Clippable, Differentiable, Invertible, Noisy};
use crate::random::SimRng;
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

/// One neuron update algorithm.
pub trait UpdateRule: Clone + Debug + Send + Sync {
    /// Per-neuron dynamical variables
    type State: Clone + Debug + PartialEq + Send + Sync;

    /// Human-readable rule name
    fn rule_name(&self) -> &'static str;

    fn time_type(&self) -> TimeType;

    /// Rule state for a freshly created or cleared neuron.
    fn create_state(&self) -> Self::State;

    /// Advance one tick.
    ///
    /// Reads `neuron.activation`, `neuron.input` (and fan-in where relevant),
    /// writes `neuron.buffer` and, for spiking rules, `neuron.spike_buffer`.
    /// Never fails: numerical trouble propagates as NaN/∞.
    fn update(
        &self,
        neuron: &mut NeuronState,
        state: &mut Self::State,
        ctx: &UpdateContext,
        rng: &mut SimRng,
    );

    /// Return the neuron to its resting condition.
    fn clear(&self, neuron: &mut NeuronState, state: &mut Self::State) {
        neuron.force_set_activation(0.0);
        neuron.clear_spikes();
        *state = self.create_state();
    }

    /// Check parameters at configuration time.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn is_spiking(&self) -> bool {
        false
    }

    fn graphical_upper_bound(&self) -> f64 {
        self.as_bounded().map_or(1.0, |b| b.upper_bound())
    }

    fn graphical_lower_bound(&self) -> f64 {
        self.as_bounded().map_or(-1.0, |b| b.lower_bound())
    }

    /// Value suitable for a randomize action.
    ///
    /// `rng` should not be the neuron's simulation noise generator.
    fn random_value(&self, rng: &mut SimRng) -> f64 {
        match self.as_bounded() {
            Some(b) => (b.upper_bound() - b.lower_bound()) * rng.gen::<f64>() + b.lower_bound(),
            None => 2.0 * rng.gen::<f64>() - 1.0,
        }
    }

    fn as_bounded(&self) -> Option<&dyn Bounded> {
        None
    }
    fn as_bounded_mut(&mut self) -> Option<&mut dyn Bounded> {
        None
    }
    fn as_clippable(&self) -> Option<&dyn Clippable> {
        None
    }
    fn as_clippable_mut(&mut self) -> Option<&mut dyn Clippable> {
        None
    }
    fn as_biased(&self) -> Option<&dyn Biased> {
        None
    }
    fn as_biased_mut(&mut self) -> Option<&mut dyn Biased> {
        None
    }
    fn as_noisy(&self) -> Option<&dyn Noisy> {
        None
    }
    fn as_noisy_mut(&mut self) -> Option<&mut dyn Noisy> {
        None
    }
    fn as_differentiable(&self) -> Option<&dyn Differentiable> {
        None
    }
    fn as_invertible(&self) -> Option<&dyn Invertible> {
        None
    }
}

/// Draw from a rule's noise source when enabled, otherwise 0.
#[inline]
pub(crate) fn noise_term(noisy: &dyn Noisy, rng: &mut SimRng) -> f64 {
    if noisy.add_noise() {
        noisy.noise().sample(rng)
    } else {
        0.0
    }
}
