// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neuron State
//!
//! The mutable record a rule reads and writes each tick.
//!
//! ## Double buffering
//!
//! ```text
//! aggregate:  input, excitatory_input, inhibitory_input, fan_in  <- sources' activation
//! update:     buffer, spike_buffer                               <- rule
//! commit:     activation <- buffer, has_spiked <- spike_buffer
//! ```
//!
//! Rules never write `activation` during a tick. The only exception is an
//! explicit `force_set_activation`, used by clear/increment operations that
//! run between ticks.

/// Step used by increment/decrement operations on a fresh neuron.
pub const DEFAULT_INCREMENT: f64 = 0.1;

/// One incoming connection as seen by the target during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanInSample {
    /// Connection weight
    pub weight: f64,
    /// Source activation at the start of the tick
    pub source_activation: f64,
    /// Post-synaptic response delivered by this connection
    pub psr: f64,
    /// Whether the source spiked on the previous tick
    pub source_spiked: bool,
}

impl FanInSample {
    /// Sample whose response is `weight × source_activation`.
    pub fn new(weight: f64, source_activation: f64) -> Self {
        Self {
            weight,
            source_activation,
            psr: crate::synapse::compute_psr(weight, source_activation),
            source_spiked: false,
        }
    }

    pub fn with_spike(mut self, spiked: bool) -> Self {
        self.source_spiked = spiked;
        self
    }
}

/// Per-neuron state.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuronState {
    /// Committed output value
    pub activation: f64,
    /// Next activation, written by the rule
    pub buffer: f64,
    /// Net input accumulated for this tick
    pub input: f64,
    /// Sum of positive-weight responses
    pub excitatory_input: f64,
    /// Sum of non-positive-weight responses (zero or negative)
    pub inhibitory_input: f64,
    /// Incoming connections for rules that need more than the summed input
    pub fan_in: Vec<FanInSample>,
    /// Upper bound used by rules that delegate bounds to the neuron
    pub upper_bound: f64,
    /// Lower bound used by rules that delegate bounds to the neuron
    pub lower_bound: f64,
    /// Committed spike flag
    pub has_spiked: bool,
    /// Next spike flag, written by spiking rules
    pub spike_buffer: bool,
    /// Network time of the last committed spike
    pub last_spike_time: f64,
    /// Step used by increment/decrement operations
    pub increment: f64,
}

impl NeuronState {
    pub fn new() -> Self {
        Self {
            activation: 0.0,
            buffer: 0.0,
            input: 0.0,
            excitatory_input: 0.0,
            inhibitory_input: 0.0,
            fan_in: Vec::new(),
            upper_bound: 1.0,
            lower_bound: -1.0,
            has_spiked: false,
            spike_buffer: false,
            last_spike_time: f64::NEG_INFINITY,
            increment: DEFAULT_INCREMENT,
        }
    }

    /// Fresh neuron whose committed and buffered activation are both `value`.
    pub fn with_activation(value: f64) -> Self {
        let mut state = Self::new();
        state.force_set_activation(value);
        state
    }

    /// Set the committed activation immediately, bypassing the buffer.
    pub fn force_set_activation(&mut self, value: f64) {
        self.activation = value;
        self.buffer = value;
    }

    /// Replace the tick's input with a single scalar (no fan-in detail).
    pub fn set_input(&mut self, value: f64) {
        self.input = value;
        if value > 0.0 {
            self.excitatory_input = value;
            self.inhibitory_input = 0.0;
        } else {
            self.excitatory_input = 0.0;
            self.inhibitory_input = value;
        }
    }

    /// Zero the tick's inputs ahead of the next aggregation.
    pub fn clear_input(&mut self) {
        self.input = 0.0;
        self.excitatory_input = 0.0;
        self.inhibitory_input = 0.0;
        self.fan_in.clear();
    }

    /// Copy the buffers into the committed fields.
    ///
    /// `time` is the network time of the tick being committed and is recorded
    /// as `last_spike_time` when the neuron spiked.
    pub fn commit(&mut self, time: f64) {
        self.activation = self.buffer;
        self.has_spiked = self.spike_buffer;
        if self.spike_buffer {
            self.last_spike_time = time;
        }
    }

    /// Reset both spike flags.
    pub fn clear_spikes(&mut self) {
        self.has_spiked = false;
        self.spike_buffer = false;
    }
}

impl Default for NeuronState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_neuron_defaults() {
        let n = NeuronState::new();
        assert_eq!(n.activation, 0.0);
        assert_eq!(n.upper_bound, 1.0);
        assert_eq!(n.lower_bound, -1.0);
        assert_eq!(n.increment, DEFAULT_INCREMENT);
        assert!(!n.has_spiked);
        assert_eq!(n.last_spike_time, f64::NEG_INFINITY);
    }

    #[test]
    fn test_commit_copies_buffers() {
        let mut n = NeuronState::new();
        n.buffer = 0.7;
        n.spike_buffer = true;
        assert_eq!(n.activation, 0.0);

        n.commit(3.5);
        assert_eq!(n.activation, 0.7);
        assert!(n.has_spiked);
        assert_eq!(n.last_spike_time, 3.5);

        n.spike_buffer = false;
        n.commit(4.0);
        assert!(!n.has_spiked);
        // Last spike time survives non-spiking ticks
        assert_eq!(n.last_spike_time, 3.5);
    }

    #[test]
    fn test_set_input_splits_sign() {
        let mut n = NeuronState::new();
        n.set_input(0.4);
        assert_eq!(n.excitatory_input, 0.4);
        assert_eq!(n.inhibitory_input, 0.0);

        n.set_input(-0.3);
        assert_eq!(n.excitatory_input, 0.0);
        assert_eq!(n.inhibitory_input, -0.3);

        n.clear_input();
        assert_eq!(n.input, 0.0);
        assert!(n.fan_in.is_empty());
    }

    #[test]
    fn test_fan_in_sample_psr() {
        let s = FanInSample::new(0.5, -2.0).with_spike(true);
        assert_eq!(s.psr, -1.0);
        assert!(s.source_spiked);
    }
}
