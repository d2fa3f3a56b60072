// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Input Aggregation (Phase 1)
//!
//! Builds every neuron's input for the coming tick from the activations
//! committed at the end of the previous one. Sources are read from a
//! snapshot, so the pass can run in parallel and never observes a
//! half-updated population.

use neurule_npu_neural::{aggregate_fan_in, FanInSample, NeuronState};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One incoming connection: source neuron index and weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: usize,
    pub weight: f64,
}

impl Connection {
    pub fn new(source: usize, weight: f64) -> Self {
        Self { source, weight }
    }
}

/// Committed output of one neuron, as seen by its targets.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SourceSnapshot {
    activation: f64,
    spiked: bool,
}

/// Fill `input`, `excitatory_input`, `inhibitory_input` and `fan_in` of every
/// neuron. `external` is added on top of the synaptic input, split by sign.
///
/// All connection sources must be valid indices into `neurons`.
pub fn aggregate_inputs(neurons: &mut [NeuronState], fan_in: &[Vec<Connection>], external: &[f64], parallel: bool) {
    let snapshot: Vec<SourceSnapshot> = neurons
        .iter()
        .map(|n| SourceSnapshot {
            activation: n.activation,
            spiked: n.has_spiked,
        })
        .collect();

    let gather = |((neuron, connections), &external): ((&mut NeuronState, &Vec<Connection>), &f64)| {
        neuron.clear_input();
        neuron.fan_in.extend(connections.iter().map(|c| {
            let source = snapshot[c.source];
            FanInSample::new(c.weight, source.activation).with_spike(source.spiked)
        }));
        let totals = aggregate_fan_in(&neuron.fan_in);
        neuron.input = totals.net + external;
        neuron.excitatory_input = totals.excitatory + external.max(0.0);
        neuron.inhibitory_input = totals.inhibitory + external.min(0.0);
    };

    if parallel {
        neurons
            .par_iter_mut()
            .zip(fan_in.par_iter())
            .zip(external.par_iter())
            .for_each(gather);
    } else {
        neurons
            .iter_mut()
            .zip(fan_in.iter())
            .zip(external.iter())
            .for_each(gather);
    }
}
