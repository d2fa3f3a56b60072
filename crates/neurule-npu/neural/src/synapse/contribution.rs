// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Synaptic contribution calculation
//!
//! Pure functions for computing the input a neuron receives from its fan-in.

use crate::types::FanInSample;

/// Post-synaptic response of one connection
///
/// `psr = weight × source_activation`
///
/// Excitatory and inhibitory connections share the formula; the sign of the
/// weight carries the polarity.
///
/// # Example
/// ```
/// use neurule_npu_neural::synapse::compute_psr;
///
/// assert_eq!(compute_psr(0.5, 1.0), 0.5);
/// assert_eq!(compute_psr(-0.5, 1.0), -0.5);
/// ```
#[inline]
pub fn compute_psr(weight: f64, source_activation: f64) -> f64 {
    weight * source_activation
}

/// Input totals for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputTotals {
    /// Sum of all responses
    pub net: f64,
    /// Sum of responses from positive weights
    pub excitatory: f64,
    /// Sum of responses from zero or negative weights
    pub inhibitory: f64,
}

/// Sum the responses of a fan-in, split by weight polarity
///
/// # Example
/// ```
/// use neurule_npu_neural::{aggregate_fan_in, FanInSample};
///
/// let fan_in = [FanInSample::new(1.0, 0.5), FanInSample::new(-2.0, 0.25)];
/// let totals = aggregate_fan_in(&fan_in);
///
/// assert_eq!(totals.net, 0.0);
/// assert_eq!(totals.excitatory, 0.5);
/// assert_eq!(totals.inhibitory, -0.5);
/// ```
pub fn aggregate_fan_in(fan_in: &[FanInSample]) -> InputTotals {
    let mut totals = InputTotals::default();
    for sample in fan_in {
        totals.net += sample.psr;
        if sample.weight > 0.0 {
            totals.excitatory += sample.psr;
        } else {
            totals.inhibitory += sample.psr;
        }
    }
    totals
}
