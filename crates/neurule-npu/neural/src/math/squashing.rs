// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Squashing Functions
//!
//! Bounded sigmoids parameterized by an upper bound `U`, a lower bound `L` and
//! a slope `s` (the derivative at the midpoint).
//!
//! ```text
//! logistic(x) = (U-L) · σ(4·s·x / (U-L)) + L
//! tanh(x)     = (U-L)/2 · tanh(2·s·x / (U-L)) + (U+L)/2
//! arctan(x)   = (U-L)/π · atan(π·s·x / (U-L)) + (U+L)/2
//! ```
//!
//! Derivatives are taken with respect to the pre-activation `x`. Inverses map
//! an output back to the pre-activation and are exact inverses on `(L, U)`;
//! at the bounds they return ±∞ and outside them NaN.

use core::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Which sigmoid a rule squashes its input through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SquashingFunction {
    #[default]
    Logistic,
    Tanh,
    Arctan,
}

impl SquashingFunction {
    pub const ALL: [SquashingFunction; 3] = [Self::Logistic, Self::Tanh, Self::Arctan];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Logistic => "Logistic",
            Self::Tanh => "Tanh",
            Self::Arctan => "Arctan",
        }
    }

    /// Upper asymptote of the unscaled function.
    pub fn default_upper_bound(&self) -> f64 {
        match self {
            Self::Logistic | Self::Tanh => 1.0,
            Self::Arctan => PI / 2.0,
        }
    }

    /// Lower asymptote of the unscaled function.
    pub fn default_lower_bound(&self) -> f64 {
        match self {
            Self::Logistic => 0.0,
            Self::Tanh => -1.0,
            Self::Arctan => -PI / 2.0,
        }
    }

    pub fn value_of(&self, x: f64, upper: f64, lower: f64, slope: f64) -> f64 {
        match self {
            Self::Logistic => logistic(x, upper, lower, slope),
            Self::Tanh => tanh(x, upper, lower, slope),
            Self::Arctan => arctan(x, upper, lower, slope),
        }
    }

    pub fn deriv_val(&self, x: f64, upper: f64, lower: f64, slope: f64) -> f64 {
        match self {
            Self::Logistic => deriv_logistic(x, upper, lower, slope),
            Self::Tanh => deriv_tanh(x, upper, lower, slope),
            Self::Arctan => deriv_arctan(x, upper, lower, slope),
        }
    }

    pub fn inverse_val(&self, y: f64, upper: f64, lower: f64, slope: f64) -> f64 {
        match self {
            Self::Logistic => inv_logistic(y, upper, lower, slope),
            Self::Tanh => inv_tanh(y, upper, lower, slope),
            Self::Arctan => inv_arctan(y, upper, lower, slope),
        }
    }

    /// Apply the function element-wise. Extra elements of the longer slice are
    /// left untouched.
    pub fn value_of_slice(&self, inputs: &[f64], outputs: &mut [f64], upper: f64, lower: f64, slope: f64) {
        for (out, &x) in outputs.iter_mut().zip(inputs) {
            *out = self.value_of(x, upper, lower, slope);
        }
    }
}

/// Standard logistic σ(x) = 1 / (1 + e^-x).
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

pub fn logistic(x: f64, upper: f64, lower: f64, slope: f64) -> f64 {
    let diff = upper - lower;
    diff * sigmoid(4.0 * slope * x / diff) + lower
}

pub fn tanh(x: f64, upper: f64, lower: f64, slope: f64) -> f64 {
    let diff = upper - lower;
    let a = 2.0 * slope / diff;
    diff / 2.0 * (a * x).tanh() + (upper + lower) / 2.0
}

pub fn arctan(x: f64, upper: f64, lower: f64, slope: f64) -> f64 {
    let diff = upper - lower;
    let a = PI * slope / diff;
    diff / PI * (a * x).atan() + (upper + lower) / 2.0
}

pub fn deriv_logistic(x: f64, upper: f64, lower: f64, slope: f64) -> f64 {
    let diff = upper - lower;
    let y = logistic(x, upper, lower, slope);
    4.0 * slope / (diff * diff) * (y - lower) * (upper - y)
}

pub fn deriv_tanh(x: f64, upper: f64, lower: f64, slope: f64) -> f64 {
    let a = 2.0 * slope / (upper - lower);
    let sech = 1.0 / (a * x).cosh();
    slope * sech * sech
}

pub fn deriv_arctan(x: f64, upper: f64, lower: f64, slope: f64) -> f64 {
    let diff = upper - lower;
    let a = PI * slope / diff;
    a * (diff / PI) / (1.0 + (a * x).powi(2))
}

pub fn inv_logistic(y: f64, upper: f64, lower: f64, slope: f64) -> f64 {
    let diff = upper - lower;
    -(diff / (4.0 * slope)) * (diff / (y - lower) - 1.0).ln()
}

pub fn inv_tanh(y: f64, upper: f64, lower: f64, slope: f64) -> f64 {
    let diff = upper - lower;
    let a = 2.0 * slope / diff;
    let t = (2.0 * y - (upper + lower)) / diff;
    t.atanh() / a
}

pub fn inv_arctan(y: f64, upper: f64, lower: f64, slope: f64) -> f64 {
    // tan is periodic, so the domain has to be enforced by hand
    if y == upper {
        return f64::INFINITY;
    }
    if y == lower {
        return f64::NEG_INFINITY;
    }
    if !(y > lower && y < upper) {
        return f64::NAN;
    }
    let diff = upper - lower;
    let a = PI * slope / diff;
    let z = (y - (upper + lower) / 2.0) * PI / diff;
    z.tan() / a
}
