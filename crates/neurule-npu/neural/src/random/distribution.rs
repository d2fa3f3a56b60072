// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Probability distributions a `Randomizer` can draw from.

use rand::Rng;
use rand_distr::{Distribution, Exp, Gamma, LogNormal, Normal, Pareto};
use serde::{Deserialize, Serialize};

use super::SimRng;
use crate::types::{Result, RuleError};

/// A distribution together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbDistribution {
    Uniform { floor: f64, ceil: f64 },
    Normal { mean: f64, std_dev: f64 },
    Exponential { lambda: f64 },
    Gamma { shape: f64, scale: f64 },
    LogNormal { location: f64, scale: f64 },
    Pareto { slope: f64, min: f64 },
}

impl ProbDistribution {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform { .. } => "Uniform",
            Self::Normal { .. } => "Normal",
            Self::Exponential { .. } => "Exponential",
            Self::Gamma { .. } => "Gamma",
            Self::LogNormal { .. } => "Log-Normal",
            Self::Pareto { .. } => "Pareto",
        }
    }

    /// Natural support of the distribution as `(lower, upper)`.
    pub fn support(&self) -> (f64, f64) {
        match *self {
            Self::Uniform { floor, ceil } => (floor, ceil),
            Self::Normal { .. } => (f64::NEG_INFINITY, f64::INFINITY),
            Self::Exponential { .. } | Self::Gamma { .. } | Self::LogNormal { .. } => (0.0, f64::INFINITY),
            Self::Pareto { min, .. } => (min, f64::INFINITY),
        }
    }

    /// Draw one variate.
    ///
    /// Parameters outside a distribution's domain yield NaN rather than a
    /// panic; `validate` reports them at configuration time.
    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        match *self {
            Self::Uniform { floor, ceil } => floor + (ceil - floor) * rng.gen::<f64>(),
            Self::Normal { mean, std_dev } => Normal::new(mean, std_dev).map_or(f64::NAN, |d| d.sample(rng)),
            Self::Exponential { lambda } => Exp::new(lambda).map_or(f64::NAN, |d| d.sample(rng)),
            Self::Gamma { shape, scale } => Gamma::new(shape, scale).map_or(f64::NAN, |d| d.sample(rng)),
            Self::LogNormal { location, scale } => {
                LogNormal::new(location, scale).map_or(f64::NAN, |d| d.sample(rng))
            }
            Self::Pareto { slope, min } => Pareto::new(min, slope).map_or(f64::NAN, |d| d.sample(rng)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let check = |ok: bool, parameter: &str, reason: &str| {
            if ok {
                Ok(())
            } else {
                Err(RuleError::invalid("Randomizer", parameter, reason))
            }
        };
        match *self {
            Self::Uniform { floor, ceil } => check(floor <= ceil, "ceil", "must not be below floor"),
            Self::Normal { std_dev, .. } => check(std_dev >= 0.0, "std_dev", "must be non-negative"),
            Self::Exponential { lambda } => check(lambda > 0.0, "lambda", "must be positive"),
            Self::Gamma { shape, scale } => {
                check(shape > 0.0, "shape", "must be positive")?;
                check(scale > 0.0, "scale", "must be positive")
            }
            Self::LogNormal { scale, .. } => check(scale >= 0.0, "scale", "must be non-negative"),
            Self::Pareto { slope, min } => {
                check(slope > 0.0, "slope", "must be positive")?;
                check(min > 0.0, "min", "must be positive")
            }
        }
    }
}

impl Default for ProbDistribution {
    fn default() -> Self {
        Self::Uniform { floor: 0.0, ceil: 1.0 }
    }
}
