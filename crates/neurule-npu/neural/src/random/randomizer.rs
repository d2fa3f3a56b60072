// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Noise source: a distribution plus optional clipping bounds.

use serde::{Deserialize, Serialize};

use super::{ProbDistribution, SimRng};
use crate::capabilities::clip;
use crate::types::{Result, RuleError};

/// Draws values from a distribution, optionally saturating them to
/// `[lower_bound, upper_bound]`.
///
/// Cloning copies the parameters only. The stream lives in the generator the
/// caller passes to `sample`, so two clones never share state.
///
/// # Example
/// ```
/// use neurule_npu_neural::{Randomizer, SimRng};
/// use rand::SeedableRng;
///
/// let noise = Randomizer::uniform(-0.1, 0.1);
/// let mut rng = SimRng::seed_from_u64(42);
/// let v = noise.sample(&mut rng);
/// assert!((-0.1..=0.1).contains(&v));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Randomizer {
    pub distribution: ProbDistribution,
    pub upper_bound: f64,
    pub lower_bound: f64,
    /// Saturate samples to the bounds
    pub clipping: bool,
}

impl Randomizer {
    pub fn new(distribution: ProbDistribution) -> Self {
        Self {
            distribution,
            ..Self::default()
        }
    }

    /// Uniform on `[lower, upper)`, clipped to the same interval.
    pub fn uniform(lower: f64, upper: f64) -> Self {
        Self {
            distribution: ProbDistribution::Uniform {
                floor: lower,
                ceil: upper,
            },
            upper_bound: upper,
            lower_bound: lower,
            clipping: true,
        }
    }

    /// Unclipped Gaussian.
    pub fn normal(mean: f64, std_dev: f64) -> Self {
        Self::new(ProbDistribution::Normal { mean, std_dev })
    }

    pub fn with_clipping(mut self, lower: f64, upper: f64) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self.clipping = true;
        self
    }

    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        let value = self.distribution.sample(rng);
        if self.clipping {
            clip(value, self.lower_bound, self.upper_bound)
        } else {
            value
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.distribution.validate()?;
        if self.clipping && self.lower_bound > self.upper_bound {
            return Err(RuleError::invalid(
                "Randomizer",
                "lower_bound",
                "must not exceed upper_bound when clipping",
            ));
        }
        Ok(())
    }
}

impl Default for Randomizer {
    fn default() -> Self {
        Self {
            distribution: ProbDistribution::default(),
            upper_bound: 1.0,
            lower_bound: 0.0,
            clipping: false,
        }
    }
}
