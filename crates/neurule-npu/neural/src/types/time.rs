// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Time semantics of a rule and the per-tick context handed to it.

use serde::{Deserialize, Serialize};

/// Default integration step, in the simulation's time unit (ms for the
/// conductance based models).
pub const DEFAULT_TIME_STEP: f64 = 0.1;

/// Whether a rule is a pure map of its inputs or integrates over `dt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeType {
    /// Output depends only on the current inputs; `dt` is ignored.
    Discrete,
    /// Output integrates a differential equation with step `dt`.
    Continuous,
}

/// Per-tick simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateContext {
    /// Integration step `dt`
    pub time_step: f64,
    /// Network time at the start of this tick
    pub time: f64,
}

impl UpdateContext {
    pub fn new(time_step: f64, time: f64) -> Self {
        Self { time_step, time }
    }
}

impl Default for UpdateContext {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            time: 0.0,
        }
    }
}
