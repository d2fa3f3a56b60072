// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Random variates for noise injection and stochastic rules.
//!
//! Generators are always supplied by the caller. Simulation noise and GUI
//! randomization use different `SimRng` handles so that randomizing a display
//! never perturbs a seeded run.

pub mod distribution;
pub mod randomizer;

pub use distribution::ProbDistribution;
pub use randomizer::Randomizer;

/// Generator type threaded through every update.
pub type SimRng = rand::rngs::StdRng;
