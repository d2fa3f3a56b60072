// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neural Types Module
//!
//! Core type definitions shared by every update rule.

pub mod error;
pub mod neuron;
pub mod time;

// Re-export commonly used types
pub use error::{Result, RuleError};
pub use neuron::{FanInSample, NeuronState, DEFAULT_INCREMENT};
pub use time::{TimeType, UpdateContext, DEFAULT_TIME_STEP};
