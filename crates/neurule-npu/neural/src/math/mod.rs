// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Numeric helpers shared by the rules.

pub mod squashing;

pub use squashing::SquashingFunction;
