// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for runtime operations

use neurule_npu_neural::RuleError;
use thiserror::Error;

/// Runtime errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Neuron index past the end of the population
    #[error("neuron index {index} out of range (population size {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Invalid parameters provided
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A rule rejected its parameters
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Result type for runtime operations
pub type Result<T> = core::result::Result<T, RuntimeError>;
