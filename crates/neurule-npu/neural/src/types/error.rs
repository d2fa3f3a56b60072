// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for rule configuration

use thiserror::Error;

/// Errors raised while configuring a rule.
///
/// Ticks never fail: numerical trouble inside an update shows up as NaN or
/// infinity in the neuron state, not as an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("{rule}: invalid value for `{parameter}`: {reason}")]
    InvalidParameter {
        rule: &'static str,
        parameter: String,
        reason: String,
    },

    #[error("{rule}: unknown parameter `{parameter}`")]
    UnknownParameter { rule: &'static str, parameter: String },

    #[error("unknown rule type `{0}`")]
    UnknownRule(String),

    #[error("parameter encoding failed: {0}")]
    Serialization(String),
}

impl RuleError {
    pub fn invalid(rule: &'static str, parameter: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            rule,
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RuleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for rule operations
pub type Result<T> = core::result::Result<T, RuleError>;
