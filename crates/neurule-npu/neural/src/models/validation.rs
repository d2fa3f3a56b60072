// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Parameter checks shared by rule `validate` implementations.

use crate::types::{Result, RuleError};

pub(crate) fn finite(rule: &'static str, parameter: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RuleError::invalid(rule, parameter, format!("must be finite, got {value}")))
    }
}

pub(crate) fn positive(rule: &'static str, parameter: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(RuleError::invalid(rule, parameter, format!("must be positive, got {value}")))
    }
}

pub(crate) fn non_negative(rule: &'static str, parameter: &str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(RuleError::invalid(rule, parameter, format!("must be non-negative, got {value}")))
    }
}

pub(crate) fn probability(rule: &'static str, parameter: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RuleError::invalid(rule, parameter, format!("must be in [0, 1], got {value}")))
    }
}

pub(crate) fn ordered(rule: &'static str, lower: f64, upper: f64) -> Result<()> {
    finite(rule, "lower_bound", lower)?;
    finite(rule, "upper_bound", upper)?;
    if lower < upper {
        Ok(())
    } else {
        Err(RuleError::invalid(
            rule,
            "lower_bound",
            format!("must be below upper_bound ({lower} >= {upper})"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks() {
        assert!(positive("X", "tau", 1.0).is_ok());
        assert!(positive("X", "tau", 0.0).is_err());
        assert!(non_negative("X", "decay", 0.0).is_ok());
        assert!(probability("X", "p", 1.2).is_err());
        assert!(ordered("X", -1.0, 1.0).is_ok());
        assert!(ordered("X", 1.0, 1.0).is_err());
        assert!(finite("X", "v", f64::NAN).is_err());
    }
}
