// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Named parameter access.
//!
//! Parameters are addressed by their serialised field name, with dots for
//! nested values (`noise.distribution.std_dev`). Writes go through serde and
//! then `validate`, so a rejected write leaves the rule untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::rule::NeuronRule;
use crate::types::{Result, RuleError};

/// A single parameter value as seen from outside the rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(f64),
    Flag(bool),
    /// Enumerated option such as a squashing function or decay type
    Choice(String),
}

impl ParamValue {
    fn from_json(value: &Value) -> Option<ParamValue> {
        match value {
            Value::Number(n) => n.as_f64().map(ParamValue::Scalar),
            Value::Bool(b) => Some(ParamValue::Flag(*b)),
            Value::String(s) => Some(ParamValue::Choice(s.clone())),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Choice(value.to_string())
    }
}

fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |node, key| node.as_object()?.get(key))
}

fn lookup_mut<'a>(root: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    path.split('.').try_fold(root, |node, key| node.as_object_mut()?.get_mut(key))
}

impl NeuronRule {
    /// Read a parameter by name. `None` for unknown names and for
    /// composite values such as a whole noise source.
    pub fn parameter(&self, name: &str) -> Option<ParamValue> {
        if name == "type" {
            return None;
        }
        let json = serde_json::to_value(self).ok()?;
        lookup(&json, name).and_then(ParamValue::from_json)
    }

    /// Top-level scalar, flag and choice parameter names.
    pub fn parameter_names(&self) -> Vec<String> {
        let Ok(Value::Object(map)) = serde_json::to_value(self) else {
            return Vec::new();
        };
        map.iter()
            .filter(|(key, value)| *key != "type" && ParamValue::from_json(value).is_some())
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn set_parameter(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<()> {
        let json = match value.into() {
            ParamValue::Scalar(v) => serde_json::Number::from_f64(v)
                .map(Value::Number)
                .ok_or_else(|| RuleError::invalid(self.name(), name, format!("must be finite, got {v}")))?,
            ParamValue::Flag(b) => Value::Bool(b),
            ParamValue::Choice(s) => Value::String(s),
        };
        self.set_parameter_value(name, json)
    }

    /// Write a parameter from a raw JSON value, then validate the result.
    pub fn set_parameter_value(&mut self, name: &str, value: Value) -> Result<()> {
        let rule = self.name();
        let unknown = || RuleError::UnknownParameter {
            rule,
            parameter: name.to_string(),
        };
        if name == "type" {
            return Err(unknown());
        }

        let mut json = serde_json::to_value(&*self)?;
        let slot = lookup_mut(&mut json, name).ok_or_else(unknown)?;

        let value = match (&*slot, value) {
            // Integer fields accept whole-valued scalars
            (Value::Number(old), Value::Number(new)) if old.is_u64() && !new.is_u64() => match new.as_f64() {
                Some(v) if v >= 0.0 && v.fract() == 0.0 => Value::from(v as u64),
                _ => return Err(RuleError::invalid(rule, name, "must be a non-negative integer")),
            },
            (Value::Number(_), v @ Value::Number(_)) => v,
            (Value::Bool(_), v @ Value::Bool(_)) => v,
            (Value::String(_), v @ Value::String(_)) => v,
            (Value::Object(_), v @ Value::Object(_)) => v,
            (old, v) => {
                return Err(RuleError::invalid(
                    rule,
                    name,
                    format!("expected {}, got {v}", kind_of(old)),
                ))
            }
        };
        *slot = value;

        let updated: NeuronRule =
            serde_json::from_value(json).map_err(|e| RuleError::invalid(rule, name, e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Number(_) => "a number",
        Value::Bool(_) => "a boolean",
        Value::String(_) => "a string",
        Value::Object(_) => "an object",
        Value::Array(_) => "an array",
        Value::Null => "null",
    }
}
