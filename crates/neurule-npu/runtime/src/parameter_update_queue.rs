// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Parameter update queue for rule parameters.

Updates are pushed from any thread and applied by the population between
ticks, so a tick always runs with one consistent parameter set.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

/// Which neurons an update applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTarget {
    All,
    Neuron(usize),
}

/// A single parameter update command
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterUpdate {
    pub target: UpdateTarget,
    /// Parameter name, dotted for nested values
    pub parameter_name: String,
    /// New value
    pub value: Value,
}

impl ParameterUpdate {
    pub fn all(parameter_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            target: UpdateTarget::All,
            parameter_name: parameter_name.into(),
            value: value.into(),
        }
    }

    pub fn neuron(index: usize, parameter_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            target: UpdateTarget::Neuron(index),
            parameter_name: parameter_name.into(),
            value: value.into(),
        }
    }
}

/// Thread-safe queue for parameter updates
///
/// - Producers: push updates (short lock on the queue only)
/// - Population: drains between ticks, never mid-tick
///
/// Clones share the same underlying queue.
#[derive(Debug, Clone)]
pub struct ParameterUpdateQueue {
    queue: Arc<Mutex<VecDeque<ParameterUpdate>>>,
}

impl ParameterUpdateQueue {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::with_capacity(16))),
        }
    }

    pub fn push(&self, update: ParameterUpdate) {
        self.queue.lock().push_back(update);
    }

    /// Drain all pending updates in push order
    pub fn drain_all(&self) -> Vec<ParameterUpdate> {
        self.queue.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl Default for ParameterUpdateQueue {
    fn default() -> Self {
        Self::new()
    }
}
