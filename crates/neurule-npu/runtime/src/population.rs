// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Population
//!
//! Flat per-neuron arrays driven through the buffered tick:
//!
//! 1. Apply queued parameter updates
//! 2. Aggregate inputs from the previous tick's activations
//! 3. Update every neuron (Rayon above the parallel threshold)
//! 4. Commit buffers to activations
//! 5. Advance network time
//!
//! Each neuron owns its rule state and its noise generator, so step 3 needs no
//! locking and the result does not depend on thread scheduling.

use std::time::{Duration, Instant};

use ahash::AHashMap;
use neurule_npu_neural::{NeuronRule, NeuronState, RuleKind, RuleState, SimRng, UpdateContext, DEFAULT_TIME_STEP};
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::error::{Result, RuntimeError};
use crate::parameter_update_queue::{ParameterUpdate, ParameterUpdateQueue, UpdateTarget};
use crate::propagation::{aggregate_inputs, Connection};

/// Below this many neurons the update pass stays on the calling thread
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Seed offset for the randomize-action generator, kept apart from the
/// per-neuron noise streams
const RANDOMIZE_SEED_OFFSET: u64 = 0x9e37_79b9_7f4a_7c15;

/// Ticks slower than this are reported with `warn!`
const SLOW_TICK: Duration = Duration::from_millis(20);

/// Outcome of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Network time after the tick
    pub time: f64,
    pub neurons_updated: usize,
    pub spikes: usize,
    pub updates_applied: usize,
    pub duration: Duration,
}

/// A population of neurons, each with its own rule.
#[derive(Debug)]
pub struct Population {
    neurons: Vec<NeuronState>,
    rules: Vec<NeuronRule>,
    states: Vec<RuleState>,
    noise_rngs: Vec<SimRng>,
    fan_in: Vec<Vec<Connection>>,
    external_input: Vec<f64>,
    randomize_rng: SimRng,
    updates: ParameterUpdateQueue,
    time_step: f64,
    time: f64,
    tick_count: u64,
    parallel_threshold: usize,
}

impl Population {
    pub fn builder(size: usize) -> PopulationBuilder {
        PopulationBuilder::new(size)
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn neurons(&self) -> &[NeuronState] {
        &self.neurons
    }

    pub fn neuron(&self, index: usize) -> Result<&NeuronState> {
        self.neurons.get(index).ok_or(self.out_of_range(index))
    }

    pub fn neuron_mut(&mut self, index: usize) -> Result<&mut NeuronState> {
        let len = self.len();
        self.neurons
            .get_mut(index)
            .ok_or(RuntimeError::IndexOutOfRange { index, len })
    }

    pub fn rule(&self, index: usize) -> Result<&NeuronRule> {
        self.rules.get(index).ok_or(self.out_of_range(index))
    }

    pub fn rule_state(&self, index: usize) -> Result<&RuleState> {
        self.states.get(index).ok_or(self.out_of_range(index))
    }

    pub fn fan_in(&self, index: usize) -> Result<&[Connection]> {
        self.fan_in
            .get(index)
            .map(Vec::as_slice)
            .ok_or(self.out_of_range(index))
    }

    /// Committed activations, in index order.
    pub fn activations(&self) -> Vec<f64> {
        self.neurons.iter().map(|n| n.activation).collect()
    }

    /// Indices of neurons that spiked on the last tick.
    pub fn spiked_indices(&self) -> Vec<usize> {
        self.neurons
            .iter()
            .enumerate()
            .filter(|(_, n)| n.has_spiked)
            .map(|(i, _)| i)
            .collect()
    }

    /// Spikes on the last tick, per rule kind.
    pub fn spike_counts_by_kind(&self) -> AHashMap<RuleKind, usize> {
        let mut counts = AHashMap::new();
        for (neuron, rule) in self.neurons.iter().zip(&self.rules) {
            if neuron.has_spiked {
                *counts.entry(rule.kind()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Handle for pushing parameter updates from other threads.
    pub fn parameter_updates(&self) -> ParameterUpdateQueue {
        self.updates.clone()
    }

    /// External drive added to a neuron's synaptic input every tick until changed.
    pub fn set_external_input(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.len();
        let slot = self
            .external_input
            .get_mut(index)
            .ok_or(RuntimeError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    pub fn set_external_inputs(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.len() {
            return Err(RuntimeError::InvalidParameters(format!(
                "expected {} external inputs, got {}",
                self.len(),
                values.len()
            )));
        }
        self.external_input.copy_from_slice(values);
        Ok(())
    }

    pub fn clear_external_inputs(&mut self) {
        self.external_input.fill(0.0);
    }

    /// Replace a neuron's rule. The neuron's rule state is recreated.
    pub fn set_rule(&mut self, index: usize, rule: NeuronRule) -> Result<()> {
        if index >= self.len() {
            return Err(self.out_of_range(index));
        }
        rule.validate()?;
        self.states[index] = rule.create_state();
        self.rules[index] = rule;
        Ok(())
    }

    /// Set one parameter on one neuron immediately.
    pub fn set_parameter(&mut self, index: usize, name: &str, value: serde_json::Value) -> Result<()> {
        let len = self.len();
        let rule = self
            .rules
            .get_mut(index)
            .ok_or(RuntimeError::IndexOutOfRange { index, len })?;
        rule.set_parameter_value(name, value)?;
        Ok(())
    }

    /// Return every neuron and rule state to rest. Time is not reset.
    pub fn clear(&mut self) {
        for ((neuron, rule), state) in self.neurons.iter_mut().zip(&self.rules).zip(&mut self.states) {
            rule.clear(neuron, state);
        }
    }

    /// Set every activation to a value suited to its rule, drawn from the
    /// randomize generator (never from the noise streams).
    pub fn randomize(&mut self) {
        for (neuron, rule) in self.neurons.iter_mut().zip(&self.rules) {
            let value = rule.random_value(&mut self.randomize_rng);
            neuron.force_set_activation(value);
        }
    }

    pub fn increment(&mut self, index: usize) -> Result<()> {
        self.neuron_mut(index)?;
        self.rules[index].increment_activation(&mut self.neurons[index]);
        Ok(())
    }

    pub fn decrement(&mut self, index: usize) -> Result<()> {
        self.neuron_mut(index)?;
        self.rules[index].decrement_activation(&mut self.neurons[index]);
        Ok(())
    }

    pub fn contextual_increment(&mut self, index: usize) -> Result<()> {
        self.neuron_mut(index)?;
        self.rules[index].contextual_increment(&mut self.neurons[index], &mut self.states[index]);
        Ok(())
    }

    pub fn contextual_decrement(&mut self, index: usize) -> Result<()> {
        self.neuron_mut(index)?;
        self.rules[index].contextual_decrement(&mut self.neurons[index], &mut self.states[index]);
        Ok(())
    }

    /// Run one tick.
    pub fn step(&mut self) -> TickReport {
        let tick_start = Instant::now();
        let updates_applied = self.apply_pending_updates();
        let parallel = self.len() >= self.parallel_threshold;

        aggregate_inputs(&mut self.neurons, &self.fan_in, &self.external_input, parallel);

        let ctx = UpdateContext::new(self.time_step, self.time);
        let update = |(((neuron, state), rng), rule): (((&mut NeuronState, &mut RuleState), &mut SimRng), &NeuronRule)| {
            rule.update(neuron, state, &ctx, rng);
        };
        if parallel {
            self.neurons
                .par_iter_mut()
                .zip(self.states.par_iter_mut())
                .zip(self.noise_rngs.par_iter_mut())
                .zip(self.rules.par_iter())
                .for_each(update);
        } else {
            self.neurons
                .iter_mut()
                .zip(self.states.iter_mut())
                .zip(self.noise_rngs.iter_mut())
                .zip(self.rules.iter())
                .for_each(update);
        }

        let mut spikes = 0;
        for neuron in &mut self.neurons {
            neuron.commit(ctx.time);
            if neuron.has_spiked {
                spikes += 1;
            }
        }

        self.time += self.time_step;
        self.tick_count += 1;

        let duration = tick_start.elapsed();
        if duration > SLOW_TICK {
            warn!(
                "[POPULATION] Slow tick {}: {:.2}ms for {} neurons",
                self.tick_count,
                duration.as_secs_f64() * 1000.0,
                self.len()
            );
        }
        trace!(
            tick = self.tick_count,
            time = self.time,
            spikes,
            parallel,
            "tick complete"
        );

        TickReport {
            tick: self.tick_count,
            time: self.time,
            neurons_updated: self.len(),
            spikes,
            updates_applied,
            duration,
        }
    }

    /// Run `ticks` ticks and return their reports.
    pub fn run(&mut self, ticks: u64) -> Vec<TickReport> {
        (0..ticks).map(|_| self.step()).collect()
    }

    /// Apply every queued parameter update. Rejected updates are logged and
    /// dropped; the rest take effect before the next tick.
    pub fn apply_pending_updates(&mut self) -> usize {
        let pending = self.updates.drain_all();
        if pending.is_empty() {
            return 0;
        }
        let mut applied = 0;
        for update in pending {
            if self.apply_update(&update) {
                applied += 1;
            }
        }
        debug!("[POPULATION] Applied {} parameter update(s)", applied);
        applied
    }

    fn apply_update(&mut self, update: &ParameterUpdate) -> bool {
        let targets = match update.target {
            UpdateTarget::All => 0..self.len(),
            UpdateTarget::Neuron(index) if index < self.len() => index..index + 1,
            UpdateTarget::Neuron(index) => {
                warn!(
                    "[POPULATION] Dropping update of `{}`: neuron {} out of range",
                    update.parameter_name, index
                );
                return false;
            }
        };
        let mut ok = true;
        for index in targets {
            if let Err(e) = self.rules[index].set_parameter_value(&update.parameter_name, update.value.clone()) {
                warn!("[POPULATION] Rejected update for neuron {}: {}", index, e);
                ok = false;
            }
        }
        ok
    }

    fn out_of_range(&self, index: usize) -> RuntimeError {
        RuntimeError::IndexOutOfRange { index, len: self.len() }
    }
}

/// Builder for [`Population`].
#[derive(Debug, Clone)]
pub struct PopulationBuilder {
    size: usize,
    rule: NeuronRule,
    time_step: f64,
    seed: u64,
    parallel_threshold: usize,
    connections: Vec<(usize, Connection)>,
    random_fan_in: Option<(f64, f64)>,
}

impl PopulationBuilder {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            rule: NeuronRule::default(),
            time_step: DEFAULT_TIME_STEP,
            seed: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            connections: Vec::new(),
            random_fan_in: None,
        }
    }

    /// Rule shared (by value) by every neuron.
    pub fn rule(mut self, rule: NeuronRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Neuron `i` draws its noise from a generator seeded with `seed + i`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn connect(mut self, source: usize, target: usize, weight: f64) -> Self {
        self.connections.push((target, Connection::new(source, weight)));
        self
    }

    /// Connect every ordered pair of distinct neurons with `probability`.
    pub fn random_fan_in(mut self, probability: f64, weight: f64) -> Self {
        self.random_fan_in = Some((probability, weight));
        self
    }

    pub fn build(self) -> Result<Population> {
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(RuntimeError::InvalidParameters(format!(
                "time step must be positive, got {}",
                self.time_step
            )));
        }
        self.rule.validate()?;

        let size = self.size;
        let mut fan_in: Vec<Vec<Connection>> = vec![Vec::new(); size];
        for &(target, connection) in &self.connections {
            for index in [target, connection.source] {
                if index >= size {
                    return Err(RuntimeError::IndexOutOfRange { index, len: size });
                }
            }
            fan_in[target].push(connection);
        }

        if let Some((probability, weight)) = self.random_fan_in {
            if !(0.0..=1.0).contains(&probability) {
                return Err(RuntimeError::InvalidParameters(format!(
                    "connection probability must be in [0, 1], got {probability}"
                )));
            }
            let mut rng = SimRng::seed_from_u64(self.seed.wrapping_add(RANDOMIZE_SEED_OFFSET).rotate_left(17));
            for (target, incoming) in fan_in.iter_mut().enumerate() {
                for source in (0..size).filter(|&s| s != target) {
                    if rng.gen::<f64>() < probability {
                        incoming.push(Connection::new(source, weight));
                    }
                }
            }
        }

        // Neurons start at the rule's rest, e.g. v = c for Izhikevich
        let mut neurons = vec![NeuronState::new(); size];
        let mut states: Vec<RuleState> = (0..size).map(|_| self.rule.create_state()).collect();
        for (neuron, state) in neurons.iter_mut().zip(&mut states) {
            self.rule.clear(neuron, state);
        }
        let noise_rngs = (0..size)
            .map(|i| SimRng::seed_from_u64(self.seed.wrapping_add(i as u64)))
            .collect();
        let synapses: usize = fan_in.iter().map(Vec::len).sum();

        debug!(
            "[POPULATION] Built {} x {} with {} connection(s), dt = {}",
            size,
            self.rule.name(),
            synapses,
            self.time_step
        );

        Ok(Population {
            neurons,
            rules: vec![self.rule; size],
            states,
            noise_rngs,
            fan_in,
            external_input: vec![0.0; size],
            randomize_rng: SimRng::seed_from_u64(self.seed ^ RANDOMIZE_SEED_OFFSET),
            updates: ParameterUpdateQueue::new(),
            time_step: self.time_step,
            time: 0.0,
            tick_count: 0,
            parallel_threshold: self.parallel_threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurule_npu_neural::models::{BinaryRule, SpikingThresholdRule};

    fn relay(size: usize) -> Population {
        let mut builder = Population::builder(size).rule(NeuronRule::from_tag("linear").unwrap());
        for i in 1..size {
            builder = builder.connect(i - 1, i, 1.0);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_buffered_update_is_order_independent() {
        let mut pop = relay(4);
        pop.set_external_input(0, 0.5).unwrap();

        pop.step();
        // Only the driven neuron moves on the first tick
        assert_eq!(pop.activations(), vec![0.5, 0.0, 0.0, 0.0]);
        pop.step();
        assert_eq!(pop.activations(), vec![0.5, 0.5, 0.0, 0.0]);
        pop.step();
        assert_eq!(pop.activations(), vec![0.5, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_time_advances() {
        let mut pop = Population::builder(2).time_step(0.5).build().unwrap();
        let reports = pop.run(4);
        assert_eq!(reports.len(), 4);
        assert_eq!(pop.time(), 2.0);
        assert_eq!(pop.tick_count(), 4);
        assert_eq!(reports[3].tick, 4);
    }

    #[test]
    fn test_spike_report_and_time() {
        let mut pop = Population::builder(3)
            .rule(SpikingThresholdRule::default().into())
            .build()
            .unwrap();
        pop.set_external_inputs(&[1.0, 0.0, 1.0]).unwrap();
        let report = pop.step();
        assert_eq!(report.spikes, 2);
        assert_eq!(pop.spiked_indices(), vec![0, 2]);
        assert_eq!(pop.neuron(0).unwrap().last_spike_time, 0.0);
        assert_eq!(pop.spike_counts_by_kind().get(&RuleKind::SpikingThreshold), Some(&2));
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let build = |threshold| {
            let mut pop = Population::builder(64)
                .rule(NeuronRule::from_tag("izhikevich").unwrap())
                .time_step(0.5)
                .seed(11)
                .random_fan_in(0.1, 2.0)
                .parallel_threshold(threshold)
                .build()
                .unwrap();
            pop.set_external_input(0, 10.0).unwrap();
            pop
        };
        let mut sequential = build(usize::MAX);
        let mut parallel = build(0);
        for _ in 0..50 {
            sequential.step();
            parallel.step();
        }
        assert_eq!(sequential.activations(), parallel.activations());
    }

    #[test]
    fn test_queued_updates_apply_between_ticks() {
        let mut pop = relay(2);
        let queue = pop.parameter_updates();
        queue.push(ParameterUpdate::all("slope", 2.0));
        queue.push(ParameterUpdate::neuron(1, "no_such_parameter", 1.0));
        queue.push(ParameterUpdate::neuron(7, "slope", 1.0));
        pop.set_external_input(0, 0.25).unwrap();

        let report = pop.step();
        assert_eq!(report.updates_applied, 1);
        assert_eq!(pop.activations()[0], 0.5);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_set_rule_validates() {
        let mut pop = relay(2);
        let bad = NeuronRule::Binary(BinaryRule {
            lower_bound: 2.0,
            ..BinaryRule::default()
        });
        assert!(matches!(pop.set_rule(0, bad), Err(RuntimeError::Rule(_))));
        assert!(matches!(
            pop.set_rule(5, NeuronRule::default()),
            Err(RuntimeError::IndexOutOfRange { index: 5, len: 2 })
        ));

        pop.set_rule(1, NeuronRule::from_tag("izhikevich").unwrap()).unwrap();
        assert_eq!(pop.rule_state(1).unwrap().kind(), RuleKind::Izhikevich);
    }

    #[test]
    fn test_build_rejects_bad_connections() {
        let err = Population::builder(2).connect(0, 3, 1.0).build().unwrap_err();
        assert_eq!(err, RuntimeError::IndexOutOfRange { index: 3, len: 2 });
        assert!(Population::builder(2).random_fan_in(1.5, 1.0).build().is_err());
        assert!(Population::builder(2).time_step(0.0).build().is_err());
    }

    #[test]
    fn test_random_fan_in_excludes_self() {
        let pop = Population::builder(5).random_fan_in(1.0, 0.5).build().unwrap();
        for i in 0..5 {
            let fan_in = pop.fan_in(i).unwrap();
            assert_eq!(fan_in.len(), 4);
            assert!(fan_in.iter().all(|c| c.source != i));
        }
    }

    #[test]
    fn test_randomize_uses_rule_bounds() {
        let mut pop = Population::builder(50).build().unwrap();
        pop.randomize();
        let values = pop.activations();
        assert!(values.iter().all(|v| (-1.0..=1.0).contains(v)));
        assert!(values.iter().any(|&v| v != values[0]));
    }

    #[test]
    fn test_built_neurons_start_at_rest() {
        let pop = Population::builder(3)
            .rule(NeuronRule::from_tag("izhikevich").unwrap())
            .build()
            .unwrap();
        assert!(pop.activations().iter().all(|&v| v == -65.0));

        let pop = Population::builder(2)
            .rule(NeuronRule::from_tag("hodgkin_huxley").unwrap())
            .build()
            .unwrap();
        assert!(pop.activations().iter().all(|&v| v == -65.0));

        // Rules without a resting potential start at zero
        assert_eq!(relay(2).activations(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_clear_and_increments() {
        let mut pop = Population::builder(1)
            .rule(NeuronRule::from_tag("izhikevich").unwrap())
            .build()
            .unwrap();
        pop.clear();
        assert_eq!(pop.neuron(0).unwrap().activation, -65.0);

        let mut pop = relay(1);
        pop.neuron_mut(0).unwrap().force_set_activation(0.95);
        pop.contextual_increment(0).unwrap();
        assert_eq!(pop.neuron(0).unwrap().activation, 1.0);
        pop.decrement(0).unwrap();
        assert!((pop.neuron(0).unwrap().activation - 0.9).abs() < 1e-12);
        assert!(pop.increment(3).is_err());
    }
}
