// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Integrate-and-Fire Rule
//!
//! ```text
//! τ · dV/dt = −(V − V_rest) + R · (I_bg + I [+ noise])
//!
//! Euler step:
//!     V(t+dt) = V + dt · (−(V − V_rest) + R·(I_bg + I)) / τ
//!
//! Firing check:
//!     if V(t+dt) ≥ θ: spike, V = V_reset
//! ```

use serde::{Deserialize, Serialize};

use super::traits::{noise_term, UpdateRule};
use super::validation;
use crate::capabilities::{capability_accessors, impl_noisy};
use crate::random::{Randomizer, SimRng};
use crate::types::{NeuronState, Result, TimeType, UpdateContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrateAndFireRule {
    pub resistance: f64,
    pub time_constant: f64,
    pub threshold: f64,
    pub reset_potential: f64,
    pub resting_potential: f64,
    pub background_current: f64,
    pub add_noise: bool,
    pub noise: Randomizer,
}

impl Default for IntegrateAndFireRule {
    fn default() -> Self {
        Self {
            resistance: 1.0,
            time_constant: 30.0,
            threshold: 15.0,
            reset_potential: 13.5,
            resting_potential: 0.0,
            background_current: 13.5,
            add_noise: false,
            noise: Randomizer::default(),
        }
    }
}

impl_noisy!(IntegrateAndFireRule);

impl UpdateRule for IntegrateAndFireRule {
    type State = ();

    fn rule_name(&self) -> &'static str {
        "Integrate and Fire"
    }

    fn time_type(&self) -> TimeType {
        TimeType::Continuous
    }

    fn create_state(&self) {}

    fn update(&self, neuron: &mut NeuronState, _state: &mut (), ctx: &UpdateContext, rng: &mut SimRng) {
        let v = neuron.activation;
        let current = self.background_current + neuron.input + noise_term(self, rng);
        let dv = -(v - self.resting_potential) + self.resistance * current;
        let v_next = v + ctx.time_step * dv / self.time_constant;

        if v_next >= self.threshold {
            neuron.spike_buffer = true;
            neuron.buffer = self.reset_potential;
        } else {
            neuron.spike_buffer = false;
            neuron.buffer = v_next;
        }
    }

    fn clear(&self, neuron: &mut NeuronState, _state: &mut ()) {
        neuron.force_set_activation(self.resting_potential);
        neuron.clear_spikes();
    }

    fn validate(&self) -> Result<()> {
        let name = self.rule_name();
        validation::positive(name, "time_constant", self.time_constant)?;
        validation::finite(name, "resistance", self.resistance)?;
        validation::finite(name, "threshold", self.threshold)?;
        if self.reset_potential >= self.threshold {
            return Err(crate::types::RuleError::invalid(
                name,
                "reset_potential",
                "must be below threshold",
            ));
        }
        self.noise.validate()
    }

    fn is_spiking(&self) -> bool {
        true
    }

    fn graphical_upper_bound(&self) -> f64 {
        self.threshold
    }

    fn graphical_lower_bound(&self) -> f64 {
        self.resting_potential.min(self.reset_potential)
    }

    capability_accessors!(noisy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{rng, tick};

    #[test]
    fn test_if_integrates_toward_drive() {
        let rule = IntegrateAndFireRule::default();
        let mut n = NeuronState::with_activation(0.0);
        tick(&rule, &mut n, &mut (), 1.0, &mut rng());
        // dV = 1 · (0 + 13.5) / 30
        assert!((n.activation - 0.45).abs() < 1e-12);
        assert!(!n.has_spiked);
    }

    #[test]
    fn test_if_fires_and_resets() {
        let rule = IntegrateAndFireRule::default();
        let mut n = NeuronState::with_activation(14.9);
        n.input = 5.0;
        tick(&rule, &mut n, &mut (), 1.0, &mut rng());
        assert!(n.has_spiked);
        assert_eq!(n.activation, 13.5);

        // Without extra input the background drive alone stays subthreshold
        n.input = 0.0;
        tick(&rule, &mut n, &mut (), 1.0, &mut rng());
        assert!(!n.has_spiked);
    }

    #[test]
    fn test_if_rejects_reset_above_threshold() {
        let rule = IntegrateAndFireRule {
            reset_potential: 20.0,
            ..IntegrateAndFireRule::default()
        };
        assert!(rule.validate().is_err());
        assert!(rule.is_spiking());
    }
}
