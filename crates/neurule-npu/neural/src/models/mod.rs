// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neuron Update Rules
//!
//! Each rule lives in its own module as a plain parameter struct
//! implementing [`UpdateRule`]. [`NeuronRule`] closes the set into one enum
//! so populations can mix rules and presets can name them by tag.
//!
//! ## Adding a New Rule
//!
//! 1. Create `src/models/your_rule.rs` with a parameter struct
//! 2. Implement `UpdateRule` (plus any capability traits)
//! 3. Add tests
//! 4. Register it in the `neuron_rules!` invocation in `rule.rs`

pub mod traits;
pub(crate) mod validation;

pub mod adex;
pub mod binary;
pub mod clamped;
pub mod decay;
pub mod fitzhugh_nagumo;
pub mod hodgkin_huxley;
pub mod iac;
pub mod integrate_and_fire;
pub mod izhikevich;
pub mod kuramoto;
pub mod linear;
pub mod morris_lecar;
pub mod naka_rushton;
pub mod point_neuron;
pub mod product;
pub mod random_rule;
pub mod sigmoidal;
pub mod sorn;
pub mod spiking_threshold;
pub mod three_value;
pub mod timed_accumulator;

mod params;
mod rule;

// Re-export core types
pub use params::ParamValue;
pub use rule::{NeuronRule, RuleKind, RuleState};
pub use traits::UpdateRule;

pub use adex::{AdExIfRule, AdExState};
pub use binary::BinaryRule;
pub use clamped::ClampedRule;
pub use decay::{DecayRule, DecayType};
pub use fitzhugh_nagumo::{FitzhughNagumoRule, FitzhughNagumoState};
pub use hodgkin_huxley::{HodgkinHuxleyRule, HodgkinHuxleyState};
pub use iac::IacRule;
pub use integrate_and_fire::IntegrateAndFireRule;
pub use izhikevich::{IzhikevichRule, IzhikevichState};
pub use kuramoto::{KuramotoRule, KuramotoState};
pub use linear::LinearRule;
pub use morris_lecar::{MorrisLecarRule, MorrisLecarState};
pub use naka_rushton::{NakaRushtonRule, NakaRushtonState};
pub use point_neuron::{OutputFunction, PointNeuronRule, PointNeuronState};
pub use product::ProductRule;
pub use random_rule::RandomRule;
pub use sigmoidal::{ContinuousSigmoidalRule, ContinuousSigmoidalState, SigmoidalRule};
pub use sorn::{SornRule, SornState};
pub use spiking_threshold::SpikingThresholdRule;
pub use three_value::ThreeValueRule;
pub use timed_accumulator::{TimedAccumulatorRule, TimedAccumulatorState};
