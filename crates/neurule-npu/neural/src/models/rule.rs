// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The closed set of update rules.
//!
//! `NeuronRule` is serialised internally tagged, so a preset reads
//! `{ type = "izhikevich", a = 0.02, ... }` and omitted fields take their
//! defaults. `RuleState` mirrors it variant for variant.

use serde::{Deserialize, Serialize};

use super::adex::AdExIfRule;
use super::binary::BinaryRule;
use super::clamped::ClampedRule;
use super::decay::DecayRule;
use super::fitzhugh_nagumo::FitzhughNagumoRule;
use super::hodgkin_huxley::HodgkinHuxleyRule;
use super::iac::IacRule;
use super::integrate_and_fire::IntegrateAndFireRule;
use super::izhikevich::IzhikevichRule;
use super::kuramoto::KuramotoRule;
use super::linear::LinearRule;
use super::morris_lecar::MorrisLecarRule;
use super::naka_rushton::NakaRushtonRule;
use super::point_neuron::PointNeuronRule;
use super::product::ProductRule;
use super::random_rule::RandomRule;
use super::sigmoidal::{ContinuousSigmoidalRule, SigmoidalRule};
use super::sorn::SornRule;
use super::spiking_threshold::SpikingThresholdRule;
use super::three_value::ThreeValueRule;
use super::timed_accumulator::TimedAccumulatorRule;
use super::traits::UpdateRule;
use crate::capabilities::{clip, Biased, Bounded, Clippable, Differentiable, Invertible, Noisy};
use crate::random::SimRng;
use crate::types::{NeuronState, Result, RuleError, TimeType, UpdateContext};

macro_rules! neuron_rules {
    ($($variant:ident($rule:ty) = $tag:literal),* $(,)?) => {
        /// Any update rule, with its parameters.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type")]
        pub enum NeuronRule {
            $(
                #[serde(rename = $tag)]
                $variant($rule),
            )*
        }

        /// Per-neuron dynamical state for whichever rule the neuron runs.
        #[derive(Debug, Clone, PartialEq)]
        pub enum RuleState {
            $($variant(<$rule as UpdateRule>::State),)*
        }

        /// Rule type without parameters.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum RuleKind {
            $(
                #[serde(rename = $tag)]
                $variant,
            )*
        }

        impl RuleKind {
            pub const ALL: &'static [RuleKind] = &[$(RuleKind::$variant),*];

            /// Tag used in presets and on the command line.
            pub fn tag(self) -> &'static str {
                match self {
                    $(RuleKind::$variant => $tag,)*
                }
            }

            pub fn from_tag(tag: &str) -> Option<RuleKind> {
                match tag {
                    $($tag => Some(RuleKind::$variant),)*
                    _ => None,
                }
            }

            /// The rule with every parameter at its default.
            pub fn default_rule(self) -> NeuronRule {
                match self {
                    $(RuleKind::$variant => NeuronRule::$variant(<$rule>::default()),)*
                }
            }
        }

        impl RuleState {
            pub fn kind(&self) -> RuleKind {
                match self {
                    $(RuleState::$variant(_) => RuleKind::$variant,)*
                }
            }
        }

        $(
            impl From<$rule> for NeuronRule {
                fn from(rule: $rule) -> Self {
                    NeuronRule::$variant(rule)
                }
            }
        )*

        impl NeuronRule {
            pub fn kind(&self) -> RuleKind {
                match self {
                    $(NeuronRule::$variant(_) => RuleKind::$variant,)*
                }
            }

            /// Human-readable rule name
            pub fn name(&self) -> &'static str {
                match self {
                    $(NeuronRule::$variant(r) => r.rule_name(),)*
                }
            }

            pub fn time_type(&self) -> TimeType {
                match self {
                    $(NeuronRule::$variant(r) => r.time_type(),)*
                }
            }

            pub fn create_state(&self) -> RuleState {
                match self {
                    $(NeuronRule::$variant(r) => RuleState::$variant(r.create_state()),)*
                }
            }

            /// Advance one neuron by one tick.
            ///
            /// A state left over from a different rule is replaced with a
            /// fresh one first.
            pub fn update(&self, neuron: &mut NeuronState, state: &mut RuleState, ctx: &UpdateContext, rng: &mut SimRng) {
                if state.kind() != self.kind() {
                    *state = self.create_state();
                }
                match (self, state) {
                    $((NeuronRule::$variant(r), RuleState::$variant(s)) => r.update(neuron, s, ctx, rng),)*
                    _ => {}
                }
            }

            pub fn clear(&self, neuron: &mut NeuronState, state: &mut RuleState) {
                if state.kind() != self.kind() {
                    *state = self.create_state();
                }
                match (self, state) {
                    $((NeuronRule::$variant(r), RuleState::$variant(s)) => r.clear(neuron, s),)*
                    _ => {}
                }
            }

            pub fn validate(&self) -> Result<()> {
                match self {
                    $(NeuronRule::$variant(r) => r.validate(),)*
                }
            }

            pub fn is_spiking(&self) -> bool {
                match self {
                    $(NeuronRule::$variant(r) => r.is_spiking(),)*
                }
            }

            pub fn graphical_upper_bound(&self) -> f64 {
                match self {
                    $(NeuronRule::$variant(r) => r.graphical_upper_bound(),)*
                }
            }

            pub fn graphical_lower_bound(&self) -> f64 {
                match self {
                    $(NeuronRule::$variant(r) => r.graphical_lower_bound(),)*
                }
            }

            /// Value for a randomize action; `rng` is not the noise stream.
            pub fn random_value(&self, rng: &mut SimRng) -> f64 {
                match self {
                    $(NeuronRule::$variant(r) => r.random_value(rng),)*
                }
            }

            pub fn as_bounded(&self) -> Option<&dyn Bounded> {
                match self {
                    $(NeuronRule::$variant(r) => r.as_bounded(),)*
                }
            }

            pub fn as_bounded_mut(&mut self) -> Option<&mut dyn Bounded> {
                match self {
                    $(NeuronRule::$variant(r) => r.as_bounded_mut(),)*
                }
            }

            pub fn as_clippable(&self) -> Option<&dyn Clippable> {
                match self {
                    $(NeuronRule::$variant(r) => r.as_clippable(),)*
                }
            }

            pub fn as_clippable_mut(&mut self) -> Option<&mut dyn Clippable> {
                match self {
                    $(NeuronRule::$variant(r) => r.as_clippable_mut(),)*
                }
            }

            pub fn as_biased(&self) -> Option<&dyn Biased> {
                match self {
                    $(NeuronRule::$variant(r) => r.as_biased(),)*
                }
            }

            pub fn as_biased_mut(&mut self) -> Option<&mut dyn Biased> {
                match self {
                    $(NeuronRule::$variant(r) => r.as_biased_mut(),)*
                }
            }

            pub fn as_noisy(&self) -> Option<&dyn Noisy> {
                match self {
                    $(NeuronRule::$variant(r) => r.as_noisy(),)*
                }
            }

            pub fn as_noisy_mut(&mut self) -> Option<&mut dyn Noisy> {
                match self {
                    $(NeuronRule::$variant(r) => r.as_noisy_mut(),)*
                }
            }

            pub fn as_differentiable(&self) -> Option<&dyn Differentiable> {
                match self {
                    $(NeuronRule::$variant(r) => r.as_differentiable(),)*
                }
            }

            pub fn as_invertible(&self) -> Option<&dyn Invertible> {
                match self {
                    $(NeuronRule::$variant(r) => r.as_invertible(),)*
                }
            }
        }
    };
}

neuron_rules! {
    Clamped(ClampedRule) = "clamped",
    Linear(LinearRule) = "linear",
    Sigmoidal(SigmoidalRule) = "sigmoidal",
    ContinuousSigmoidal(ContinuousSigmoidalRule) = "continuous_sigmoidal",
    Decay(DecayRule) = "decay",
    IntegrateAndFire(IntegrateAndFireRule) = "integrate_and_fire",
    AdEx(AdExIfRule) = "adex",
    Izhikevich(IzhikevichRule) = "izhikevich",
    FitzhughNagumo(FitzhughNagumoRule) = "fitzhugh_nagumo",
    MorrisLecar(MorrisLecarRule) = "morris_lecar",
    HodgkinHuxley(HodgkinHuxleyRule) = "hodgkin_huxley",
    Binary(BinaryRule) = "binary",
    ThreeValue(ThreeValueRule) = "three_value",
    SpikingThreshold(SpikingThresholdRule) = "spiking_threshold",
    TimedAccumulator(TimedAccumulatorRule) = "timed_accumulator",
    Sorn(SornRule) = "sorn",
    Kuramoto(KuramotoRule) = "kuramoto",
    Product(ProductRule) = "product",
    NakaRushton(NakaRushtonRule) = "naka_rushton",
    Random(RandomRule) = "random",
    Iac(IacRule) = "iac",
    PointNeuron(PointNeuronRule) = "point_neuron",
}

impl Default for NeuronRule {
    fn default() -> Self {
        NeuronRule::Linear(LinearRule::default())
    }
}

impl NeuronRule {
    /// Default-parameter rule for a preset tag such as `"izhikevich"`.
    pub fn from_tag(tag: &str) -> Result<NeuronRule> {
        RuleKind::from_tag(tag)
            .map(RuleKind::default_rule)
            .ok_or_else(|| RuleError::UnknownRule(tag.to_string()))
    }

    /// Raise the activation by the neuron's increment.
    pub fn increment_activation(&self, neuron: &mut NeuronState) {
        neuron.force_set_activation(neuron.activation + neuron.increment);
    }

    /// Lower the activation by the neuron's increment.
    pub fn decrement_activation(&self, neuron: &mut NeuronState) {
        neuron.force_set_activation(neuron.activation - neuron.increment);
    }

    /// Increment that respects the rule: clipped and sigmoidal rules
    /// saturate at their bounds, and the continuous sigmoidal rule keeps its
    /// net activation in step with the new output.
    pub fn contextual_increment(&self, neuron: &mut NeuronState, state: &mut RuleState) {
        let delta = neuron.increment;
        self.contextual_shift(neuron, state, delta);
    }

    pub fn contextual_decrement(&self, neuron: &mut NeuronState, state: &mut RuleState) {
        let delta = -neuron.increment;
        self.contextual_shift(neuron, state, delta);
    }

    fn contextual_shift(&self, neuron: &mut NeuronState, state: &mut RuleState, delta: f64) {
        if state.kind() != self.kind() {
            *state = self.create_state();
        }
        let target = neuron.activation + delta;
        match (self, state) {
            (NeuronRule::ContinuousSigmoidal(rule), RuleState::ContinuousSigmoidal(s)) => {
                rule.shift_activation(neuron, s, delta);
            }
            (NeuronRule::Sigmoidal(rule), _) => {
                neuron.force_set_activation(clip(target, rule.lower_bound, rule.upper_bound));
            }
            _ => match self.as_clippable() {
                Some(c) if c.is_clipped() => neuron.force_set_activation(c.clip(target)),
                _ => neuron.force_set_activation(target),
            },
        }
    }
}
