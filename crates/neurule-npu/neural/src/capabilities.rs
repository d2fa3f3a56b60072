// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Rule Capabilities
//!
//! Optional facets a rule may expose. They are orthogonal: a rule can be
//! noisy without being bounded, bounded without clipping, and so on.
//! Callers discover them through the `as_*` accessors on `UpdateRule` and
//! `NeuronRule`, which return `None` when the rule lacks the facet.

use crate::random::Randomizer;

/// Saturate `value` to `[lower, upper]`.
///
/// NaN passes through unchanged.
///
/// # Example
/// ```
/// use neurule_npu_neural::clip;
///
/// assert_eq!(clip(2.0, -1.0, 1.0), 1.0);
/// assert_eq!(clip(-2.0, -1.0, 1.0), -1.0);
/// assert!(clip(f64::NAN, -1.0, 1.0).is_nan());
/// ```
#[inline]
pub fn clip(value: f64, lower: f64, upper: f64) -> f64 {
    if value > upper {
        upper
    } else if value < lower {
        lower
    } else {
        value
    }
}

/// Rule with an output range.
pub trait Bounded {
    fn upper_bound(&self) -> f64;
    fn lower_bound(&self) -> f64;
    fn set_upper_bound(&mut self, value: f64);
    fn set_lower_bound(&mut self, value: f64);
}

/// Bounded rule that can saturate its output.
pub trait Clippable: Bounded {
    fn is_clipped(&self) -> bool;
    fn set_clipped(&mut self, clipped: bool);

    fn clip(&self, value: f64) -> f64 {
        clip(value, self.lower_bound(), self.upper_bound())
    }
}

/// Rule with an additive input bias.
pub trait Biased {
    fn bias(&self) -> f64;
    fn set_bias(&mut self, bias: f64);
}

/// Rule with optional additive noise.
pub trait Noisy {
    fn add_noise(&self) -> bool;
    fn set_add_noise(&mut self, add_noise: bool);
    fn noise(&self) -> &Randomizer;
    fn noise_mut(&mut self) -> &mut Randomizer;
}

/// Rule whose transfer function has an analytic derivative.
pub trait Differentiable {
    /// Derivative with respect to the pre-activation.
    fn derivative(&self, x: f64) -> f64;
}

/// Rule whose transfer function can be inverted.
pub trait Invertible {
    /// Pre-activation that produces output `y`.
    fn inverse(&self, y: f64) -> f64;
}

/// Implement `Bounded` over `upper_bound` / `lower_bound` fields.
macro_rules! impl_bounded {
    ($rule:ty) => {
        impl $crate::capabilities::Bounded for $rule {
            fn upper_bound(&self) -> f64 {
                self.upper_bound
            }
            fn lower_bound(&self) -> f64 {
                self.lower_bound
            }
            fn set_upper_bound(&mut self, value: f64) {
                self.upper_bound = value;
            }
            fn set_lower_bound(&mut self, value: f64) {
                self.lower_bound = value;
            }
        }
    };
}

/// Implement `Clippable` over a `clipping` field.
macro_rules! impl_clippable {
    ($rule:ty) => {
        impl $crate::capabilities::Clippable for $rule {
            fn is_clipped(&self) -> bool {
                self.clipping
            }
            fn set_clipped(&mut self, clipped: bool) {
                self.clipping = clipped;
            }
        }
    };
}

/// Implement `Biased` over a `bias` field.
macro_rules! impl_biased {
    ($rule:ty) => {
        impl $crate::capabilities::Biased for $rule {
            fn bias(&self) -> f64 {
                self.bias
            }
            fn set_bias(&mut self, bias: f64) {
                self.bias = bias;
            }
        }
    };
}

/// Implement `Noisy` over `add_noise` / `noise` fields.
macro_rules! impl_noisy {
    ($rule:ty) => {
        impl $crate::capabilities::Noisy for $rule {
            fn add_noise(&self) -> bool {
                self.add_noise
            }
            fn set_add_noise(&mut self, add_noise: bool) {
                self.add_noise = add_noise;
            }
            fn noise(&self) -> &$crate::random::Randomizer {
                &self.noise
            }
            fn noise_mut(&mut self) -> &mut $crate::random::Randomizer {
                &mut self.noise
            }
        }
    };
}

/// `as_*` accessor overrides for an `UpdateRule` impl block.
macro_rules! capability_accessors {
    ($($cap:ident),* $(,)?) => {
        $($crate::capabilities::capability_accessors!(@one $cap);)*
    };
    (@one bounded) => {
        fn as_bounded(&self) -> Option<&dyn $crate::capabilities::Bounded> {
            Some(self)
        }
        fn as_bounded_mut(&mut self) -> Option<&mut dyn $crate::capabilities::Bounded> {
            Some(self)
        }
    };
    (@one clippable) => {
        fn as_clippable(&self) -> Option<&dyn $crate::capabilities::Clippable> {
            Some(self)
        }
        fn as_clippable_mut(&mut self) -> Option<&mut dyn $crate::capabilities::Clippable> {
            Some(self)
        }
    };
    (@one biased) => {
        fn as_biased(&self) -> Option<&dyn $crate::capabilities::Biased> {
            Some(self)
        }
        fn as_biased_mut(&mut self) -> Option<&mut dyn $crate::capabilities::Biased> {
            Some(self)
        }
    };
    (@one noisy) => {
        fn as_noisy(&self) -> Option<&dyn $crate::capabilities::Noisy> {
            Some(self)
        }
        fn as_noisy_mut(&mut self) -> Option<&mut dyn $crate::capabilities::Noisy> {
            Some(self)
        }
    };
    (@one differentiable) => {
        fn as_differentiable(&self) -> Option<&dyn $crate::capabilities::Differentiable> {
            Some(self)
        }
    };
    (@one invertible) => {
        fn as_invertible(&self) -> Option<&dyn $crate::capabilities::Invertible> {
            Some(self)
        }
    };
}

pub(crate) use {capability_accessors, impl_biased, impl_bounded, impl_clippable, impl_noisy};

#[cfg(test)]
mod tests {
    use super::*;

    struct Range {
        upper_bound: f64,
        lower_bound: f64,
        clipping: bool,
    }
    impl_bounded!(Range);
    impl_clippable!(Range);

    #[test]
    fn test_clip_order_and_nan() {
        assert_eq!(clip(0.3, -1.0, 1.0), 0.3);
        assert_eq!(clip(f64::INFINITY, -1.0, 1.0), 1.0);
        assert_eq!(clip(f64::NEG_INFINITY, -1.0, 1.0), -1.0);
        assert!(clip(f64::NAN, 0.0, 1.0).is_nan());
    }

    #[test]
    fn test_clippable_uses_own_bounds() {
        let mut r = Range {
            upper_bound: 2.0,
            lower_bound: 0.5,
            clipping: true,
        };
        assert_eq!(r.clip(3.0), 2.0);
        assert_eq!(r.clip(0.0), 0.5);
        r.set_upper_bound(1.0);
        assert_eq!(r.clip(3.0), 1.0);
        r.set_clipped(false);
        assert!(!r.is_clipped());
    }
}
