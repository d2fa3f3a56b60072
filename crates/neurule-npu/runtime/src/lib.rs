// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! # Neurule Population Runtime
//!
//! Drives many neurons through the buffered tick: aggregate inputs from the
//! previous tick, update every neuron (in parallel with Rayon when the
//! population is large), then commit all buffers at once.
//!
//! ```rust
//! use neurule_npu_neural::NeuronRule;
//! use neurule_npu_runtime::Population;
//!
//! let mut pop = Population::builder(3)
//!     .rule(NeuronRule::from_tag("binary").unwrap())
//!     .connect(0, 1, 1.0)
//!     .build()
//!     .unwrap();
//! pop.set_external_input(0, 1.0).unwrap();
//! pop.step();
//! pop.step();
//! assert_eq!(pop.activations(), vec![1.0, 1.0, -1.0]);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod parameter_update_queue;
pub mod population;
pub mod propagation;

pub use error::{Result, RuntimeError};
pub use parameter_update_queue::{ParameterUpdate, ParameterUpdateQueue, UpdateTarget};
pub use population::{Population, PopulationBuilder, TickReport, DEFAULT_PARALLEL_THRESHOLD};
pub use propagation::{aggregate_inputs, Connection};
