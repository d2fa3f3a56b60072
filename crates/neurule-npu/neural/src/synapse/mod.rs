// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Synaptic computation module
//!
//! Post-synaptic responses and the per-tick input totals derived from them.

pub mod contribution;

pub use contribution::*;
