// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neurule-observability
//!
//! Logging setup shared by the neurule binaries and tests.
//!
//! Provides one subscriber initialisation path (text or JSON output) with
//! per-crate debug flag support, so a single noisy crate can be turned up
//! without drowning the rest.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known neurule crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "neurule",
    "neurule-npu-neural",
    "neurule-npu-runtime",
    "neurule-config",
    "neurule-observability",
];
