// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LogSettings};

/// Build the `EnvFilter` directive string for these settings.
///
/// `RUST_LOG`, when set, replaces the computed filter entirely.
pub fn filter_directives(settings: &LogSettings, debug_flags: &CrateDebugFlags) -> String {
    match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => directives,
        _ => debug_flags.to_filter_string(&settings.level),
    }
}

/// Initialize the global tracing subscriber
///
/// Text output goes to stderr without targets; JSON output carries targets
/// so events can be attributed to a crate after the fact.
///
/// # Errors
///
/// Fails if the filter directives are malformed or a global subscriber is
/// already installed.
pub fn init_logging(settings: &LogSettings, debug_flags: &CrateDebugFlags) -> Result<()> {
    let directives = filter_directives(settings, debug_flags);
    let env_filter =
        EnvFilter::try_new(&directives).with_context(|| format!("Invalid log filter: {}", directives))?;

    let layer = match settings.format {
        LogFormat::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(settings.with_source_location)
            .with_line_number(settings.with_source_location)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(settings.with_source_location)
            .with_line_number(settings.with_source_location)
            .boxed(),
    };

    Registry::default()
        .with(layer.with_filter(env_filter))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(filter = %directives, "logging initialised");
    Ok(())
}

/// Initialize logging with default settings
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<()> {
    init_logging(&LogSettings::default(), debug_flags)
}
