// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging settings types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Errors raised while interpreting logging settings
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("Unknown log format '{0}' (expected 'text' or 'json')")]
    UnknownFormat(String),

    #[error("Unknown log level '{0}'")]
    UnknownLevel(String),
}

/// Log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ObservabilityError::UnknownFormat(s.to_string())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text or json)
    pub format: LogFormat,

    /// Emit file and line for each event
    pub with_source_location: bool,
}

impl LogSettings {
    /// Build settings from the string form used in config files.
    pub fn from_parts(level: &str, format: &str) -> Result<Self, ObservabilityError> {
        let level = level.to_ascii_lowercase();
        tracing::Level::from_str(&level).map_err(|_| ObservabilityError::UnknownLevel(level.clone()))?;
        Ok(LogSettings {
            level,
            format: format.parse()?,
            ..LogSettings::default()
        })
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            level: "info".to_string(),
            format: LogFormat::Text,
            with_source_location: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_from_parts() {
        let settings = LogSettings::from_parts("DEBUG", "json").unwrap();
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.format, LogFormat::Json);
        assert!(matches!(
            LogSettings::from_parts("loud", "text"),
            Err(ObservabilityError::UnknownLevel(_))
        ));
    }
}
