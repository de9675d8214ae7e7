//! Enumerated configuration values.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How exception tracebacks are reshaped when an error crosses an API boundary.
///
/// An unset value (`None` in [`crate::Config::traceback_filtering`]) behaves
/// exactly like [`FilteringMode::Auto`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FilteringMode {
    /// Leave errors completely untouched.
    #[serde(rename = "off")]
    Off,
    /// Pick `tracebackhide` inside a frame-hiding shell, `remove_frames` otherwise.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    /// Flag internal frames as hidden in place; no chain is rebuilt.
    #[serde(rename = "tracebackhide")]
    TracebackHide,
    /// Rebuild a reduced traceback and chain the full one as the cause.
    #[serde(rename = "remove_frames")]
    RemoveFrames,
}

impl FilteringMode {
    /// The config/env spelling of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilteringMode::Off => "off",
            FilteringMode::Auto => "auto",
            FilteringMode::TracebackHide => "tracebackhide",
            FilteringMode::RemoveFrames => "remove_frames",
        }
    }

    /// All recognised modes, in documentation order.
    pub fn all() -> &'static [FilteringMode] {
        &[
            FilteringMode::Off,
            FilteringMode::Auto,
            FilteringMode::TracebackHide,
            FilteringMode::RemoveFrames,
        ]
    }
}

impl fmt::Display for FilteringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilteringMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FilteringMode::all()
            .iter()
            .copied()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ConfigError::InvalidMode(trimmed.to_string()))
    }
}

/// Log level for debug logging to file.
///
/// Controls the verbosity of log output written to the debug log file.
/// The `RUST_LOG` environment variable and `--log-level` CLI flag take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    #[default]
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
