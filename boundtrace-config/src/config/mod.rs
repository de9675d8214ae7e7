//! The `Config` struct and its environment handling.
//!
//! Sub-modules:
//! - [`env_vars`]    — `${VAR}` substitution with an allowlist
//! - [`persistence`] — YAML load/save and path helpers

mod env_vars;
mod persistence;

pub use env_vars::{is_env_var_allowed, substitute_variables, substitute_variables_with_allowlist};

use crate::error::ConfigError;
use crate::types::{FilteringMode, LogLevel};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the configured filtering mode.
pub const FILTERING_ENV_VAR: &str = "BOUNDTRACE_TRACEBACK_FILTERING";

/// Traceback filtering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Filtering mode; `None` resolves the same way as `auto`.
    pub traceback_filtering: Option<FilteringMode>,

    /// Additional paths whose frames are treated as internal.
    ///
    /// Entries may reference environment variables with `${VAR}` or
    /// `${VAR:-default}`.
    pub exclude_paths: Vec<String>,

    /// Verbosity of the debug log file.
    pub log_level: LogLevel,

    /// Resolve every environment variable in `exclude_paths`, not only
    /// allowlisted ones.
    pub allow_all_env_vars: bool,
}

impl Config {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filtering mode.
    pub fn with_filtering(mut self, mode: FilteringMode) -> Self {
        self.traceback_filtering = Some(mode);
        self
    }

    /// Append an exclusion path entry.
    pub fn with_exclude_path(mut self, path: impl Into<String>) -> Self {
        self.exclude_paths.push(path.into());
        self
    }

    /// Exclusion paths with environment variables substituted.
    pub fn resolved_exclude_paths(&self) -> Vec<PathBuf> {
        self.exclude_paths
            .iter()
            .map(|raw| substitute_variables_with_allowlist(raw, self.allow_all_env_vars))
            .filter(|resolved| !resolved.trim().is_empty())
            .map(PathBuf::from)
            .collect()
    }

    /// Apply `BOUNDTRACE_TRACEBACK_FILTERING` on top of the file value.
    ///
    /// An unparseable value is logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        match Self::filtering_from_env() {
            Ok(Some(mode)) => {
                log::info!("{FILTERING_ENV_VAR} overrides traceback filtering: {mode}");
                self.traceback_filtering = Some(mode);
            }
            Ok(None) => {}
            Err(e) => log::warn!("Ignoring {FILTERING_ENV_VAR}: {e}"),
        }
    }

    /// Read the filtering mode from the environment, if set and non-empty.
    pub fn filtering_from_env() -> Result<Option<FilteringMode>, ConfigError> {
        match std::env::var(FILTERING_ENV_VAR) {
            Ok(val) if !val.trim().is_empty() => val.parse().map(Some),
            _ => Ok(None),
        }
    }
}
