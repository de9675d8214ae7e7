//! Configuration system for boundtrace.
//!
//! This crate provides configuration loading, saving, and default values
//! for traceback filtering. It includes:
//!
//! - The filtering-mode setting (`off`, `auto`, `tracebackhide`, `remove_frames`)
//! - Extra exclusion paths, with `${VAR}` substitution
//! - Log level for the debug log file
//! - Environment overrides applied on top of the config file

pub mod config;
pub mod error;
mod types;

pub use config::{
    Config, FILTERING_ENV_VAR, is_env_var_allowed, substitute_variables,
    substitute_variables_with_allowlist,
};
pub use error::ConfigError;
pub use types::{FilteringMode, LogLevel};
