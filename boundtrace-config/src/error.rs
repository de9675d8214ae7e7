//! Typed error variants for the boundtrace-config crate.
//!
//! Load and save still return `anyhow::Result`; these values travel inside
//! the `anyhow::Error` and can be recovered with `downcast_ref`.
//!
//! # Example
//!
//! ```rust,no_run
//! use boundtrace_config::ConfigError;
//!
//! fn check_load_err(e: &anyhow::Error) {
//!     if let Some(cfg_err) = e.downcast_ref::<ConfigError>() {
//!         match cfg_err {
//!             ConfigError::Io(io) => eprintln!("I/O error: {io}"),
//!             ConfigError::Parse(p) => eprintln!("YAML parse error: {p}"),
//!             ConfigError::InvalidMode(m) => eprintln!("Bad mode: {m}"),
//!             ConfigError::Validation(msg) => eprintln!("Validation: {msg}"),
//!         }
//!     }
//! }
//! ```

/// Errors that can occur when loading, parsing or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained invalid YAML that could not be parsed.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A filtering mode string was not one of the recognised options.
    #[error(
        "unknown traceback filtering mode '{0}' \
         (expected one of: off, auto, tracebackhide, remove_frames)"
    )]
    InvalidMode(String),

    /// A field value failed semantic validation.
    #[error("Config validation error: {0}")]
    Validation(String),
}
