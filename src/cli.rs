//! Command-line interface for boundtrace.
//!
//! This module handles CLI argument parsing and the `demo`, `classify` and
//! `config` subcommands.

use crate::demo::{self, staging};
use crate::traceback::render::{self, RenderOptions};
use crate::traceback::{Frame, TracebackFilter};
use anyhow::Result;
use boundtrace_config::{Config, FilteringMode};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// boundtrace - filter internal frames out of errors that cross an API boundary
#[derive(Parser, Debug)]
#[command(name = "boundtrace")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of ~/.config/boundtrace/config.yaml
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Debug log level (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", global = true, value_parser = parse_log_level)]
    pub log_level: Option<log::LevelFilter>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a failing staged computation and print the resulting error report
    Demo {
        /// Filtering mode override (off, auto, tracebackhide, remove_frames)
        #[arg(long, value_name = "MODE")]
        mode: Option<FilteringMode>,

        /// Input vector; all zeros makes the model fail
        #[arg(long, value_delimiter = ',', default_value = "0,0", allow_hyphen_values = true)]
        values: Vec<f64>,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Omit frames flagged hidden, as a frame-hiding shell would
        #[arg(long)]
        honor_hidden: bool,
    },

    /// Report whether frames from FILE survive filtering
    Classify {
        /// Source file of the frame
        file: PathBuf,

        /// Extra exclusion path (repeatable)
        #[arg(long = "exclude", value_name = "PATH")]
        exclude: Vec<PathBuf>,
    },

    /// Print the effective configuration and the resolved filtering mode
    Config,
}

/// Output format for error reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

fn parse_log_level(s: &str) -> Result<log::LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("invalid log level '{s}' (expected off, error, warn, info, debug or trace)"))
}

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Execute the parsed command. Returns the process exit code.
pub fn run(cli: &Cli, config: &Config) -> Result<i32> {
    match &cli.command {
        Commands::Demo {
            mode,
            values,
            format,
            honor_hidden,
        } => run_demo(config, *mode, values, *format, *honor_hidden),
        Commands::Classify { file, exclude } => {
            classify(config, file, exclude);
            Ok(0)
        }
        Commands::Config => {
            print_config(cli.config.as_deref(), config);
            Ok(0)
        }
    }
}

fn run_demo(
    config: &Config,
    mode: Option<FilteringMode>,
    values: &[f64],
    format: ReportFormat,
    honor_hidden: bool,
) -> Result<i32> {
    let filter = TracebackFilter::from_config(config);
    if mode.is_some() {
        filter.set_mode(mode);
    }
    staging::register(&filter);
    log::info!(
        "Running demo with {} values, strategy {:?}",
        values.len(),
        filter.filtering_mode()
    );

    match demo::run(&filter, values) {
        Ok(value) => {
            println!("result: {value}");
            Ok(0)
        }
        Err(error) => {
            match format {
                ReportFormat::Text => {
                    let options = RenderOptions {
                        honor_hidden,
                        ..Default::default()
                    };
                    print!("{}", render::format_exception(&error, &options));
                }
                ReportFormat::Json => println!("{}", render::to_json(&error)?),
            }
            Ok(1)
        }
    }
}

fn classify(config: &Config, file: &Path, exclude: &[PathBuf]) {
    let filter = TracebackFilter::from_config(config);
    for path in exclude {
        filter.register_exclusion(path.clone());
    }
    let frame = Frame::new(file, "<classify>", 0);
    let verdict = if filter.include_frame(&frame) {
        "included"
    } else {
        "excluded"
    };
    println!("{}: {verdict}", file.display());
}

fn print_config(path: Option<&Path>, config: &Config) {
    let filter = TracebackFilter::from_config(config);
    let path = path.map_or_else(Config::config_path, Path::to_path_buf);
    println!("config file: {}", path.display());
    println!(
        "traceback_filtering: {}",
        config
            .traceback_filtering
            .map_or_else(|| "(unset, auto)".to_string(), |m| m.to_string())
    );
    println!("resolved strategy: {:?}", filter.filtering_mode());
    println!("log_level: {:?}", config.log_level);
    println!("exclusions:");
    for path in filter.registry().paths() {
        println!("  - {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_demo_args() {
        let cli = Cli::parse_from([
            "boundtrace",
            "demo",
            "--mode",
            "remove_frames",
            "--values",
            "1,-2,3",
            "--format",
            "json",
        ]);
        match cli.command {
            Commands::Demo {
                mode,
                values,
                format,
                honor_hidden,
            } => {
                assert_eq!(mode, Some(FilteringMode::RemoveFrames));
                assert_eq!(values, vec![1.0, -2.0, 3.0]);
                assert_eq!(format, ReportFormat::Json);
                assert!(!honor_hidden);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_demo_defaults_to_zero_vector() {
        let cli = Cli::parse_from(["boundtrace", "demo"]);
        let Commands::Demo { values, mode, .. } = cli.command else {
            panic!("expected demo");
        };
        assert_eq!(values, vec![0.0, 0.0]);
        assert_eq!(mode, None);
    }

    #[test]
    fn test_bad_mode_rejected() {
        assert!(Cli::try_parse_from(["boundtrace", "demo", "--mode", "all"]).is_err());
    }

    #[test]
    fn test_global_log_level() {
        let cli = Cli::parse_from(["boundtrace", "config", "--log-level", "debug"]);
        assert_eq!(cli.log_level, Some(log::LevelFilter::Debug));
        assert!(Cli::try_parse_from(["boundtrace", "config", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_demo_failure_exit_code() {
        let config = Config::new().with_filtering(FilteringMode::RemoveFrames);
        let code = run_demo(&config, None, &[0.0], ReportFormat::Text, false).unwrap();
        assert_eq!(code, 1);
        let code = run_demo(&config, None, &[2.0], ReportFormat::Json, false).unwrap();
        assert_eq!(code, 0);
    }
}
