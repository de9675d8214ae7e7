//! Debug logging backend for the `boundtrace` binary.
//!
//! Routes every `log::info!()` etc. to a debug log file so report output on
//! stdout stays clean. The file is `/tmp/boundtrace_debug.log` on Unix/macOS
//! and `%TEMP%\boundtrace_debug.log` on Windows.
//!
//! Level precedence: explicit level (CLI flag) > `RUST_LOG` > config value.
//! When `RUST_LOG` is set, records are mirrored to stderr as well.
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Log file sink plus optional stderr mirror.
struct DebugLogger {
    level: log::LevelFilter,
    file: Mutex<Option<std::fs::File>>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn new(level: log::LevelFilter, mirror_stderr: bool) -> Self {
        let file = if level != log::LevelFilter::Off {
            match OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(log_path())
            {
                Ok(mut f) => {
                    let _ = writeln!(
                        f,
                        "{}\nboundtrace debug session started at {} (level={})\n{}",
                        "=".repeat(80),
                        get_timestamp(),
                        level,
                        "=".repeat(80)
                    );
                    Some(f)
                }
                // Logging must never break the tool itself.
                Err(_) => None,
            }
        } else {
            None
        };

        Self {
            level,
            file: Mutex::new(file),
            mirror_stderr,
        }
    }
}

impl log::Log for DebugLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();

/// Location of the debug log file.
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    {
        PathBuf::from("/tmp/boundtrace_debug.log")
    }
    #[cfg(not(unix))]
    {
        std::env::temp_dir().join("boundtrace_debug.log")
    }
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Parse a `RUST_LOG`-style level name. Module directives are not supported;
/// the first bare level wins.
fn level_from_rust_log(value: &str) -> Option<log::LevelFilter> {
    value
        .split(',')
        .filter(|part| !part.contains('='))
        .find_map(|part| part.trim().parse().ok())
}

/// Resolve the effective level from CLI, `RUST_LOG` and config, in that order.
pub fn resolve_level(
    cli_level: Option<log::LevelFilter>,
    rust_log: Option<&str>,
    config_level: log::LevelFilter,
) -> log::LevelFilter {
    cli_level
        .or_else(|| rust_log.and_then(level_from_rust_log))
        .unwrap_or(config_level)
}

/// Install the file logger. Later calls are ignored.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>, config_level: log::LevelFilter) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let level = resolve_level(cli_level, rust_log.as_deref(), config_level);
    let logger = LOGGER.get_or_init(|| DebugLogger::new(level, rust_log.is_some()));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[test]
    fn test_cli_level_wins() {
        assert_eq!(
            resolve_level(Some(LevelFilter::Trace), Some("warn"), LevelFilter::Error),
            LevelFilter::Trace
        );
    }

    #[test]
    fn test_rust_log_beats_config() {
        assert_eq!(
            resolve_level(None, Some("boundtrace=trace,debug"), LevelFilter::Off),
            LevelFilter::Debug
        );
        assert_eq!(
            resolve_level(None, Some("nonsense"), LevelFilter::Info),
            LevelFilter::Info
        );
    }

    #[test]
    fn test_config_fallback() {
        assert_eq!(resolve_level(None, None, LevelFilter::Warn), LevelFilter::Warn);
    }
}
