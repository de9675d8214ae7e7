//! Filtering-mode resolution and interactive-shell detection.

use boundtrace_config::FilteringMode;
use semver::Version;

/// Environment variable an embedding interactive shell sets to its version.
pub const SHELL_VERSION_ENV_VAR: &str = "BOUNDTRACE_SHELL_VERSION";

/// First shell version that honours hidden-frame flags.
pub const MIN_FRAME_HIDING_VERSION: Version = Version::new(7, 17, 0);

/// The concrete strategy applied to one error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilteringStrategy {
    Off,
    TracebackHide,
    RemoveFrames,
}

/// Answers whether we run inside an interactive shell that hides frames.
pub trait ShellProbe: Send + Sync {
    /// Is an interactive shell driving this process?
    fn running_under_interactive_shell(&self) -> bool;

    /// Does that shell honour hidden-frame flags? Only asked when
    /// [`ShellProbe::running_under_interactive_shell`] returned true.
    fn shell_supports_frame_hiding(&self) -> bool;
}

/// Probe driven by [`SHELL_VERSION_ENV_VAR`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvShellProbe;

impl EnvShellProbe {
    fn shell_version() -> Option<String> {
        std::env::var(SHELL_VERSION_ENV_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
    }
}

impl ShellProbe for EnvShellProbe {
    fn running_under_interactive_shell(&self) -> bool {
        Self::shell_version().is_some()
    }

    fn shell_supports_frame_hiding(&self) -> bool {
        Self::shell_version()
            .and_then(|raw| parse_shell_version(&raw))
            .is_some_and(|version| version >= MIN_FRAME_HIDING_VERSION)
    }
}

/// Probe with fixed answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedShellProbe {
    pub interactive: bool,
    pub supports_frame_hiding: bool,
}

impl FixedShellProbe {
    /// No interactive shell.
    pub fn batch() -> Self {
        Self::default()
    }

    /// An interactive shell that honours hidden frames.
    pub fn frame_hiding_shell() -> Self {
        Self {
            interactive: true,
            supports_frame_hiding: true,
        }
    }
}

impl ShellProbe for FixedShellProbe {
    fn running_under_interactive_shell(&self) -> bool {
        self.interactive
    }

    fn shell_supports_frame_hiding(&self) -> bool {
        self.supports_frame_hiding
    }
}

/// Accepts `major`, `major.minor` and full semver strings.
fn parse_shell_version(raw: &str) -> Option<Version> {
    let raw = raw.trim().trim_start_matches('v');
    if let Ok(version) = Version::parse(raw) {
        return Some(version);
    }
    let mut parts = raw.split('.').map(|p| p.parse::<u64>().ok());
    let major = parts.next()??;
    let minor = parts.next().unwrap_or(Some(0))?;
    Some(Version::new(major, minor, 0))
}

/// Resolve the configured mode into a strategy.
///
/// Unset and `auto` pick `tracebackhide` only inside an interactive shell
/// that honours hidden frames; everything else passes through unchanged.
pub fn resolve_filtering_mode(
    configured: Option<FilteringMode>,
    probe: &dyn ShellProbe,
) -> FilteringStrategy {
    match configured.unwrap_or(FilteringMode::Auto) {
        FilteringMode::Off => FilteringStrategy::Off,
        FilteringMode::TracebackHide => FilteringStrategy::TracebackHide,
        FilteringMode::RemoveFrames => FilteringStrategy::RemoveFrames,
        FilteringMode::Auto => {
            if probe.running_under_interactive_shell() && probe.shell_supports_frame_hiding() {
                FilteringStrategy::TracebackHide
            } else {
                FilteringStrategy::RemoveFrames
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_explicit_modes_pass_through() {
        let shell = FixedShellProbe::frame_hiding_shell();
        assert_eq!(
            resolve_filtering_mode(Some(FilteringMode::Off), &shell),
            FilteringStrategy::Off
        );
        assert_eq!(
            resolve_filtering_mode(Some(FilteringMode::RemoveFrames), &shell),
            FilteringStrategy::RemoveFrames
        );
        assert_eq!(
            resolve_filtering_mode(Some(FilteringMode::TracebackHide), &FixedShellProbe::batch()),
            FilteringStrategy::TracebackHide
        );
    }

    #[test]
    fn test_auto_and_unset_detect_shell() {
        let shell = FixedShellProbe::frame_hiding_shell();
        let batch = FixedShellProbe::batch();
        for configured in [None, Some(FilteringMode::Auto)] {
            assert_eq!(
                resolve_filtering_mode(configured, &shell),
                FilteringStrategy::TracebackHide
            );
            assert_eq!(
                resolve_filtering_mode(configured, &batch),
                FilteringStrategy::RemoveFrames
            );
        }
    }

    #[test]
    fn test_old_shell_gets_remove_frames() {
        let old = FixedShellProbe {
            interactive: true,
            supports_frame_hiding: false,
        };
        assert_eq!(resolve_filtering_mode(None, &old), FilteringStrategy::RemoveFrames);
    }

    struct RecordingProbe(AtomicBool);

    impl ShellProbe for RecordingProbe {
        fn running_under_interactive_shell(&self) -> bool {
            false
        }

        fn shell_supports_frame_hiding(&self) -> bool {
            self.0.store(true, Ordering::SeqCst);
            true
        }
    }

    #[test]
    fn test_support_query_skipped_outside_shell() {
        let probe = RecordingProbe(AtomicBool::new(false));
        assert_eq!(resolve_filtering_mode(None, &probe), FilteringStrategy::RemoveFrames);
        assert!(!probe.0.load(Ordering::SeqCst));
    }

    #[test]
    fn test_parse_shell_version() {
        assert_eq!(parse_shell_version("8.12.3"), Some(Version::new(8, 12, 3)));
        assert_eq!(parse_shell_version("7.17"), Some(Version::new(7, 17, 0)));
        assert_eq!(parse_shell_version("v9"), Some(Version::new(9, 0, 0)));
        assert_eq!(parse_shell_version("dev"), None);
        assert!(parse_shell_version("7.16").unwrap() < MIN_FRAME_HIDING_VERSION);
    }
}
