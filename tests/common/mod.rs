//! Shared integration test helpers for boundtrace.
//!
//! Integration tests bring these in with `mod common;`. The
//! `#![allow(dead_code)]` attribute suppresses warnings when a test file only
//! uses a subset of the helpers.

#![allow(dead_code)]

use boundtrace::traceback::{
    FixedShellProbe, Frame, FrameGuard, TracebackFilter, TracedError, push_frame,
};
use boundtrace_config::FilteringMode;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory the simulated library lives under.
pub const LIB_DIR: &str = "/opt/fakelib/internal";

/// Directory the simulated user code lives under.
pub const USER_DIR: &str = "/home/user/project";

#[derive(Debug, thiserror::Error)]
#[error("division by zero in {0}")]
pub struct DivisionError(pub String);

/// A filter with `mode`, a non-interactive probe and `LIB_DIR` excluded.
pub fn lib_filter(mode: FilteringMode) -> TracebackFilter {
    let filter = TracebackFilter::new()
        .with_probe(FixedShellProbe::batch())
        .with_mode(Some(mode));
    filter.register_exclusion(LIB_DIR);
    filter
}

/// Push a frame for library function `name`.
pub fn lib_frame(name: &str) -> FrameGuard {
    push_frame(Frame::new(format!("{LIB_DIR}/{name}.rs"), name, 40))
}

/// Push a frame for user function `name`.
pub fn user_frame(name: &str) -> FrameGuard {
    push_frame(Frame::new(format!("{USER_DIR}/{name}.rs"), name, 7))
}

/// Push the user's top-level frame.
pub fn user_module() -> FrameGuard {
    push_frame(Frame::module(format!("{USER_DIR}/main.rs"), "<module>", 1))
}

/// Raise a `DivisionError` from inside a user callback.
pub fn failing_callback(name: &str) -> TracedError {
    let _frame = user_frame(name);
    TracedError::new(DivisionError(name.to_string()))
}

/// Function names of `frames`, outermost first.
pub fn names(frames: &[Frame]) -> Vec<String> {
    frames.iter().map(|f| f.function.clone()).collect()
}

/// Creates a temporary directory tree holding a fake installed library and
/// a user project next to it:
///
/// ```text
/// <tmp>/
///   site/lib/core.rs
///   site/library_ext.rs
///   project/main.rs
/// ```
pub fn installed_tree() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let lib = temp_dir.path().join("site").join("lib");
    fs::create_dir_all(&lib).expect("Failed to create lib dir");
    fs::create_dir_all(temp_dir.path().join("project")).expect("Failed to create project dir");
    for file in [
        lib.join("core.rs"),
        temp_dir.path().join("site").join("library_ext.rs"),
        temp_dir.path().join("project").join("main.rs"),
    ] {
        fs::write(&file, "// stub\n").expect("Failed to write stub");
    }
    (temp_dir, lib)
}

/// Join `rel` onto `root`.
pub fn under(root: &Path, rel: &str) -> PathBuf {
    root.join(rel)
}
