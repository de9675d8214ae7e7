//! Exclusion registry and frame classification.
//!
//! A frame is internal when its source file is equal to, or nested under,
//! any registered exclusion path. Classification never fails: whenever the
//! answer is uncertain the frame is kept.

use super::frame::Frame;
use parking_lot::RwLock;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Substring identifying the runtime's entry-point trampoline, which never
/// shows up in a printed trace.
pub const KNOWN_HIDDEN_FRAME_MARKER: &str = "library/std/src/rt.rs";

/// Ordered, append-only set of paths whose frames count as internal.
///
/// Cloning shares the underlying list. Registration is expected during
/// start-up; steady-state filtering only reads.
#[derive(Debug, Clone)]
pub struct ExclusionRegistry {
    paths: Arc<RwLock<Vec<PathBuf>>>,
}

impl ExclusionRegistry {
    /// A registry holding only the given paths, in order.
    pub fn with_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: Arc::new(RwLock::new(paths.into_iter().map(Into::into).collect())),
        }
    }

    /// Append `path`. The path is not required to exist.
    pub fn register(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        log::debug!("Registered traceback exclusion: {}", path.display());
        self.paths.write().push(path);
    }

    /// Copy of the registered paths.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.read().clone()
    }

    pub fn len(&self) -> usize {
        self.paths.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.read().is_empty()
    }

    /// False iff the frame's file lies under a registered path.
    pub fn include_frame(&self, frame: &Frame) -> bool {
        !self
            .paths
            .read()
            .iter()
            .any(|prefix| path_starts_with(&frame.file, prefix))
    }
}

/// Whether `path` is `path_prefix` or lies beneath it, by whole components.
///
/// Both sides are made absolute and lexically normalised first. Returns
/// false when the paths share no root (different drives) or when the
/// filesystem cannot confirm that the common prefix is `path_prefix`.
pub fn path_starts_with(path: &Path, path_prefix: &Path) -> bool {
    let (Some(path), Some(path_prefix)) = (absolute(path), absolute(path_prefix)) else {
        return false;
    };

    let Some(common) = common_path(&path, &path_prefix) else {
        return false;
    };

    common == path_prefix || same_file(&common, &path_prefix)
}

/// Heuristic match for runtime-internal frames that printed traces omit.
pub fn ignore_known_hidden_frame(frame: &Frame) -> bool {
    frame
        .file
        .to_string_lossy()
        .replace('\\', "/")
        .contains(KNOWN_HIDDEN_FRAME_MARKER)
}

fn absolute(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    Some(normalize(&absolute))
}

/// Resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` refuses to remove the root or prefix.
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Longest shared leading run of components; `None` without a shared root.
fn common_path(a: &Path, b: &Path) -> Option<PathBuf> {
    let shared: Vec<Component<'_>> = a
        .components()
        .zip(b.components())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x)
        .collect();

    if !shared
        .first()
        .is_some_and(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
    {
        return None;
    }
    Some(shared.iter().collect())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
