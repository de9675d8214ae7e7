//! Frame records and traceback chains.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Scope a frame executes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    /// Top-level code: a program entry point or a shell evaluation unit.
    Module,
    /// An ordinary function activation.
    Function,
}

/// One activation record in a call stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Frame {
    /// Source file the frame executes in, as recorded at the call site.
    pub file: PathBuf,
    /// Function (or module) name.
    pub function: String,
    /// Current line within `file`.
    pub line: u32,
    /// Module-level or function-level scope.
    pub kind: FrameKind,
    /// Display hint: presentation layers that honour frame hiding skip this frame.
    pub hidden: bool,
}

impl Frame {
    /// A function-level frame.
    pub fn new(file: impl Into<PathBuf>, function: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            line,
            kind: FrameKind::Function,
            hidden: false,
        }
    }

    /// A module-level frame.
    pub fn module(file: impl Into<PathBuf>, name: impl Into<String>, line: u32) -> Self {
        Self {
            kind: FrameKind::Module,
            ..Self::new(file, name, line)
        }
    }

    /// Same frame flagged hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn is_module_level(&self) -> bool {
        self.kind == FrameKind::Module
    }

    /// Whether this frame shares code identity (file + function) with another.
    pub fn same_code(&self, file: &Path, function: &str) -> bool {
        self.file == file && self.function == function
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File \"{}\", line {}, in {}",
            self.file.display(),
            self.line,
            self.function
        )
    }
}

/// An ordered frame chain, outermost frame first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Traceback {
    frames: Vec<Frame>,
}

impl Traceback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub(crate) fn frames_mut(&mut self) -> &mut [Frame] {
        &mut self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The raise-site frame.
    pub fn innermost(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Frames not flagged hidden, outermost first.
    pub fn visible(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().filter(|f| !f.hidden)
    }

    /// Split into (frames above `at`, frames from `at` inward).
    ///
    /// `at` is clamped to the chain length.
    pub(crate) fn split_at(&self, at: usize) -> (&[Frame], &[Frame]) {
        self.frames.split_at(at.min(self.frames.len()))
    }
}

impl From<Vec<Frame>> for Traceback {
    fn from(frames: Vec<Frame>) -> Self {
        Self { frames }
    }
}

impl FromIterator<Frame> for Traceback {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Traceback {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
