//! Traceback filtering at API boundaries.
//!
//! Errors raised beneath an [`ApiBoundary`] carry a traceback recorded from
//! the per-thread shadow call stack. When such an error leaves the boundary,
//! frames belonging to registered internal paths are hidden or removed, and
//! in `remove_frames` mode the full trace is kept as the error's cause.
//!
//! Sub-modules:
//! - [`frame`]      — `Frame`, `FrameKind`, `Traceback`
//! - [`call_stack`] — per-thread shadow stack and `FrameGuard`
//! - [`error`]      — `TracedError` and the `UnfilteredStackTrace` marker
//! - [`exclusion`]  — `ExclusionRegistry` and path containment
//! - [`filter`]     — traceback rebuild / extend / hide primitives
//! - [`mode`]       — filtering-mode resolution and shell probes
//! - [`boundary`]   — `TracebackFilter`, `ApiBoundary`, `api_boundary`
//! - [`render`]     — text and JSON presentation

pub mod boundary;
pub mod call_stack;
pub mod error;
pub mod exclusion;
pub mod filter;
pub mod frame;
pub mod mode;
pub mod render;

// Re-export the public API.
pub use boundary::{
    ApiBoundary, ReplaceTracebackHook, TracebackFilter, UNFILTERED_MESSAGE_APPEND, api_boundary,
    register_exclusion,
};
pub use call_stack::{FrameGuard, enter, enter_module, push_frame};
pub use error::{TracedError, UnfilteredStackTrace};
pub use exclusion::{ExclusionRegistry, ignore_known_hidden_frame, path_starts_with};
pub use frame::{Frame, FrameKind, Traceback};
pub use mode::{EnvShellProbe, FilteringStrategy, FixedShellProbe, ShellProbe};
pub use render::{RenderOptions, format_exception};
