// Library exports for the boundtrace binary, its tests and embedding crates.
//
// The traceback machinery lives in `traceback`; `demo` and `cli` only drive
// it from the command line.

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod array;
pub mod cli;
pub mod debug;
pub mod demo;
pub mod traceback;

pub use array::Array;
pub use traceback::{
    ApiBoundary, Frame, FrameKind, TracebackFilter, TracedError, api_boundary, enter,
    enter_module, register_exclusion,
};
