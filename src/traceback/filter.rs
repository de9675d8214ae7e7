//! Traceback reshaping primitives used by the boundary.

use super::boundary::{BOUNDARY_SOURCE, RERAISER_FUNCTION};
use super::exclusion::{ExclusionRegistry, ignore_known_hidden_frame};
use super::frame::Frame;
use std::collections::VecDeque;
use std::path::Path;

/// Frames the registry includes, relative order preserved.
///
/// Excluded frames are removed outright, so the chain gets shorter. An
/// all-internal chain yields an empty traceback.
pub fn filter_traceback(frames: &[Frame], registry: &ExclusionRegistry) -> Vec<Frame> {
    frames
        .iter()
        .filter(|frame| registry.include_frame(frame))
        .cloned()
        .collect()
}

/// Flag every excluded frame as hidden, in place.
pub fn add_tracebackhide_to_hidden_frames(frames: &mut [Frame], registry: &ExclusionRegistry) {
    for frame in frames.iter_mut() {
        if !registry.include_frame(frame) {
            frame.hidden = true;
        }
    }
}

/// Extend `traceback` outward with the included frames of the live stack.
///
/// `live_stack` is outermost first and ends with the frame the traceback
/// starts in. The walk goes from that frame toward the entry point and stops
/// at the first function-level frame seen after a run of module-level
/// frames, so it does not climb past the top-level code that made the call.
/// If that top-level code was itself imported from inside a function, the
/// result is cut short at that function.
pub fn add_call_stack_frames(
    traceback: &[Frame],
    live_stack: &[Frame],
    registry: &ExclusionRegistry,
) -> Vec<Frame> {
    let mut out: VecDeque<Frame> = traceback.iter().cloned().collect();

    let mut reached_module_level = false;
    for frame in live_stack.iter().rev() {
        if ignore_known_hidden_frame(frame) {
            continue;
        }
        if reached_module_level && !frame.is_module_level() {
            break;
        }
        if registry.include_frame(frame) {
            out.push_front(frame.clone());
        }
        if frame.is_module_level() {
            reached_module_level = true;
        }
    }
    out.into()
}

/// Whether `frame` is a boundary's own re-raising frame.
pub fn is_reraiser_frame(frame: &Frame) -> bool {
    frame.same_code(Path::new(BOUNDARY_SOURCE), RERAISER_FUNCTION)
}

/// Whether a boundary sits anywhere on `live_stack` other than its last frame.
///
/// The last frame is the boundary doing the asking.
pub fn is_under_reraiser(live_stack: &[Frame]) -> bool {
    live_stack
        .split_last()
        .is_some_and(|(_, callers)| callers.iter().any(is_reraiser_frame))
}

/// Whether `traceback` was recorded beneath the boundary ending `boundary_stack`.
///
/// True when the traceback starts with exactly the boundary's callers followed
/// by its own frame. Tracebacks captured on another thread, or stored and
/// returned from a later call, fail this check.
pub fn recorded_under(traceback: &[Frame], boundary_stack: &[Frame]) -> bool {
    boundary_stack.last().is_some_and(is_reraiser_frame)
        && traceback.get(..boundary_stack.len()) == Some(boundary_stack)
}
