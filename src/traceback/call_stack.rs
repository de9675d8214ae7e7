//! Per-thread shadow call stack.
//!
//! Instrumented functions push a [`Frame`] on entry and pop it when the
//! returned [`FrameGuard`] drops. Errors snapshot this stack when they are
//! created, and boundaries read it to find their callers.

use super::frame::Frame;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::panic::Location;

thread_local! {
    static CALL_STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Source path of this module, seeded into every exclusion registry.
pub(crate) const CALL_STACK_SOURCE: &str = file!();

/// Pops its frame (and anything pushed after it) when dropped.
#[must_use = "the frame is popped as soon as the guard is dropped"]
#[derive(Debug)]
pub struct FrameGuard {
    depth: usize,
    // Frames belong to the thread that pushed them.
    _not_send: PhantomData<*const ()>,
}

impl FrameGuard {
    /// Index of the guarded frame in the stack.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        let _ = CALL_STACK.try_with(|stack| stack.borrow_mut().truncate(self.depth));
    }
}

/// Push an explicit frame record.
pub fn push_frame(frame: Frame) -> FrameGuard {
    let depth = CALL_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(frame);
        stack.len() - 1
    });
    FrameGuard {
        depth,
        _not_send: PhantomData,
    }
}

/// Enter a function-level frame at the caller's location.
#[track_caller]
pub fn enter(function: impl Into<String>) -> FrameGuard {
    let location = Location::caller();
    push_frame(Frame::new(location.file(), function, location.line()))
}

/// Enter a module-level frame at the caller's location.
#[track_caller]
pub fn enter_module(name: impl Into<String>) -> FrameGuard {
    let location = Location::caller();
    push_frame(Frame::module(location.file(), name, location.line()))
}

/// Copy of the active stack, outermost frame first.
pub fn snapshot() -> Vec<Frame> {
    CALL_STACK.with(|stack| stack.borrow().clone())
}

/// Number of active frames.
pub fn depth() -> usize {
    CALL_STACK.with(|stack| stack.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_pops_on_drop() {
        let base = depth();
        {
            let outer = enter("outer");
            assert_eq!(outer.depth(), base);
            let _inner = enter("inner");
            assert_eq!(depth(), base + 2);
        }
        assert_eq!(depth(), base);
    }

    #[test]
    fn test_enter_records_caller_location() {
        let _guard = enter("here");
        let frame = snapshot().pop().unwrap();
        assert_eq!(frame.file, std::path::PathBuf::from(file!()));
        assert_eq!(frame.function, "here");
        assert!(!frame.is_module_level());
    }

    #[test]
    fn test_out_of_order_drop_truncates() {
        let base = depth();
        let outer = enter("outer");
        let inner = enter("inner");
        drop(outer);
        assert_eq!(depth(), base);
        drop(inner);
        assert_eq!(depth(), base);
    }

    #[test]
    fn test_stacks_are_per_thread() {
        let _guard = enter_module("<module>");
        let other = std::thread::spawn(depth).join().unwrap();
        assert_eq!(other, 0);
    }
}
