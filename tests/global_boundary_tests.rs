//! The process-wide filter behind `api_boundary` and `register_exclusion`.
//!
//! Everything touching the global filter lives in one test so parallel test
//! threads never race on its mode.

mod common;

use boundtrace::traceback::{FilteringStrategy, Frame, TracebackFilter, TracedError, push_frame};
use boundtrace::{api_boundary, register_exclusion};
use boundtrace_config::FilteringMode;
use common::*;

const GLOBAL_LIB: &str = "/opt/globallib";

fn global_lib_frame(name: &str) -> boundtrace::traceback::FrameGuard {
    push_frame(Frame::new(format!("{GLOBAL_LIB}/{name}.rs"), name, 3))
}

#[test]
fn test_global_boundary() {
    let global = TracebackFilter::global();
    global.set_mode(Some(FilteringMode::RemoveFrames));
    assert_eq!(global.filtering_mode(), FilteringStrategy::RemoveFrames);

    register_exclusion(GLOBAL_LIB);
    assert!(!global.include_frame(&Frame::new(format!("{GLOBAL_LIB}/x.rs"), "x", 1)));

    let vmap = api_boundary("vmap", |xs: Vec<u32>| -> Result<u32, TracedError> {
        let _batch = global_lib_frame("batch_trace");
        if xs.is_empty() {
            return Err(failing_callback("per_example"));
        }
        Ok(xs.iter().sum())
    })
    .with_doc("Vectorizing map.");
    assert_eq!(vmap.name(), "vmap");
    assert_eq!(vmap.doc(), Some("Vectorizing map."));

    let _main = user_module();
    assert_eq!(vmap.call(vec![1, 2, 3]).unwrap(), 6);

    let err = vmap.call(Vec::new()).unwrap_err();
    assert_eq!(names(err.traceback().frames()), vec!["<module>", "per_example"]);
    assert!(err.cause().unwrap().is_unfiltered_stack_trace());

    global.set_mode(Some(FilteringMode::Off));
    let err = vmap.call(Vec::new()).unwrap_err();
    assert!(!err.is_filtered());
    assert_eq!(err.traceback().len(), 4);
}
