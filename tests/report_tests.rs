//! Rendering of filtered errors, text and JSON.

mod common;

use boundtrace::traceback::render::to_json;
use boundtrace::traceback::{RenderOptions, TracedError, format_exception};
use boundtrace_config::FilteringMode;
use common::*;

fn filtered_error() -> TracedError {
    let filter = lib_filter(FilteringMode::RemoveFrames);
    let _main = user_module();
    filter
        .reraise_with_filtered_traceback(|| -> Result<(), TracedError> {
            let _lower = lib_frame("lower");
            Err(failing_callback("loss_fn"))
        })
        .unwrap_err()
}

#[test]
fn test_text_report_prints_full_trace_first() {
    let text = format_exception(&filtered_error(), &RenderOptions::default());

    let cause_at = text
        .find("The above exception was the direct cause of the following exception:")
        .expect("cause separator");
    let (unfiltered, filtered) = text.split_at(cause_at);

    assert!(unfiltered.contains("in lower"));
    assert!(unfiltered.contains("UnfilteredStackTrace: DivisionError: division by zero in loss_fn"));
    assert!(unfiltered.contains("The preceding is the original exception that occurred, unmodified."));

    assert!(!filtered.contains("in lower"));
    assert!(filtered.contains("in loss_fn"));
    assert!(filtered.trim_end().ends_with("DivisionError: division by zero in loss_fn"));
}

#[test]
fn test_chain_can_be_disabled() {
    let text = format_exception(
        &filtered_error(),
        &RenderOptions {
            chain: false,
            ..Default::default()
        },
    );
    assert!(!text.contains("UnfilteredStackTrace"));
    assert_eq!(text.matches("Traceback (most recent call last):").count(), 1);
}

#[test]
fn test_json_report() {
    let json = to_json(&filtered_error()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["type"], "DivisionError");
    assert_eq!(value["message"], "division by zero in loss_fn");
    assert_eq!(value["suppress_context"], true);
    assert_eq!(value["traceback"].as_array().unwrap().len(), 2);
    assert_eq!(value["traceback"][1]["function"], "loss_fn");
    assert_eq!(value["cause"]["type"], "UnfilteredStackTrace");
    assert!(value["cause"].get("raised_at").is_none());
    assert!(value["raised_at"].as_str().unwrap().contains("tests/common/mod.rs"));
    assert!(value.get("context").is_none());
}
