//! Demonstration program for the `demo` subcommand.
//!
//! A small "model" function is compiled through the simulated staging
//! pipeline in [`staging`]. Feeding it an all-zero vector makes the model
//! fail while the pipeline is tracing it, which shows how the boundary
//! reshapes the resulting error.

pub mod staging;

use crate::traceback::{TracebackFilter, TracedError, enter, enter_module};

/// Errors raised by the demo model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("cannot normalize a vector with zero norm")]
    ZeroNorm,
    #[error("expected at least one value")]
    Empty,
}

/// Run the demo program on `values`.
///
/// Call [`staging::register`] on `filter` first, or the pipeline's frames
/// count as user code.
pub fn run(filter: &TracebackFilter, values: &[f64]) -> Result<f64, TracedError> {
    let _module = enter_module("<module>");
    train_step(filter, values)
}

fn train_step(filter: &TracebackFilter, values: &[f64]) -> Result<f64, TracedError> {
    let _frame = enter("train_step");
    let compiled = staging::jit(filter, "normalized_sum", normalized_sum);
    compiled.call(values.to_vec())
}

fn normalized_sum(values: &[f64]) -> Result<f64, TracedError> {
    let _frame = enter("normalized_sum");
    if values.is_empty() {
        return Err(TracedError::new(ModelError::Empty));
    }
    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm == 0.0 {
        return Err(TracedError::new(ModelError::ZeroNorm));
    }
    Ok(values.iter().map(|v| v / norm).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traceback::FixedShellProbe;
    use boundtrace_config::FilteringMode;

    fn filter(mode: FilteringMode) -> TracebackFilter {
        let filter = TracebackFilter::new()
            .with_probe(FixedShellProbe::batch())
            .with_mode(Some(mode));
        staging::register(&filter);
        filter
    }

    fn names(err: &TracedError) -> Vec<&str> {
        err.traceback().iter().map(|f| f.function.as_str()).collect()
    }

    #[test]
    fn test_success() {
        let value = run(&filter(FilteringMode::RemoveFrames), &[3.0, 4.0]).unwrap();
        assert!((value - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_zero_norm_filtered() {
        let err = run(&filter(FilteringMode::RemoveFrames), &[0.0, 0.0]).unwrap_err();
        assert!(matches!(err.downcast_ref::<ModelError>(), Some(ModelError::ZeroNorm)));
        assert_eq!(names(&err), vec!["<module>", "train_step", "normalized_sum"]);

        let full = err.cause().unwrap();
        let full_names: Vec<_> = full.traceback().iter().map(|f| f.function.as_str()).collect();
        assert!(full_names.contains(&"trace_to_graph"));
        assert!(full_names.contains(&"cache_miss"));
    }

    #[test]
    fn test_empty_input() {
        let err = run(&filter(FilteringMode::RemoveFrames), &[]).unwrap_err();
        assert_eq!(
            err.format_exception_only(),
            "ModelError: expected at least one value"
        );
    }

    #[test]
    fn test_zero_norm_unfiltered_when_off() {
        let err = run(&filter(FilteringMode::Off), &[0.0]).unwrap_err();
        assert!(names(&err).contains(&"trace_to_graph"));
        assert!(err.cause().is_none());
    }
}
