//! Simulated staging pipeline standing in for a compiler's internals.
//!
//! Everything in this file is registered as internal, so its frames are
//! what the boundary filters away.

use crate::traceback::{ApiBoundary, TracebackFilter, TracedError, enter};

pub(crate) const SOURCE: &str = file!();

/// The traced form of a user function: its inputs and the value it produced.
#[derive(Debug, Clone)]
pub struct Graph {
    pub name: &'static str,
    pub arity: usize,
    pub output: f64,
}

/// Mark this pipeline's frames as internal in `filter`.
pub fn register(filter: &TracebackFilter) {
    filter.register_exclusion(SOURCE);
}

/// Wrap `fun` so every call traces, lowers and executes it beneath a boundary.
pub fn jit<F>(
    filter: &TracebackFilter,
    name: &'static str,
    fun: F,
) -> ApiBoundary<impl Fn(Vec<f64>) -> Result<f64, TracedError>>
where
    F: Fn(&[f64]) -> Result<f64, TracedError>,
{
    filter
        .boundary(name, move |args: Vec<f64>| {
            let _frame = enter("cache_miss");
            let graph = trace_to_graph(name, &fun, &args)?;
            let module = lower_to_module(&graph)?;
            execute(&module)
        })
        .with_doc("Traces, lowers and executes the wrapped function.")
}

fn trace_to_graph<F>(name: &'static str, fun: &F, args: &[f64]) -> Result<Graph, TracedError>
where
    F: Fn(&[f64]) -> Result<f64, TracedError>,
{
    let _frame = enter("trace_to_graph");
    log::debug!("Tracing {name} with {} arguments", args.len());
    let output = fun(args)?;
    Ok(Graph {
        name,
        arity: args.len(),
        output,
    })
}

fn lower_to_module(graph: &Graph) -> Result<String, TracedError> {
    let _frame = enter("lower_to_module");
    if !graph.output.is_finite() {
        return Err(TracedError::msg(format!(
            "cannot lower {}: non-finite constant {}",
            graph.name, graph.output
        )));
    }
    Ok(format!(
        "func @{}(%arg: tensor<{}xf64>) -> f64 {{ return {} }}",
        graph.name, graph.arity, graph.output
    ))
}

fn execute(module: &str) -> Result<f64, TracedError> {
    let _frame = enter("execute");
    let value = module
        .rsplit("return ")
        .next()
        .and_then(|tail| tail.trim_end_matches(" }").trim().parse::<f64>().ok())
        .ok_or_else(|| TracedError::msg("malformed module"))?;
    Ok(value)
}
