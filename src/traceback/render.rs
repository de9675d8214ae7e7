//! Plain-text and JSON presentation of traced errors.
//!
//! Text output follows the interpreter convention: the oldest link of the
//! cause/context chain is printed first, each section being a
//! `Traceback (most recent call last):` block followed by the
//! `<Type>: <message>` line.

use super::error::TracedError;
use super::frame::{Frame, Traceback};
use serde::Serialize;
use std::fmt::Write;

const TRACEBACK_HEADER: &str = "Traceback (most recent call last):";
const CAUSE_SEPARATOR: &str =
    "The above exception was the direct cause of the following exception:";
const CONTEXT_SEPARATOR: &str =
    "During handling of the above exception, another exception occurred:";

/// Options for [`format_exception`].
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Skip frames flagged hidden, like a shell that honours frame hiding.
    pub honor_hidden: bool,
    /// Follow `cause` and `context` links.
    pub chain: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            honor_hidden: false,
            chain: true,
        }
    }
}

/// Render `error` and, unless disabled, its chain.
pub fn format_exception(error: &TracedError, options: &RenderOptions) -> String {
    let mut out = String::new();
    write_chain(&mut out, error, options);
    out
}

fn write_chain(out: &mut String, error: &TracedError, options: &RenderOptions) {
    if options.chain {
        if let Some(cause) = error.cause() {
            write_chain(out, cause, options);
            let _ = write!(out, "\n{CAUSE_SEPARATOR}\n\n");
        } else if let Some(context) = error.context()
            && !error.suppress_context()
        {
            write_chain(out, context, options);
            let _ = write!(out, "\n{CONTEXT_SEPARATOR}\n\n");
        }
    }
    write_section(out, error, options);
}

fn write_section(out: &mut String, error: &TracedError, options: &RenderOptions) {
    let frames: Vec<&Frame> = displayed_frames(error.traceback(), options).collect();
    if !frames.is_empty() {
        let _ = writeln!(out, "{TRACEBACK_HEADER}");
        for frame in frames {
            let _ = writeln!(out, "  {frame}");
        }
    }
    let _ = writeln!(out, "{}", error.format_exception_only());
}

fn displayed_frames<'a>(
    traceback: &'a Traceback,
    options: &'a RenderOptions,
) -> impl Iterator<Item = &'a Frame> {
    traceback
        .iter()
        .filter(move |frame| !(options.honor_hidden && frame.hidden))
}

/// Serializable view of a traced error and its chain.
#[derive(Debug, Serialize)]
pub struct ExceptionReport<'a> {
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub message: String,
    pub traceback: &'a Traceback,
    /// `file:line` of the raise site, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raised_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ExceptionReport<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Box<ExceptionReport<'a>>>,
    pub suppress_context: bool,
}

impl<'a> ExceptionReport<'a> {
    pub fn new(error: &'a TracedError) -> Self {
        Self {
            type_name: error.type_name(),
            message: error.to_string(),
            traceback: error.traceback(),
            raised_at: error
                .raised_at()
                .map(|location| format!("{}:{}", location.file(), location.line())),
            cause: error.cause().map(|c| Box::new(Self::new(c))),
            context: error.context().map(|c| Box::new(Self::new(c))),
            suppress_context: error.suppress_context(),
        }
    }
}

/// Pretty-printed JSON for `error` and its chain.
pub fn to_json(error: &TracedError) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ExceptionReport::new(error))
}
