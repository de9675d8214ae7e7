//! In-flight error values carrying a traceback and a cause chain.

use super::call_stack;
use super::frame::Traceback;
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Carries the unfiltered stack trace as the cause of a filtered error.
///
/// Only ever attached as a cause; never returned as the primary error.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct UnfilteredStackTrace {
    message: String,
}

impl UnfilteredStackTrace {
    pub(crate) fn new(message: String) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Plain-text error behind [`TracedError::msg`].
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct Message(String);

/// An error propagating through instrumented code.
///
/// Holds the user's error unchanged plus the metadata the boundary reshapes:
/// the traceback, the explicit `cause`, the implicit `context` and the
/// `suppress_context` flag.
pub struct TracedError {
    error: BoxError,
    type_name: &'static str,
    traceback: Traceback,
    context: Option<Box<TracedError>>,
    cause: Option<Box<TracedError>>,
    suppress_context: bool,
    filtered: bool,
    raised_at: Option<&'static Location<'static>>,
}

impl TracedError {
    /// Wrap `error`, capturing the current call stack as its traceback.
    #[track_caller]
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::capture(Box::new(error), short_type_name::<E>(), Location::caller())
    }

    /// An error with a plain message, reported as `Error: <message>`.
    #[track_caller]
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::capture(
            Box::new(Message(message.to_string())),
            "Error",
            Location::caller(),
        )
    }

    // Frames keep the line they were entered at. The raise site may be an
    // uninstrumented helper, so it is recorded apart from the traceback.
    fn capture(
        error: BoxError,
        type_name: &'static str,
        location: &'static Location<'static>,
    ) -> Self {
        let mut error = Self::from_parts(error, type_name, call_stack::snapshot().into());
        error.raised_at = Some(location);
        error
    }

    pub(crate) fn from_parts(error: BoxError, type_name: &'static str, traceback: Traceback) -> Self {
        Self {
            error,
            type_name,
            traceback,
            context: None,
            cause: None,
            suppress_context: false,
            filtered: false,
            raised_at: None,
        }
    }

    /// Set the explicit cause; like `raise .. from ..`, this suppresses the context.
    pub fn with_cause(mut self, cause: TracedError) -> Self {
        self.cause = Some(Box::new(cause));
        self.suppress_context = true;
        self
    }

    /// Set the error that was being handled when this one occurred.
    pub fn with_context(mut self, context: TracedError) -> Self {
        self.context = Some(Box::new(context));
        self
    }

    /// The wrapped user error.
    pub fn error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.error.as_ref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.error.downcast_ref::<E>()
    }

    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.error.is::<E>()
    }

    /// Short type name of the wrapped error.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Source location of the `new`/`msg`/`?` that created the error.
    pub fn raised_at(&self) -> Option<&'static Location<'static>> {
        self.raised_at
    }

    pub fn traceback(&self) -> &Traceback {
        &self.traceback
    }

    pub(crate) fn traceback_mut(&mut self) -> &mut Traceback {
        &mut self.traceback
    }

    pub(crate) fn set_traceback(&mut self, traceback: Traceback) {
        self.traceback = traceback;
    }

    pub fn cause(&self) -> Option<&TracedError> {
        self.cause.as_deref()
    }

    pub fn context(&self) -> Option<&TracedError> {
        self.context.as_deref()
    }

    pub fn suppress_context(&self) -> bool {
        self.suppress_context
    }

    pub(crate) fn take_cause(&mut self) -> Option<Box<TracedError>> {
        self.cause.take()
    }

    pub(crate) fn take_context(&mut self) -> Option<Box<TracedError>> {
        self.context.take()
    }

    pub(crate) fn set_chain(
        &mut self,
        cause: Option<Box<TracedError>>,
        context: Option<Box<TracedError>>,
        suppress_context: bool,
    ) {
        self.cause = cause;
        self.context = context;
        self.suppress_context = suppress_context;
    }

    /// Whether a boundary already rebuilt this error's traceback.
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    pub(crate) fn mark_filtered(&mut self) {
        self.filtered = true;
    }

    /// Whether this is the synthetic carrier of an unfiltered trace.
    pub fn is_unfiltered_stack_trace(&self) -> bool {
        self.is::<UnfilteredStackTrace>()
    }

    /// `"<Type>: <message>"`, or just the type name for an empty message.
    pub fn format_exception_only(&self) -> String {
        let message = self.error.to_string();
        let message = message.trim();
        if message.is_empty() {
            self.type_name.to_string()
        } else {
            format!("{}: {}", self.type_name, message)
        }
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedError")
            .field("error", &self.format_exception_only())
            .field("traceback", &self.traceback)
            .field("cause", &self.cause)
            .field("context", &self.context)
            .field("suppress_context", &self.suppress_context)
            .field("filtered", &self.filtered)
            .field("raised_at", &self.raised_at)
            .finish()
    }
}

impl<E> From<E> for TracedError
where
    E: StdError + Send + Sync + 'static,
{
    #[track_caller]
    fn from(error: E) -> Self {
        Self::capture(Box::new(error), short_type_name::<E>(), Location::caller())
    }
}

/// Last path segment of a type name, generics stripped.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
