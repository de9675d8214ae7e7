//! API boundaries: the point below which error tracebacks are filtered.
//!
//! A boundary runs a callable and, when an error escapes it, reshapes the
//! error's traceback according to the resolved [`FilteringStrategy`]:
//!
//! - **off**: the error passes through untouched.
//! - **tracebackhide**: internal frames below the boundary are flagged
//!   hidden in place; nothing else changes.
//! - **remove_frames**: internal frames below the boundary are removed from
//!   the error's traceback, and the full trace (extended up through the
//!   callers) is chained as the error's cause in an [`UnfilteredStackTrace`].
//!
//! Boundaries compose. When `api_boundary(f)` calls `api_boundary(g)`,
//! directly or indirectly, the outermost boundary does the filtering and the
//! inner one re-raises unchanged, so the result is the same as if `f` had
//! called `g` directly.

use super::call_stack::{self, CALL_STACK_SOURCE};
use super::error::{TracedError, UnfilteredStackTrace};
use super::exclusion::ExclusionRegistry;
use super::filter::{
    add_call_stack_frames, add_tracebackhide_to_hidden_frames, filter_traceback,
    is_under_reraiser, recorded_under,
};
use super::frame::{Frame, Traceback};
use super::mode::{EnvShellProbe, FilteringStrategy, ShellProbe, resolve_filtering_mode};
use boundtrace_config::{Config, FilteringMode};
use parking_lot::RwLock;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

/// Source path of this module; frames from it are always internal.
pub(crate) const BOUNDARY_SOURCE: &str = file!();

/// Function name recorded on every boundary frame.
pub(crate) const RERAISER_FUNCTION: &str = "reraise_with_filtered_traceback";

/// Banner appended to the message carried by the unfiltered trace.
pub const UNFILTERED_MESSAGE_APPEND: &str = "The stack trace below excludes internal frames.\n\
     The preceding is the original exception that occurred, unmodified.\n\
     \n--------------------";

/// Invoked with the reduced traceback after a rebuild, for runtimes that
/// keep a second copy of the in-flight trace.
pub type ReplaceTracebackHook = Arc<dyn Fn(&Traceback) + Send + Sync>;

static GLOBAL: LazyLock<TracebackFilter> = LazyLock::new(TracebackFilter::from_env);

/// Shared handle to everything a boundary needs.
///
/// Cloning is cheap and clones share the exclusion registry and the
/// configured mode.
#[derive(Clone)]
pub struct TracebackFilter {
    registry: ExclusionRegistry,
    mode: Arc<RwLock<Option<FilteringMode>>>,
    probe: Arc<dyn ShellProbe>,
    replace_hook: Option<ReplaceTracebackHook>,
}

impl fmt::Debug for TracebackFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracebackFilter")
            .field("exclusions", &self.registry.paths())
            .field("mode", &*self.mode.read())
            .field("replace_hook", &self.replace_hook.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for TracebackFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TracebackFilter {
    /// A filter with the default exclusions, an unset mode and the
    /// environment shell probe.
    pub fn new() -> Self {
        Self {
            registry: ExclusionRegistry::with_paths(default_exclusions()),
            mode: Arc::new(RwLock::new(None)),
            probe: Arc::new(EnvShellProbe),
            replace_hook: None,
        }
    }

    /// A filter whose mode comes from the filtering environment variable.
    pub fn from_env() -> Self {
        let filter = Self::new();
        match Config::filtering_from_env() {
            Ok(mode) => filter.set_mode(mode),
            Err(e) => log::warn!("Ignoring traceback filtering override: {e}"),
        }
        filter
    }

    /// A filter configured from `config`: its mode plus its extra exclusions.
    pub fn from_config(config: &Config) -> Self {
        let filter = Self::new();
        filter.set_mode(config.traceback_filtering);
        for path in config.resolved_exclude_paths() {
            filter.register_exclusion(path);
        }
        filter
    }

    /// The process-wide filter used by [`api_boundary`] and [`register_exclusion`].
    pub fn global() -> &'static TracebackFilter {
        &GLOBAL
    }

    pub fn with_probe(mut self, probe: impl ShellProbe + 'static) -> Self {
        self.probe = Arc::new(probe);
        self
    }

    pub fn with_mode(self, mode: Option<FilteringMode>) -> Self {
        self.set_mode(mode);
        self
    }

    pub fn with_replace_hook(mut self, hook: impl Fn(&Traceback) + Send + Sync + 'static) -> Self {
        self.replace_hook = Some(Arc::new(hook));
        self
    }

    /// Update the configured mode; later errors see the new value.
    pub fn set_mode(&self, mode: Option<FilteringMode>) {
        *self.mode.write() = mode;
    }

    pub fn configured_mode(&self) -> Option<FilteringMode> {
        *self.mode.read()
    }

    /// Treat frames under `path` as internal from now on.
    pub fn register_exclusion(&self, path: impl Into<PathBuf>) {
        self.registry.register(path);
    }

    pub fn registry(&self) -> &ExclusionRegistry {
        &self.registry
    }

    /// Whether `frame` survives filtering.
    pub fn include_frame(&self, frame: &Frame) -> bool {
        self.registry.include_frame(frame)
    }

    /// The strategy the next error would get.
    pub fn filtering_mode(&self) -> FilteringStrategy {
        resolve_filtering_mode(self.configured_mode(), self.probe.as_ref())
    }

    /// Wrap `fun` as a named boundary that filters through this handle.
    pub fn boundary<F>(&self, name: &'static str, fun: F) -> ApiBoundary<F> {
        ApiBoundary {
            name,
            doc: None,
            fun,
            filter: self.clone(),
        }
    }

    /// Run `fun` beneath a boundary.
    ///
    /// Success values are returned unchanged. An escaping error keeps its
    /// type and message; only its traceback and cause chain may change.
    pub fn reraise_with_filtered_traceback<T>(
        &self,
        fun: impl FnOnce() -> Result<T, TracedError>,
    ) -> Result<T, TracedError> {
        // Flagged hidden from the start so even unfiltered reports skip it.
        let guard = call_stack::push_frame(
            Frame::new(BOUNDARY_SOURCE, RERAISER_FUNCTION, line!()).hidden(),
        );

        let mut error = match fun() {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        let live_stack = call_stack::snapshot();
        let mode = self.filtering_mode();
        if error.is_filtered() || is_under_reraiser(&live_stack) || mode == FilteringStrategy::Off {
            log::trace!(
                "Re-raising {} unmodified (mode {:?}, already filtered: {})",
                error.type_name(),
                mode,
                error.is_filtered()
            );
            return Err(error);
        }

        let boundary_stack = &live_stack[..live_stack.len().min(guard.depth() + 1)];
        if !recorded_under(error.traceback().frames(), boundary_stack) {
            // Raised on another stack: everything it recorded lies below us.
            log::debug!(
                "Grafting foreign {} traceback ({} frames) below the boundary",
                error.type_name(),
                error.traceback().len()
            );
            let grafted: Traceback = boundary_stack
                .iter()
                .chain(error.traceback().iter())
                .cloned()
                .collect();
            error.set_traceback(grafted);
        }

        if mode == FilteringStrategy::TracebackHide {
            let start = boundary_stack.len().saturating_sub(1);
            add_tracebackhide_to_hidden_frames(
                &mut error.traceback_mut().frames_mut()[start..],
                &self.registry,
            );
            log::debug!("Flagged internal frames hidden on {}", error.type_name());
            return Err(error);
        }

        self.remove_frames(&mut error, boundary_stack);
        Err(error)
    }

    /// Rebuild `error` with a reduced traceback and chain the full one as its cause.
    ///
    /// `boundary_stack` is the live stack ending with this boundary's frame, and
    /// the traceback must already start with it.
    fn remove_frames(&self, error: &mut TracedError, boundary_stack: &[Frame]) {
        let depth = boundary_stack.len().saturating_sub(1);
        let (callers, below) = error.traceback().split_at(depth);

        let reduced: Traceback = callers
            .iter()
            .cloned()
            .chain(filter_traceback(below, &self.registry))
            .collect();
        let extended: Traceback = add_call_stack_frames(below, boundary_stack, &self.registry).into();

        let message = format!(
            "{}\n\n{}",
            error.format_exception_only(),
            UNFILTERED_MESSAGE_APPEND
        );
        let mut unfiltered = TracedError::from_parts(
            Box::new(UnfilteredStackTrace::new(message)),
            "UnfilteredStackTrace",
            extended,
        );
        let suppress_context = error.suppress_context();
        unfiltered.set_chain(error.take_cause(), error.take_context(), suppress_context);

        log::debug!(
            "Filtered {} traceback: {} -> {} frames",
            error.type_name(),
            error.traceback().len(),
            reduced.len()
        );

        // Assigning a cause always suppresses the context.
        error.set_chain(Some(Box::new(unfiltered)), None, true);
        error.set_traceback(reduced);
        error.mark_filtered();

        if let Some(hook) = &self.replace_hook {
            hook(error.traceback());
        }
    }
}

/// A callable wrapped as an API boundary.
///
/// Keeps the wrapped callable's calling convention: `call(args)` forwards
/// `args` unchanged and returns its result.
pub struct ApiBoundary<F> {
    name: &'static str,
    doc: Option<&'static str>,
    fun: F,
    filter: TracebackFilter,
}

impl<F> ApiBoundary<F> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn doc(&self) -> Option<&'static str> {
        self.doc
    }

    pub fn with_doc(mut self, doc: &'static str) -> Self {
        self.doc = Some(doc);
        self
    }

    /// The wrapped callable.
    pub fn inner(&self) -> &F {
        &self.fun
    }

    pub fn filter(&self) -> &TracebackFilter {
        &self.filter
    }

    pub fn call<A, T>(&self, args: A) -> Result<T, TracedError>
    where
        F: Fn(A) -> Result<T, TracedError>,
    {
        self.filter
            .reraise_with_filtered_traceback(|| (self.fun)(args))
    }
}

impl<F> fmt::Debug for ApiBoundary<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiBoundary")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// Wrap `fun` as a boundary against the global filter.
pub fn api_boundary<F>(name: &'static str, fun: F) -> ApiBoundary<F> {
    TracebackFilter::global().boundary(name, fun)
}

/// Add `path` to the global exclusion registry.
pub fn register_exclusion(path: impl Into<PathBuf>) {
    TracebackFilter::global().register_exclusion(path);
}

fn default_exclusions() -> [PathBuf; 2] {
    [PathBuf::from(BOUNDARY_SOURCE), PathBuf::from(CALL_STACK_SOURCE)]
}
