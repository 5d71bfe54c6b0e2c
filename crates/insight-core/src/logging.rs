//! Logging facilities for Insight.
//!
//! Insight uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter(EnvFilter::new("insight=debug"))
//!         .init();
//! }
//! ```
//!
//! Filter directives can use the constants in [`targets`] to select a
//! single subsystem, e.g. `insight::suggest::controller=trace`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core target.
    pub const CORE: &str = "insight_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "insight_core::signal";
    /// Performance spans target.
    pub const PERF: &str = "insight_core::perf";
    /// HTTP client target.
    pub const HTTP: &str = "insight_net::http";
    /// Suggestion source (remote lookup) target.
    pub const SOURCE: &str = "insight::suggest::source";
    /// Suggestion controller target.
    pub const CONTROLLER: &str = "insight::suggest::controller";
    /// Dismissal coordinator target.
    pub const DISMISSAL: &str = "insight::suggest::dismissal";
    /// Field binder target.
    pub const BINDER: &str = "insight::suggest::binder";
}

/// A guard that times an operation for performance tracing.
///
/// The span is entered on creation and closed when the guard is dropped,
/// so subscribers that record span timings (e.g. `FmtSpan::CLOSE`) report
/// the operation's latency.
///
/// # Example
///
/// ```
/// use insight_core::logging::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("suggestion_lookup");
///     // ... work ...
/// }
/// ```
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "insight_core::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }

    /// The same performance span, not entered, for instrumenting a future.
    ///
    /// An entered guard must not be held across `.await`; attach this span
    /// with [`tracing::Instrument`] instead.
    pub fn for_future(name: &'static str) -> tracing::Span {
        tracing::info_span!(target: "insight_core::perf", "perf", operation = name)
    }
}

impl std::fmt::Debug for PerfSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerfSpan").finish_non_exhaustive()
    }
}
