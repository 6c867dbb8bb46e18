//! Core logging types: pass entries, status, and the [`Log`] trait.

/// Outcome of one overlay pass, kept for summary reporting.
#[derive(Debug, Clone)]
pub struct PassEntry {
    /// Human-readable pass name (e.g. `"stage base layer common"`).
    pub name: String,
    /// Final status of the pass.
    pub status: PassStatus,
    /// Optional detail message (counts, skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    /// The pass processed its source tree.
    Ok,
    /// The pass had nothing to do because its source root does not exist.
    Skipped,
    /// The pass only planned its changes; nothing was written.
    DryRun,
    /// The pass aborted with an error.
    Failed,
}

/// Logging sink injected into every engine component.
///
/// [`Logger`](super::logger::Logger) forwards to the process-wide
/// [`tracing`] subscriber; tests substitute recording or mock
/// implementations so engine code never depends on global state.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a pass result for the summary.
    fn record_pass(&self, name: &str, status: PassStatus, message: Option<&str>);
}
