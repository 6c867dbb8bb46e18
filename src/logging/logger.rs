//! Console/file logger with dry-run awareness and pass summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, PassEntry, PassStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Production [`Log`] sink.
///
/// Every message is emitted as a [`tracing`] event; the subscriber set up by
/// [`init_subscriber`](super::subscriber::init_subscriber) renders it on the
/// console and appends it to `$XDG_CACHE_HOME/dotfiles/<command>.log`.
#[derive(Debug)]
pub struct Logger {
    passes: Mutex<Vec<PassEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// created by the subscriber's file layer.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            passes: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded pass entries.
    #[must_use]
    pub fn pass_entries(&self) -> Vec<PassEntry> {
        self.passes.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a pass result for the summary.
    pub fn record_pass(&self, name: &str, status: PassStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.passes.lock() {
            guard.push(PassEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return `true` if any recorded pass has failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.passes
            .lock()
            .is_ok_and(|guard| guard.iter().any(|p| p.status == PassStatus::Failed))
    }

    /// Print the summary of all recorded passes.
    pub fn print_summary(&self) {
        let passes = self.pass_entries();
        if passes.is_empty() {
            return;
        }

        self.stage("Summary");

        for pass in &passes {
            let (icon, color) = match pass.status {
                PassStatus::Ok => ("✓", "\x1b[32m"),
                PassStatus::Skipped => ("○", "\x1b[33m"),
                PassStatus::DryRun => ("~", "\x1b[37m"),
                PassStatus::Failed => ("✗", "\x1b[31m"),
            };

            let suffix = pass
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", pass.name));
        }

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_pass(&self, name: &str, status: PassStatus, message: Option<&str>) {
        self.record_pass(name, status, message);
    }
}
