//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::Level;

use super::utils::{HEADER_FORMAT, LINE_FORMAT, log_file_path, utc_now};

/// Target used by [`Logger::stage`](super::Logger::stage).
pub(super) const STAGE_TARGET: &str = "dotfiles::stage";
/// Target used by [`Logger::dry_run`](super::Logger::dry_run).
pub(super) const DRY_RUN_TARGET: &str = "dotfiles::dry_run";

/// How an event is rendered, derived from its level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Stage,
    DryRun,
    Error,
    Warn,
    Info,
    Debug,
}

impl EventKind {
    fn classify(level: Level, target: &str) -> Self {
        match (level, target) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Plain-text rendering for the log file.
    fn file_line(self, ts: &str, msg: &str) -> String {
        match self {
            Self::Stage => format!("[{ts}] ==> {msg}"),
            Self::DryRun => format!("[{ts}]     [dry run] {msg}"),
            Self::Error => format!("[{ts}]     [error] {msg}"),
            Self::Warn => format!("[{ts}]     [warn] {msg}"),
            Self::Debug => format!("[{ts}]     [debug] {msg}"),
            Self::Info => format!("[{ts}]     {msg}"),
        }
    }

    /// Coloured rendering for the terminal.
    fn console_line(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::DryRun => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Self::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
            Self::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            Self::Info => format!("  {msg}"),
            Self::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Remove terminal escape sequences so the log file stays plain text.
///
/// A CSI sequence (`ESC [` … final byte in `@`..=`~`) is dropped whole; any
/// other escape drops `ESC` and the one character after it.
fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('\x1b') {
        let (text, escape) = rest.split_at(start);
        out.push_str(text);
        let escape = escape.strip_prefix('\x1b').unwrap_or(escape);
        rest = if let Some(params) = escape.strip_prefix('[') {
            params
                .find(|c: char| ('@'..='~').contains(&c))
                .and_then(|end| params.get(end + 1..))
                .unwrap_or("")
        } else {
            let mut chars = escape.chars();
            chars.next();
            chars.as_str()
        };
    }
    out.push_str(rest);
    out
}

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl MessageExtractor {
    fn extract(event: &tracing::Event<'_>) -> (EventKind, String) {
        let metadata = event.metadata();
        let mut extractor = Self::default();
        event.record(&mut extractor);
        (
            EventKind::classify(*metadata.level(), metadata.target()),
            extractor.message,
        )
    }
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::Layer`] that appends every event to the
/// persistent log file, timestamped and with ANSI codes stripped.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the log file for `command`, write a run header, and return a
    /// layer appending to it.
    ///
    /// Returns `None` if the cache directory or the file is unavailable.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let rule = "=".repeat(42);
        let header = format!(
            "{rule}\nDotfiles {} {} ({command})\n{rule}\n",
            env!("CARGO_PKG_VERSION"),
            utc_now(HEADER_FORMAT),
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let (kind, message) = MessageExtractor::extract(event);
        let line = kind.file_line(&utc_now(LINE_FORMAT), &strip_ansi(&message));
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Console [`FormatEvent`](tracing_subscriber::fmt::FormatEvent) matching the
/// installer's output style.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let (kind, message) = MessageExtractor::extract(event);
        writeln!(writer, "{}", kind.console_line(&message))
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console output goes to stdout (info and below) and stderr (warnings and
/// errors); `verbose` lowers the console threshold to `debug`.  The file
/// layer always captures `debug` and above in
/// `$XDG_CACHE_HOME/dotfiles/<command>.log`.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
