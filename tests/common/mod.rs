// Shared helpers for integration tests.
//
// Provides a temporary dotfiles repository plus a temporary home directory,
// and an in-memory log sink, so each integration test can lay out layers
// and inspect the installed tree without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dotfiles_overlay::logging::{Log, Logger, PassEntry, PassStatus};
use dotfiles_overlay::overlay::InstallSession;

/// An isolated repository and home directory, each a [`tempfile::TempDir`].
pub struct Fixture {
    /// Temporary dotfiles repository (layers live directly under it).
    pub repo: tempfile::TempDir,
    /// Temporary destination directory.
    pub home: tempfile::TempDir,
    /// Temporary `XDG_CACHE_HOME` for log files.
    pub cache: tempfile::TempDir,
}

/// Serializes `XDG_CACHE_HOME` manipulation across parallel test threads.
static CACHE_ENV: Mutex<()> = Mutex::new(());

impl Fixture {
    /// Create an empty repository and home directory.
    pub fn new() -> Self {
        Self {
            repo: tempfile::tempdir().expect("create repo dir"),
            home: tempfile::tempdir().expect("create home dir"),
            cache: tempfile::tempdir().expect("create cache dir"),
        }
    }

    /// Write `content` to `<repo>/<layer>/<rel>`.
    pub fn layer_file(&self, layer: &str, rel: &str, content: &str) -> &Self {
        write(&self.layer(layer).join(rel), content);
        self
    }

    /// Write `content` to `<home>/<rel>`.
    pub fn home_file(&self, rel: &str, content: &str) -> &Self {
        write(&self.home.path().join(rel), content);
        self
    }

    /// Write `conf/layers.toml`.
    pub fn layers_toml(&self, content: &str) -> &Self {
        write(&self.repo.path().join("conf/layers.toml"), content);
        self
    }

    /// Path of a layer directory.
    pub fn layer(&self, name: &str) -> PathBuf {
        self.repo.path().join(name)
    }

    /// Session with base `common`, the given overlays, and the repo as
    /// work dir.
    pub fn session<'a>(&self, log: &'a dyn Log, overlays: &[&str]) -> InstallSession<'a> {
        InstallSession::new(self.layer("common"), self.home.path(), log)
            .overlays(overlays.iter().map(|name| self.layer(name)))
            .work_dir(self.repo.path())
    }

    /// A [`Logger`] whose log file lives in this fixture's cache dir
    /// instead of the real home directory.
    pub fn logger(&self) -> Logger {
        let _lock = CACHE_ENV
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: Protected by CACHE_ENV; removed before the lock is released.
        #[allow(unsafe_code)]
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", self.cache.path());
        }
        let log = Logger::new("install");
        // SAFETY: Protected by CACHE_ENV.
        #[allow(unsafe_code)]
        unsafe {
            std::env::remove_var("XDG_CACHE_HOME");
        }
        log
    }

    /// Read `<home>/<rel>`.
    pub fn read_home(&self, rel: &str) -> String {
        std::fs::read_to_string(self.home.path().join(rel)).expect("read home file")
    }

    /// Sorted `path = content` listing of every file in the home directory.
    pub fn home_listing(&self) -> String {
        listing(self.home.path())
    }

    /// Names directly under the repository root starting with `prefix`.
    pub fn repo_entries(&self, prefix: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.repo.path())
            .expect("read repo dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(prefix))
            .collect();
        names.sort();
        names
    }
}

/// Write `content` to `path`, creating parent directories.
pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

/// Sorted `path = content` listing of every regular file under `root`,
/// with `/` separators.
pub fn listing(root: &Path) -> String {
    let mut lines: Vec<String> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.expect("walk entry"))
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).expect("under root");
            let rel = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            let content = std::fs::read_to_string(e.path()).expect("read file");
            format!("{rel} = {}", content.trim_end())
        })
        .collect();
    lines.sort();
    lines.join("\n")
}

/// In-memory [`Log`] sink that records messages and pass entries.
#[derive(Debug, Default)]
pub struct RecordingLog {
    messages: Mutex<Vec<(&'static str, String)>>,
    passes: Mutex<Vec<PassEntry>>,
}

impl RecordingLog {
    fn push(&self, level: &'static str, msg: &str) {
        self.messages
            .lock()
            .expect("messages lock")
            .push((level, msg.to_string()));
    }

    /// Return `true` if any message at `level` contains `needle`.
    pub fn contains(&self, level: &str, needle: &str) -> bool {
        self.messages
            .lock()
            .expect("messages lock")
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    /// All recorded pass entries.
    pub fn passes(&self) -> Vec<PassEntry> {
        self.passes.lock().expect("passes lock").clone()
    }

    /// Recorded pass statuses in order.
    pub fn statuses(&self) -> Vec<PassStatus> {
        self.passes().iter().map(|p| p.status).collect()
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_pass(&self, name: &str, status: PassStatus, message: Option<&str>) {
        self.passes.lock().expect("passes lock").push(PassEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        });
    }
}
