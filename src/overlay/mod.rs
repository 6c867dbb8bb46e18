//! Tree-level merge install: walk a source tree and install every file.
//!
//! - [`path`]: [`PathMapper`], relative path → destination path
//! - [`walk`]: [`TreeWalk`], lazy enumeration of a source tree
//! - [`session`]: [`InstallSession`], the multi-pass staging/install run
//!
//! [`OverlayInstaller`] ties a walk, the mapper and the
//! [`FileInstaller`] together for one source tree.
//!
//! A failed file aborts the rest of its pass; files processed before the
//! failure stay installed.  There is no rollback.

pub mod path;
pub mod session;
pub mod walk;

pub use path::{DEFAULT_MARKER, PathMapper};
pub use session::{InstallSession, Layer, SessionReport};
pub use walk::TreeWalk;

use std::fmt;
use std::ops::AddAssign;
use std::path::Path;

use crate::error::InstallError;
use crate::logging::Log;
use crate::resources::{FileInstaller, InstallAction};

/// Per-action counters for one pass (or a sum of passes).
///
/// # Examples
///
/// ```
/// use dotfiles_overlay::overlay::PassStats;
/// use dotfiles_overlay::resources::InstallAction;
///
/// let mut stats = PassStats::new();
/// stats.record(InstallAction::Install, false);
/// stats.record(InstallAction::BackupThenOverwrite, true);
/// stats.record(InstallAction::Skip, true);
///
/// assert_eq!(stats.processed(), 3);
/// assert_eq!(stats.summary(false), "2 changed, 1 already ok, 1 backed up");
/// assert_eq!(stats.summary(true), "2 would change, 1 already ok, 1 backed up");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassStats {
    /// Files copied to an absent destination.
    pub installed: u32,
    /// Files whose destination was already byte-identical.
    pub skipped: u32,
    /// Files whose destination was replaced.
    pub overwritten: u32,
    /// Files whose content was appended to the destination.
    pub appended: u32,
    /// Destination files copied to the backup tree first.
    pub backed_up: u32,
}

impl PassStats {
    /// Create a new empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one file's action; `backup_configured` tells whether a backup
    /// path was handed to the installer for it.
    pub const fn record(&mut self, action: InstallAction, backup_configured: bool) {
        match action {
            InstallAction::Install => self.installed += 1,
            InstallAction::Skip => self.skipped += 1,
            InstallAction::Overwrite => self.overwritten += 1,
            InstallAction::BackupThenOverwrite => {
                self.overwritten += 1;
                self.backed_up += 1;
            }
            InstallAction::Append => {
                self.appended += 1;
                if backup_configured {
                    self.backed_up += 1;
                }
            }
            InstallAction::BackupConflict => {}
        }
    }

    /// Number of files that were written to.
    #[must_use]
    pub const fn changed(&self) -> u32 {
        self.installed + self.overwritten + self.appended
    }

    /// Number of files processed.
    #[must_use]
    pub const fn processed(&self) -> u32 {
        self.changed() + self.skipped
    }

    /// Format the summary string (e.g. `"3 changed, 10 already ok"`).
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut out = format!("{} {verb}, {} already ok", self.changed(), self.skipped);
        if self.backed_up > 0 {
            out.push_str(&format!(", {} backed up", self.backed_up));
        }
        out
    }
}

impl AddAssign for PassStats {
    fn add_assign(&mut self, rhs: Self) {
        self.installed += rhs.installed;
        self.skipped += rhs.skipped;
        self.overwritten += rhs.overwritten;
        self.appended += rhs.appended;
        self.backed_up += rhs.backed_up;
    }
}

/// Merges one source tree into one destination tree.
pub struct OverlayInstaller<'a> {
    mapper: PathMapper,
    log: &'a dyn Log,
    dry_run: bool,
}

impl fmt::Debug for OverlayInstaller<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayInstaller")
            .field("mapper", &self.mapper)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl<'a> OverlayInstaller<'a> {
    /// Create an installer that writes changes.
    #[must_use]
    pub const fn new(mapper: PathMapper, log: &'a dyn Log) -> Self {
        Self {
            mapper,
            log,
            dry_run: false,
        }
    }

    /// Switch dry-run mode on or off.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Install every file under `src_root` into `dst_root`.
    ///
    /// Each file lands at `mapper.map(rel, dst_root, add_prefix)`; with a
    /// `backup_root`, a differing destination is first copied to
    /// `mapper.map(rel, backup_root, false)`.  A missing `src_root` is not an
    /// error: the pass processes zero files.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any file; remaining files are not
    /// processed and files already processed are left as they are.
    pub fn install(
        &self,
        src_root: &Path,
        dst_root: &Path,
        backup_root: Option<&Path>,
        append: bool,
        add_prefix: bool,
    ) -> Result<PassStats, InstallError> {
        self.log
            .info(&format!("install from: {}", src_root.display()));
        self.log
            .info(&format!("          to: {}", dst_root.display()));
        if let Some(backup_root) = backup_root {
            self.log
                .info(&format!("  backup dir: {}", backup_root.display()));
        }

        let mut stats = PassStats::new();
        if !src_root.is_dir() {
            self.log.info("Source directory does not exist.");
            return Ok(stats);
        }

        let files = FileInstaller::new(self.log).dry_run(self.dry_run);
        for relative in TreeWalk::new(src_root) {
            let relative = relative?;
            self.log
                .debug(&format!("on path: {}", relative.display()));
            let dst = self.mapper.map(&relative, dst_root, add_prefix)?;
            let backup = backup_root
                .map(|root| self.mapper.map(&relative, root, false))
                .transpose()?;
            let action = files.apply(
                &src_root.join(&relative),
                &dst,
                backup.as_deref(),
                append,
            )?;
            stats.record(action, backup.is_some());
        }

        self.log.info("done");
        Ok(stats)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use std::fs;

    use mockall::mock;

    use super::*;
    use crate::logging::PassStatus;
    use crate::logging::test_helpers::RecordingLog;

    mock! {
        Sink {}
        impl Log for Sink {
            fn stage(&self, msg: &str);
            fn info(&self, msg: &str);
            fn debug(&self, msg: &str);
            fn warn(&self, msg: &str);
            fn error(&self, msg: &str);
            fn dry_run(&self, msg: &str);
            fn record_pass<'a>(&self, name: &str, status: PassStatus, message: Option<&'a str>);
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn installs_tree_with_prefix_on_first_segment() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        write(src.path(), "zshrc", "zsh");
        write(src.path(), "config/foo", "foo");
        let log = RecordingLog::default();

        let stats = OverlayInstaller::new(PathMapper::default(), &log)
            .install(src.path(), dst.path(), None, false, true)
            .unwrap();

        assert_eq!(stats.installed, 2);
        assert_eq!(fs::read_to_string(dst.path().join(".zshrc")).unwrap(), "zsh");
        assert_eq!(
            fs::read_to_string(dst.path().join(".config/foo")).unwrap(),
            "foo"
        );
    }

    #[test]
    fn backups_mirror_relative_paths_without_prefix() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let bak = tempfile::tempdir().unwrap();
        write(src.path(), "config/git/config", "new");
        write(dst.path(), ".config/git/config", "old");
        let log = RecordingLog::default();

        let stats = OverlayInstaller::new(PathMapper::default(), &log)
            .install(src.path(), dst.path(), Some(bak.path()), false, true)
            .unwrap();

        assert_eq!(stats.backed_up, 1);
        assert_eq!(stats.overwritten, 1);
        assert_eq!(
            fs::read_to_string(bak.path().join("config/git/config")).unwrap(),
            "old"
        );
        assert_eq!(
            fs::read_to_string(dst.path().join(".config/git/config")).unwrap(),
            "new"
        );
    }

    #[test]
    fn append_pass_concatenates_onto_existing_files() {
        let base = tempfile::tempdir().unwrap();
        let overlay = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        write(base.path(), "bashrc", "A");
        write(overlay.path(), "bashrc", "B");
        write(overlay.path(), "linux-only", "L");
        let log = RecordingLog::default();
        let installer = OverlayInstaller::new(PathMapper::default(), &log);

        installer
            .install(base.path(), staging.path(), None, false, false)
            .unwrap();
        let stats = installer
            .install(overlay.path(), staging.path(), None, true, false)
            .unwrap();

        assert_eq!(stats.appended, 1);
        assert_eq!(stats.installed, 1);
        assert_eq!(
            fs::read_to_string(staging.path().join("bashrc")).unwrap(),
            "AB"
        );
        assert_eq!(
            fs::read_to_string(staging.path().join("linux-only")).unwrap(),
            "L"
        );
    }

    #[test]
    fn conflict_aborts_pass_without_rollback() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let bak = tempfile::tempdir().unwrap();
        write(src.path(), "vimrc", "new");
        write(dst.path(), ".vimrc", "old");
        write(bak.path(), "vimrc", "older");
        let log = RecordingLog::default();

        let err = OverlayInstaller::new(PathMapper::default(), &log)
            .install(src.path(), dst.path(), Some(bak.path()), false, true)
            .unwrap_err();

        assert!(err.is_backup_conflict());
        assert_eq!(fs::read_to_string(dst.path().join(".vimrc")).unwrap(), "old");
        assert_eq!(fs::read_to_string(bak.path().join("vimrc")).unwrap(), "older");
        assert!(!log.contains("info", "done"), "pass must stop at the conflict");
    }

    #[test]
    fn missing_source_logs_and_processes_nothing() {
        let dst = tempfile::tempdir().unwrap();
        let mut log = MockSink::new();
        log.expect_info()
            .withf(|msg| msg.starts_with("install from:") || msg.trim_start().starts_with("to:"))
            .times(2)
            .return_const(());
        log.expect_info()
            .withf(|msg| msg == "Source directory does not exist.")
            .times(1)
            .return_const(());
        log.expect_debug().never();

        let stats = OverlayInstaller::new(PathMapper::default(), &log)
            .install(
                &dst.path().join("windows"),
                dst.path(),
                None,
                true,
                false,
            )
            .unwrap();

        assert_eq!(stats.processed(), 0);
    }

    #[test]
    fn every_file_gets_a_debug_line() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        write(src.path(), "a", "1");
        write(src.path(), "b/c", "2");
        let mut log = MockSink::new();
        log.expect_info().return_const(());
        log.expect_debug()
            .withf(|msg| msg.starts_with("on path: "))
            .times(2)
            .return_const(());
        log.expect_debug()
            .withf(|msg| !msg.starts_with("on path: "))
            .return_const(());

        let stats = OverlayInstaller::new(PathMapper::default(), &log)
            .install(src.path(), dst.path(), None, false, false)
            .unwrap();
        assert_eq!(stats.installed, 2);
    }

    #[test]
    fn stats_add_up_across_passes() {
        let mut total = PassStats::new();
        let mut pass = PassStats::new();
        pass.record(InstallAction::Append, false);
        pass.record(InstallAction::Append, true);
        total += pass;
        total += pass;
        assert_eq!(total.appended, 4);
        assert_eq!(total.backed_up, 2);
        assert_eq!(total.summary(false), "4 changed, 0 already ok, 2 backed up");
    }
}
