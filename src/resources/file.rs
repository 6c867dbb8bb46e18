//! Single-file installer.
use std::fmt;
use std::path::Path;

use super::helpers::fs::{append_file, contents_equal, copy_file};
use super::{FileState, InstallAction};
use crate::error::InstallError;
use crate::logging::Log;

/// Installs one source file onto one destination path.
///
/// The destination is classified with [`FileInstaller::plan`] and the
/// resulting [`InstallAction`] carried out by [`FileInstaller::apply`]:
///
/// 1. destination absent: copy source into place (`Install`);
/// 2. identical bytes: no write at all (`Skip`);
/// 3. differing bytes with a backup path: refuse if something is already at
///    the backup path (`BackupConflict`), else copy the destination there;
/// 4. then replace the destination (`Overwrite` / `BackupThenOverwrite`) or
///    append the source to it (`Append`).
///
/// In dry-run mode `apply` only plans and logs what it would do.
pub struct FileInstaller<'a> {
    log: &'a dyn Log,
    dry_run: bool,
}

impl fmt::Debug for FileInstaller<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileInstaller")
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl<'a> FileInstaller<'a> {
    /// Create an installer that writes changes.
    #[must_use]
    pub const fn new(log: &'a dyn Log) -> Self {
        Self {
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

    /// Observe `dst` relative to `src`.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read.
    pub fn state(src: &Path, dst: &Path) -> Result<FileState, InstallError> {
        if !dst.exists() {
            return Ok(FileState::Missing);
        }
        if contents_equal(src, dst)? {
            Ok(FileState::Identical)
        } else {
            Ok(FileState::Differs)
        }
    }

    /// Decide what [`apply`](Self::apply) would do, without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read.
    pub fn plan(
        &self,
        src: &Path,
        dst: &Path,
        backup: Option<&Path>,
        append: bool,
    ) -> Result<InstallAction, InstallError> {
        let state = Self::state(src, dst)?;
        let backup_exists = backup.map(Path::exists);
        Ok(InstallAction::decide(state, append, backup_exists))
    }

    /// Install `src` onto `dst` and report what was done.
    ///
    /// Never returns `Ok(InstallAction::BackupConflict)`: a conflict is
    /// reported as [`InstallError::BackupConflict`] and leaves both the
    /// destination and the existing backup untouched.
    ///
    /// # Errors
    ///
    /// Returns an error on a backup conflict or on any I/O failure.
    pub fn apply(
        &self,
        src: &Path,
        dst: &Path,
        backup: Option<&Path>,
        append: bool,
    ) -> Result<InstallAction, InstallError> {
        let action = self.plan(src, dst, backup, append)?;
        if action == InstallAction::BackupConflict {
            return Err(InstallError::BackupConflict {
                backup: backup.map(Path::to_path_buf).unwrap_or_default(),
                destination: dst.to_path_buf(),
            });
        }
        if !action.writes() {
            self.log.debug("Destination file is the same");
            return Ok(action);
        }
        if self.dry_run {
            self.log
                .dry_run(&format!("would {} {}", action.verb(), dst.display()));
            return Ok(action);
        }

        match action {
            InstallAction::Install => {
                self.log.debug("Destination file does not exist");
                copy_file(src, dst)?;
            }
            InstallAction::Overwrite | InstallAction::BackupThenOverwrite => {
                self.back_up(dst, backup)?;
                copy_file(src, dst)?;
            }
            InstallAction::Append => {
                self.back_up(dst, backup)?;
                append_file(src, dst)?;
            }
            InstallAction::Skip | InstallAction::BackupConflict => {}
        }
        Ok(action)
    }

    /// Copy the current destination content to `backup`, if configured.
    fn back_up(&self, dst: &Path, backup: Option<&Path>) -> Result<(), InstallError> {
        if let Some(backup) = backup {
            self.log.debug("Doing backup of destination");
            copy_file(dst, backup)?;
            self.log
                .info(&format!("Backup done on file {}", dst.display()));
        }
        Ok(())
    }
}
