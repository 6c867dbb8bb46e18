//! Multi-pass install: stage every layer, then install the staging tree.
//!
//! A session
//!
//! 1. creates a fresh staging directory and a backup root in the work dir;
//! 2. copies the base layer into staging, then appends each overlay onto it;
//! 3. installs staging into the destination with the marker prefix, backing
//!    up every differing destination file;
//! 4. removes staging, and removes the backup root again if it stayed empty.
//!
//! Step 4 happens whether the passes succeeded or not.
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{Builder, TempDir};

use super::{OverlayInstaller, PassStats, PathMapper, TreeWalk};
use crate::error::InstallError;
use crate::logging::{Log, PassStatus, session_stamp};
use crate::resources::helpers::fs::is_dir_empty;

/// One source tree taking part in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Root of the layer's files.
    pub source: PathBuf,
    /// Whether files already in staging are appended to rather than replaced.
    pub append: bool,
}

impl Layer {
    /// The base layer, copied verbatim into an empty staging tree.
    #[must_use]
    pub fn base(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            append: false,
        }
    }

    /// An overlay layer, appended onto what earlier layers staged.
    #[must_use]
    pub fn overlay(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            append: true,
        }
    }

    fn label(&self) -> String {
        let name = self.source.file_name().map_or_else(
            || self.source.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        if self.append {
            format!("stage overlay {name}")
        } else {
            format!("stage base {name}")
        }
    }
}

/// Result of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Backup root, if any backup was written to it.
    pub backup: Option<PathBuf>,
    /// Counters of the destination pass.
    pub stats: PassStats,
}

/// A configured install run.
///
/// # Examples
///
/// ```no_run
/// use dotfiles_overlay::logging::Logger;
/// use dotfiles_overlay::overlay::InstallSession;
///
/// let log = Logger::new("install");
/// let report = InstallSession::new("/repo/common", "/home/u", &log)
///     .overlay("/repo/linux")
///     .work_dir("/repo")
///     .run()?;
/// println!("{}", report.stats.summary(false));
/// # Ok::<(), dotfiles_overlay::error::InstallError>(())
/// ```
pub struct InstallSession<'a> {
    layers: Vec<Layer>,
    destination: PathBuf,
    work_dir: PathBuf,
    backup_dir: Option<PathBuf>,
    mapper: PathMapper,
    dry_run: bool,
    log: &'a dyn Log,
}

impl std::fmt::Debug for InstallSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallSession")
            .field("layers", &self.layers)
            .field("destination", &self.destination)
            .field("work_dir", &self.work_dir)
            .field("backup_dir", &self.backup_dir)
            .field("mapper", &self.mapper)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl<'a> InstallSession<'a> {
    /// Create a session installing `base` into `destination`.
    ///
    /// Staging and backups go to the system temp dir until
    /// [`work_dir`](Self::work_dir) says otherwise.
    #[must_use]
    pub fn new(
        base: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        log: &'a dyn Log,
    ) -> Self {
        Self {
            layers: vec![Layer::base(base)],
            destination: destination.into(),
            work_dir: std::env::temp_dir(),
            backup_dir: None,
            mapper: PathMapper::default(),
            dry_run: false,
            log,
        }
    }

    /// Add an overlay after the layers added so far.
    #[must_use]
    pub fn overlay(mut self, source: impl Into<PathBuf>) -> Self {
        self.layers.push(Layer::overlay(source));
        self
    }

    /// Add several overlays, in order.
    #[must_use]
    pub fn overlays<I, P>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.layers
            .extend(sources.into_iter().map(Layer::overlay));
        self
    }

    /// Directory in which staging and temporary backup dirs are created.
    #[must_use]
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Keep backups under a fixed directory instead of a fresh one.
    #[must_use]
    pub fn backup_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.backup_dir = dir;
        self
    }

    /// Use `mapper` for destination paths.
    #[must_use]
    pub const fn mapper(mut self, mapper: PathMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Plan the destination pass without writing to the destination.
    ///
    /// Staging still happens, since the plan is computed from it.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Layers in application order, base first.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Run every pass.
    ///
    /// # Errors
    ///
    /// Returns the first error of any pass (most notably
    /// [`InstallError::BackupConflict`]), or an error creating or removing
    /// the session directories.  Staging is removed and backups kept in
    /// every case.
    pub fn run(&self) -> Result<SessionReport, InstallError> {
        let stamp = session_stamp();
        let staging = Builder::new()
            .prefix(&format!("staging_{stamp}_"))
            .tempdir_in(&self.work_dir)
            .map_err(|e| InstallError::io("create staging directory in", &self.work_dir, e))?;
        let backup = BackupRoot::acquire(self.backup_dir.as_deref(), &self.work_dir, &stamp)?;
        self.log
            .debug(&format!("staging in {}", staging.path().display()));

        let outcome = self.run_passes(staging.path(), backup.path());

        let staging_path = staging.path().to_path_buf();
        let cleanup = staging
            .close()
            .map_err(|e| InstallError::io("remove staging directory", &staging_path, e));
        let kept = backup.release(self.log, outcome.is_err());

        let stats = outcome?;
        cleanup?;
        Ok(SessionReport {
            backup: kept?,
            stats,
        })
    }

    fn run_passes(&self, staging: &Path, backup: &Path) -> Result<PassStats, InstallError> {
        let stager = OverlayInstaller::new(self.mapper, self.log);
        for layer in &self.layers {
            self.log.stage(&format!("Staging {}", layer.source.display()));
            Self::run_pass(self.log, &layer.label(), &layer.source, false, || {
                stager.install(&layer.source, staging, None, layer.append, false)
            })?;
        }

        self.log
            .stage(&format!("Installing into {}", self.destination.display()));
        let installer = OverlayInstaller::new(self.mapper, self.log).dry_run(self.dry_run);
        Self::run_pass(self.log, "install destination", staging, self.dry_run, || {
            installer.install(staging, &self.destination, Some(backup), false, true)
        })
    }

    fn run_pass(
        log: &dyn Log,
        name: &str,
        source: &Path,
        dry_run: bool,
        pass: impl FnOnce() -> Result<PassStats, InstallError>,
    ) -> Result<PassStats, InstallError> {
        match pass() {
            Ok(stats) => {
                if !source.is_dir() {
                    log.record_pass(name, PassStatus::Skipped, Some("source does not exist"));
                } else if dry_run {
                    log.record_pass(name, PassStatus::DryRun, Some(&stats.summary(true)));
                } else {
                    log.record_pass(name, PassStatus::Ok, Some(&stats.summary(false)));
                }
                Ok(stats)
            }
            Err(e) => {
                log.record_pass(name, PassStatus::Failed, Some(&e.to_string()));
                Err(e)
            }
        }
    }
}

/// Where a session's backups go.
enum BackupRoot {
    /// Fresh `backup_<stamp>_*` dir; deleted on drop unless kept.
    Temporary(TempDir),
    /// User-chosen dir; `created` when this session made it, `existing`
    /// lists the files it already held.
    Persistent {
        path: PathBuf,
        created: bool,
        existing: BTreeSet<PathBuf>,
    },
}

impl BackupRoot {
    fn acquire(
        configured: Option<&Path>,
        work_dir: &Path,
        stamp: &str,
    ) -> Result<Self, InstallError> {
        if let Some(path) = configured {
            let created = !path.exists();
            fs::create_dir_all(path)
                .map_err(|e| InstallError::io("create backup directory", path, e))?;
            let existing = TreeWalk::new(path).collect::<Result<_, _>>()?;
            return Ok(Self::Persistent {
                path: path.to_path_buf(),
                created,
                existing,
            });
        }
        Builder::new()
            .prefix(&format!("backup_{stamp}_"))
            .tempdir_in(work_dir)
            .map(Self::Temporary)
            .map_err(|e| InstallError::io("create backup directory in", work_dir, e))
    }

    fn path(&self) -> &Path {
        match self {
            Self::Temporary(dir) => dir.path(),
            Self::Persistent { path, .. } => path,
        }
    }

    /// Return `true` if this session wrote any file into the root.
    fn has_new_backups(&self) -> Result<bool, InstallError> {
        match self {
            Self::Temporary(dir) => Ok(!is_dir_empty(dir.path())?),
            Self::Persistent { path, existing, .. } => {
                for file in TreeWalk::new(path) {
                    if !existing.contains(&file?) {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Keep the root without inspecting it.
    fn keep(self) -> PathBuf {
        match self {
            Self::Temporary(dir) => dir.keep(),
            Self::Persistent { path, .. } => path,
        }
    }

    /// Keep the root if this session backed anything up into it, otherwise
    /// remove what the session created; log which it was.
    fn release(self, log: &dyn Log, failed: bool) -> Result<Option<PathBuf>, InstallError> {
        let path = self.path().to_path_buf();
        let wrote = match self.has_new_backups() {
            Ok(wrote) => wrote,
            Err(e) => {
                self.keep();
                return Err(e);
            }
        };

        if wrote {
            let path = self.keep();
            if failed {
                log.warn(&format!("partial backups kept in {}", path.display()));
            } else {
                log.info(&format!("Backups saved to {}", path.display()));
            }
            return Ok(Some(path));
        }

        match self {
            Self::Temporary(dir) => dir
                .close()
                .map_err(|e| InstallError::io("remove backup directory", &path, e))?,
            Self::Persistent { created: true, .. } => fs::remove_dir_all(&path)
                .map_err(|e| InstallError::io("remove backup directory", &path, e))?,
            Self::Persistent { created: false, .. } => {}
        }
        log.info("No backups were made.");
        Ok(None)
    }
}
