//! Per-file install primitive: observe the destination, decide, apply.
//!
//! The decision ([`InstallAction::decide`]) is a pure function of what was
//! observed; [`FileInstaller`] does the observing and the writing.
pub mod file;
pub mod helpers;

pub use file::FileInstaller;

/// Observed state of a destination file relative to its source.
///
/// # Examples
///
/// ```
/// use dotfiles_overlay::resources::FileState;
///
/// assert_ne!(FileState::Missing, FileState::Identical);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// The destination does not exist.
    Missing,
    /// The destination exists and is byte-identical to the source.
    Identical,
    /// The destination exists with different content.
    Differs,
}

/// What installing one file does (or would do) to its destination.
///
/// # Examples
///
/// ```
/// use dotfiles_overlay::resources::{FileState, InstallAction};
///
/// let action = InstallAction::decide(FileState::Differs, false, Some(false));
/// assert_eq!(action, InstallAction::BackupThenOverwrite);
/// assert!(action.writes());
///
/// assert_eq!(
///     InstallAction::decide(FileState::Identical, false, Some(false)),
///     InstallAction::Skip,
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallAction {
    /// Destination was absent; source copied into place.
    Install,
    /// Destination already byte-identical; nothing written.
    Skip,
    /// Destination differed and no backup was configured; replaced.
    Overwrite,
    /// Destination differed; backed up, then replaced.
    BackupThenOverwrite,
    /// Source content appended to the existing destination content.
    Append,
    /// A backup already exists at the configured backup path.
    BackupConflict,
}

impl InstallAction {
    /// Decide the action for one file.
    ///
    /// `backup_exists` is `None` when no backup path is configured, otherwise
    /// whether a file already exists at that path.  Nothing else influences
    /// the outcome.
    #[must_use]
    pub const fn decide(state: FileState, append: bool, backup_exists: Option<bool>) -> Self {
        match (state, backup_exists) {
            (FileState::Missing, _) => Self::Install,
            (FileState::Identical, _) => Self::Skip,
            (FileState::Differs, Some(true)) => Self::BackupConflict,
            (FileState::Differs, _) if append => Self::Append,
            (FileState::Differs, Some(false)) => Self::BackupThenOverwrite,
            (FileState::Differs, None) => Self::Overwrite,
        }
    }

    /// Return `true` if carrying out the action writes to the destination.
    #[must_use]
    pub const fn writes(self) -> bool {
        !matches!(self, Self::Skip | Self::BackupConflict)
    }

    /// Verb used in log lines (`"install"`, `"append"`, …).
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Skip => "skip",
            Self::Overwrite => "overwrite",
            Self::BackupThenOverwrite => "back up and overwrite",
            Self::Append => "append to",
            Self::BackupConflict => "refuse (backup exists)",
        }
    }
}
