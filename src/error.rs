//! Domain-specific error types for the overlay installer.
//!
//! Library code returns typed errors ([`InstallError`], [`ConfigError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! InstallError
//! ├── InvalidPath      relative path is empty, absolute or escapes its root
//! ├── BackupConflict   an unconsumed backup already exists (fatal per session)
//! ├── Io               any other filesystem failure during a pass
//! └── Walk             a source tree could not be traversed
//! ConfigError
//! ├── InvalidSyntax    conf/layers.toml failed to parse
//! └── Io               conf/layers.toml could not be read
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by the merge-install engine.
///
/// Every variant is fatal for the session that raised it: the remaining
/// files and passes are abandoned, files already processed stay in place.
#[derive(Error, Debug)]
pub enum InstallError {
    /// A relative path handed to the path mapper cannot be placed under a root.
    #[error("invalid relative path '{}': {reason}", .path.display())]
    InvalidPath {
        /// The offending path.
        path: PathBuf,
        /// Why the path was rejected.
        reason: &'static str,
    },

    /// A backup already exists where the engine was about to write one.
    #[error(
        "backup already exists at {} (refusing to back up {} over it)",
        .backup.display(),
        .destination.display()
    )]
    BackupConflict {
        /// The pre-existing backup file.
        backup: PathBuf,
        /// The destination file that would have been backed up.
        destination: PathBuf,
    },

    /// A filesystem operation failed.
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        /// What the engine was doing (e.g. `"copy to"`, `"read"`).
        action: &'static str,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Traversing a source tree failed part-way.
    #[error("failed to walk {}: {source}", .root.display())]
    Walk {
        /// Root of the traversal.
        root: PathBuf,
        /// Underlying traversal error.
        source: walkdir::Error,
    },
}

impl InstallError {
    /// Build an [`InstallError::Io`] for `path`.
    pub(crate) fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Return `true` for [`InstallError::BackupConflict`].
    #[must_use]
    pub const fn is_backup_conflict(&self) -> bool {
        matches!(self, Self::BackupConflict { .. })
    }
}

/// Errors that arise from loading `conf/layers.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML file contains a syntax or schema error.
    #[error("Invalid TOML in {file}: {message}")]
    InvalidSyntax {
        /// Path of the file that failed to parse.
        file: String,
        /// Parser diagnostic.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },
}
