//! Mapping of relative source paths onto destination roots.
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::error::InstallError;

/// Marker conventionally used for hidden files.
pub const DEFAULT_MARKER: char = '.';

/// Places relative paths under a root, optionally marking the first segment.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dotfiles_overlay::overlay::PathMapper;
///
/// let mapper = PathMapper::default();
/// let dst = mapper
///     .map(Path::new("vim/colors/x.vim"), Path::new("/home/u"), true)
///     .unwrap();
/// assert_eq!(dst, Path::new("/home/u/.vim/colors/x.vim"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMapper {
    marker: char,
}

impl Default for PathMapper {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl PathMapper {
    /// Create a mapper that prefixes `marker` when asked to.
    #[must_use]
    pub const fn new(marker: char) -> Self {
        Self { marker }
    }

    /// The configured marker character.
    #[must_use]
    pub const fn marker(&self) -> char {
        self.marker
    }

    /// Join `relative` onto `root`; with `add_prefix`, the first segment of
    /// `relative` gains the marker and every other segment is kept as is.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::InvalidPath`] if `relative` is empty, absolute,
    /// or contains a `..` segment.
    pub fn map(
        &self,
        relative: &Path,
        root: &Path,
        add_prefix: bool,
    ) -> Result<PathBuf, InstallError> {
        let invalid = |reason| InstallError::InvalidPath {
            path: relative.to_path_buf(),
            reason,
        };

        if relative.as_os_str().is_empty() {
            return Err(invalid("path is empty"));
        }
        if relative.has_root() || relative.is_absolute() {
            return Err(invalid("path is absolute"));
        }

        let mut mapped = root.to_path_buf();
        let mut first = true;
        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    if first && add_prefix {
                        let mut marked = OsString::from(self.marker.to_string());
                        marked.push(segment);
                        mapped.push(marked);
                    } else {
                        mapped.push(segment);
                    }
                    first = false;
                }
                Component::CurDir => {}
                Component::ParentDir => return Err(invalid("path escapes its root")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("path is absolute"));
                }
            }
        }
        if first {
            return Err(invalid("path is empty"));
        }
        Ok(mapped)
    }
}
