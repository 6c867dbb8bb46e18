//! Enumeration of the regular files under a source root.
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::InstallError;

/// Lazy traversal yielding the path of every regular file under a root,
/// relative to that root.
///
/// Each file is yielded exactly once, in no particular order.  Symbolic
/// links are neither followed nor reported.  A root that is missing or is
/// not a directory yields nothing.
///
/// # Examples
///
/// ```
/// use dotfiles_overlay::overlay::TreeWalk;
///
/// let mut walk = TreeWalk::new("/nonexistent/layer");
/// assert!(walk.next().is_none());
/// ```
#[derive(Debug)]
pub struct TreeWalk {
    root: PathBuf,
    inner: Option<walkdir::IntoIter>,
}

impl TreeWalk {
    /// Start a fresh traversal of `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let inner = root.is_dir().then(|| {
            WalkDir::new(&root)
                .follow_links(false)
                .min_depth(1)
                .into_iter()
        });
        Self { root, inner }
    }
}

impl Iterator for TreeWalk {
    type Item = Result<PathBuf, InstallError>;

    fn next(&mut self) -> Option<Self::Item> {
        let inner = self.inner.as_mut()?;
        loop {
            let entry = match inner.next()? {
                Ok(entry) => entry,
                Err(source) => {
                    return Some(Err(InstallError::Walk {
                        root: self.root.clone(),
                        source,
                    }));
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| entry.path().to_path_buf());
            return Some(Ok(relative));
        }
    }
}
