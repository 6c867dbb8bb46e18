//! File-system helpers shared by the file installer.
//!
//! Every helper reports failures as [`InstallError::Io`] carrying the path
//! that was being touched, so a failed pass names the offending file.
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead as _, BufReader};
use std::path::Path;

use crate::error::InstallError;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), InstallError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| InstallError::io("create directory", parent, e))?;
    }
    Ok(())
}

/// Compare the full byte content of two files.
///
/// Files of different length are unequal without reading them; otherwise
/// both are streamed and compared buffer by buffer.
///
/// # Errors
///
/// Returns an error if either file cannot be opened or read.
pub fn contents_equal(a: &Path, b: &Path) -> Result<bool, InstallError> {
    let file_a = File::open(a).map_err(|e| InstallError::io("open", a, e))?;
    let file_b = File::open(b).map_err(|e| InstallError::io("open", b, e))?;
    let len_a = file_a
        .metadata()
        .map_err(|e| InstallError::io("stat", a, e))?
        .len();
    let len_b = file_b
        .metadata()
        .map_err(|e| InstallError::io("stat", b, e))?
        .len();
    if len_a != len_b {
        return Ok(false);
    }

    let mut reader_a = BufReader::new(file_a);
    let mut reader_b = BufReader::new(file_b);
    loop {
        let buf_a = reader_a
            .fill_buf()
            .map_err(|e| InstallError::io("read", a, e))?;
        let buf_b = reader_b
            .fill_buf()
            .map_err(|e| InstallError::io("read", b, e))?;
        if buf_a.is_empty() || buf_b.is_empty() {
            return Ok(buf_a.is_empty() && buf_b.is_empty());
        }
        let n = buf_a.len().min(buf_b.len());
        if buf_a.get(..n) != buf_b.get(..n) {
            return Ok(false);
        }
        reader_a.consume(n);
        reader_b.consume(n);
    }
}

/// Replace `dst` with a verbatim copy of `src`, creating parents of `dst`.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the copy fails.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), InstallError> {
    ensure_parent_dir(dst)?;
    fs::copy(src, dst).map_err(|e| InstallError::io("copy to", dst, e))?;
    Ok(())
}

/// Append the full content of `src` to the end of `dst`.
///
/// `dst` is created if it does not exist.
///
/// # Errors
///
/// Returns an error if either file cannot be opened or the write fails.
pub fn append_file(src: &Path, dst: &Path) -> Result<(), InstallError> {
    let mut input = File::open(src).map_err(|e| InstallError::io("open", src, e))?;
    let mut output = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dst)
        .map_err(|e| InstallError::io("open for append", dst, e))?;
    io::copy(&mut input, &mut output).map_err(|e| InstallError::io("append to", dst, e))?;
    Ok(())
}

/// Return `true` if `dir` contains no entries.
///
/// # Errors
///
/// Returns an error if `dir` cannot be read.
pub fn is_dir_empty(dir: &Path) -> Result<bool, InstallError> {
    let mut entries = fs::read_dir(dir).map_err(|e| InstallError::io("read directory", dir, e))?;
    Ok(entries.next().is_none())
}
