//! Log file location and the UTC timestamp formats used in logs and
//! session directory names.
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Run header in the log file (`2026-10-16 09:30:00`).
pub(super) const HEADER_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Per-line prefix in the log file (`09:30:00`).
pub(super) const LINE_FORMAT: &str = "%H:%M:%S";
/// Session directory names (`staging_20261016T093000Z_…`); sorts by time
/// and contains no characters that are invalid in Windows file names.
pub(crate) const STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Current UTC time rendered with `format`.
pub(crate) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}

/// Current UTC time as a directory-name stamp.
pub(crate) fn session_stamp() -> String {
    utc_now(STAMP_FORMAT)
}

/// Cache root: `$XDG_CACHE_HOME`, else `<home>/.cache`, else `./.cache`.
/// Empty values count as unset.
fn cache_root(xdg_cache: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let set = |v: &OsString| !v.is_empty();
    xdg_cache.filter(set).map(PathBuf::from).unwrap_or_else(|| {
        home.filter(set)
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
            .join(".cache")
    })
}

/// Return `<cache root>/dotfiles/<command>.log`, creating the directory.
///
/// `None` if the directory cannot be created; logging then stays
/// console-only.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let home = env::var_os("HOME").or_else(|| env::var_os("USERPROFILE"));
    let dir = cache_root(env::var_os("XDG_CACHE_HOME"), home).join("dotfiles");
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}
