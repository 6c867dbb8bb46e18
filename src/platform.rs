//! Host platform detection used to pick platform overlay layers.
use std::fmt;

/// Detected operating system family.
///
/// The [`Display`](fmt::Display) form is the conventional name of the
/// platform overlay directory (`linux/`, `darwin/`, `windows/`, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux distributions.
    Linux,
    /// macOS.
    Darwin,
    /// Microsoft Windows.
    Windows,
    /// FreeBSD.
    FreeBsd,
    /// Any other target; overlays can still be selected explicitly.
    Other,
}

impl Os {
    /// Name used for the platform's overlay directory and for `platforms`
    /// filters in `conf/layers.toml`.
    #[must_use]
    pub const fn layer_name(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
            Self::Windows => "windows",
            Self::FreeBsd => "freebsd",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.layer_name())
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Operating system family.
    pub os: Os,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            os: Self::detect_os(),
        }
    }

    /// Create a platform with an explicit OS (for tests and overrides).
    #[must_use]
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// Return `true` if a layer restricted to `platforms` applies here.
    ///
    /// An empty restriction list applies everywhere; names are compared
    /// case-insensitively.
    #[must_use]
    pub fn matches(&self, platforms: &[String]) -> bool {
        platforms.is_empty()
            || platforms
                .iter()
                .any(|p| p.eq_ignore_ascii_case(self.os.layer_name()))
    }

    const fn detect_os() -> Os {
        if cfg!(target_os = "linux") {
            Os::Linux
        } else if cfg!(target_os = "macos") {
            Os::Darwin
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(target_os = "freebsd") {
            Os::FreeBsd
        } else {
            Os::Other
        }
    }
}
