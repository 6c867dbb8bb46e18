//! Schema of `conf/layers.toml`.
use serde::Deserialize;

use crate::platform::Platform;

/// Base layer used when the file does not name one.
pub const DEFAULT_BASE: &str = "common";

/// Top-level document of `conf/layers.toml`.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LayersFile {
    /// Base layer directory, relative to the repository root.
    #[serde(default)]
    pub base: Option<String>,
    /// Marker prepended to the first segment of installed paths.
    #[serde(default)]
    pub marker: Option<char>,
    /// Overlay layers in application order.
    #[serde(default, rename = "overlay")]
    pub overlays: Vec<OverlayEntry>,
}

/// One `[[overlay]]` table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OverlayEntry {
    /// Overlay directory, relative to the repository root.
    pub path: String,
    /// Platforms the overlay applies to; empty means all of them.
    #[serde(default)]
    pub platforms: Vec<String>,
}

impl LayersFile {
    /// Return `true` if the document declares nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.marker.is_none() && self.overlays.is_empty()
    }

    /// Base directory name, falling back to [`DEFAULT_BASE`].
    #[must_use]
    pub fn base_or_default(&self) -> &str {
        self.base.as_deref().unwrap_or(DEFAULT_BASE)
    }

    /// Overlay paths that apply to `platform`, in declared order.
    ///
    /// An empty document yields a single overlay named after the platform.
    #[must_use]
    pub fn overlays_for(&self, platform: &Platform) -> Vec<String> {
        if self.is_empty() {
            return vec![platform.os.layer_name().to_string()];
        }
        self.overlays
            .iter()
            .filter(|entry| platform.matches(&entry.platforms))
            .map(|entry| entry.path.clone())
            .collect()
    }
}
