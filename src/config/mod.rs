//! Layer configuration: which directories of the repository get installed.
pub mod layers;
pub mod toml_loader;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::overlay::{DEFAULT_MARKER, PathMapper};
use crate::platform::Platform;

/// Location of the layer file, relative to the repository root.
pub const LAYERS_FILE: &str = "conf/layers.toml";

/// Resolved layer list for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Repository root every layer path is relative to.
    pub root: PathBuf,
    /// Base layer directory.
    pub base: PathBuf,
    /// Overlay directories that apply to the platform, in order.
    pub overlays: Vec<PathBuf>,
    /// Marker prepended to the first segment of installed paths.
    pub marker: char,
}

impl Config {
    /// Load `conf/layers.toml` under `root` and resolve it for `platform`.
    ///
    /// A missing file means base `common` plus one overlay named after the
    /// platform.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(root: &Path, platform: &Platform) -> Result<Self, ConfigError> {
        let file: layers::LayersFile = toml_loader::load_config(&root.join(LAYERS_FILE))?;
        Ok(Self {
            root: root.to_path_buf(),
            base: root.join(file.base_or_default()),
            overlays: file
                .overlays_for(platform)
                .into_iter()
                .map(|p| root.join(p))
                .collect(),
            marker: file.marker.unwrap_or(DEFAULT_MARKER),
        })
    }

    /// Path mapper configured with this config's marker.
    #[must_use]
    pub const fn mapper(&self) -> PathMapper {
        PathMapper::new(self.marker)
    }
}
