//! TOML configuration file parsing.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Load a TOML config file, treating a missing file as empty.
///
/// # Type Parameters
///
/// - `T`: Target type to deserialize into; must accept an empty document
///   when the file is missing.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read, or
/// [`ConfigError::InvalidSyntax`] if it does not match `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = if path.exists() {
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?
    } else {
        String::new()
    };

    toml::from_str(&content).map_err(|e| ConfigError::InvalidSyntax {
        file: path.display().to_string(),
        message: e.message().to_string(),
    })
}
