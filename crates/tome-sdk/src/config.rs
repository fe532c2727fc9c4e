use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, LibraryResult};

/// Configuration persisted as `tome.toml` in the library root.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Records per page when the caller does not choose a size.
    pub default_page_size: usize,
    /// Default destination directory for exported payloads.
    pub export_dir: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 5,
            export_dir: PathBuf::from("exports"),
        }
    }
}

impl LibraryConfig {
    /// Load a TOML config file.
    pub fn load(path: &Path) -> LibraryResult<Self> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| LibraryError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Write this config as TOML.
    pub fn save(&self, path: &Path) -> LibraryResult<()> {
        let text = toml::to_string_pretty(self).map_err(|e| LibraryError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Load from `path` when present; otherwise persist and return the
    /// defaults, so a fresh library root always carries its config file.
    pub fn load_or_init(path: &Path) -> LibraryResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();
            config.save(path)?;
            Ok(config)
        }
    }
}
