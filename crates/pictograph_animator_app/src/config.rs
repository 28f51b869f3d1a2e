// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animator configuration.
//!
//! Stored as RON in [`CONFIG_FILE_NAME`]. Every section and field has a
//! default, so a partial file (or no file at all) is valid.

use pictograph_animator_core::EngineConfig;
use pictograph_animator_library::CatalogConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "animator.ron";

/// Errors reading or writing the configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// Configuration path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File is not valid RON for this schema
    #[error("Invalid configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] ron::Error),
}

/// Frame loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Frames per second of the `play` command
    pub fps: u32,
    /// Beats per second
    pub speed: f32,
    /// Wrap around at the end of the timeline
    pub looping: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            fps: 60,
            speed: 1.0,
            looping: true,
        }
    }
}

/// Sequence library settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Catalog root directory
    pub root: PathBuf,
    /// Substitute a placeholder for undecodable sequences
    pub placeholder_on_failure: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("dictionary"),
            placeholder_on_failure: true,
        }
    }
}

impl LibrarySettings {
    /// Catalog configuration derived from these settings
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            placeholder_on_failure: self.placeholder_on_failure,
        }
    }
}

/// Complete animator configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Interpolation engine
    pub engine: EngineConfig,
    /// Frame loop
    pub playback: PlaybackSettings,
    /// Sequence library
    pub library: LibrarySettings,
}

impl AnimatorConfig {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No configuration at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ron::from_str(&text)?;
        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Write to `path` as pretty RON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pictograph_animator_core::PositionStrategy;

    #[test]
    fn test_default_config() {
        let config = AnimatorConfig::default();
        assert_eq!(config.playback.fps, 60);
        assert_eq!(config.library.root, PathBuf::from("dictionary"));
        assert!(config.library.catalog_config().placeholder_on_failure);
        assert_eq!(config.engine.position, PositionStrategy::default());
    }

    #[test]
    fn test_partial_file() {
        let config: AnimatorConfig = ron::from_str(
            "(engine: (position: Grid(scale: 100.0)), playback: (speed: 2.0))",
        )
        .unwrap();
        assert_eq!(config.engine.position, PositionStrategy::Grid { scale: 100.0 });
        assert_eq!(config.playback.speed, 2.0);
        assert_eq!(config.playback.fps, 60);
        assert!(config.library.placeholder_on_failure);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        assert_eq!(AnimatorConfig::load(&path).unwrap(), AnimatorConfig::default());

        let mut config = AnimatorConfig::default();
        config.playback.looping = false;
        config.library.root = PathBuf::from("sequences");
        config.save(&path).unwrap();
        assert_eq!(AnimatorConfig::load(&path).unwrap(), config);

        fs::write(&path, "(playback: (fps: \"fast\"))").unwrap();
        assert!(matches!(AnimatorConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
