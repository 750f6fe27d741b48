//! Settings Persistence
//!
//! Ties a [`Config`] to the file it was loaded from. A missing file is not
//! an error: the defaults are used until the first save.

use crate::config::Config;
use crate::error::SettingsResult;
use std::path::{Path, PathBuf};
use tracing::info;

/// Settings bound to a file location
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    path: PathBuf,
    config: Config,
}

impl SettingsPersistence {
    /// Defaults bound to `path`, nothing read or written
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Config::default(),
        }
    }

    /// Load settings from `path`, falling back to defaults if it does not exist
    pub fn load_or_default(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        let config = if path.exists() {
            Config::load_from_file(&path)?
        } else {
            info!("No settings at {}, using defaults", path.display());
            Config::default()
        };
        Ok(Self { path, config })
    }

    /// Load settings from the default location
    pub fn load_default() -> SettingsResult<Self> {
        Self::load_or_default(Config::default_path()?)
    }

    /// Write default settings to `path`
    ///
    /// An existing file is left untouched unless `overwrite` is set. Returns
    /// whether a file was written.
    pub fn init(path: impl Into<PathBuf>, overwrite: bool) -> SettingsResult<bool> {
        let persistence = Self::new(path);
        if persistence.path.exists() && !overwrite {
            info!(
                "Settings already exist at {}, leaving them",
                persistence.path.display()
            );
            return Ok(false);
        }
        persistence.save()?;
        Ok(true)
    }

    /// Save settings back to their file
    pub fn save(&self) -> SettingsResult<()> {
        self.config.save_to_file(&self.path)
    }

    /// File the settings are bound to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get reference to config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable reference to config
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        self.config.validate()
    }
}
