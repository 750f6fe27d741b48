//! Configuration and settings management for ProbeKit
//!
//! Provides settings file handling and validation. Supports JSON and TOML
//! file formats stored in the platform configuration directory.
//!
//! Settings are organized into sections:
//! - Probe settings used by every generated program
//! - Default surface scan area
//! - Default rotary sweep
//! - Point cap applied when planning

use crate::error::{SettingsError, SettingsResult};
pub use probekit_core::units::MeasurementSystem;
use probekit_core::ProbeConfig;
use probekit_scan::{RotaryScanParameters, ScanParameters, MAX_SCAN_POINTS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Application directory under the platform config directory
pub const APP_DIR: &str = "probekit";

/// Default settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// On-disk settings format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    /// `.json`
    Json,
    /// `.toml`
    Toml,
}

impl SettingsFormat {
    /// Format for a path, by extension
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

fn default_max_points() -> u64 {
    MAX_SCAN_POINTS
}

/// Complete application settings
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Hard cap on planned points
    #[serde(default = "default_max_points")]
    pub max_points: u64,
    /// Probe settings
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Default surface scan area
    #[serde(default)]
    pub surface: ScanParameters,
    /// Default rotary sweep
    #[serde(default)]
    pub rotary: RotaryScanParameters,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_points: MAX_SCAN_POINTS,
            probe: ProbeConfig::default(),
            surface: ScanParameters::default(),
            rotary: RotaryScanParameters::default(),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings location: `<config dir>/probekit/settings.json`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no platform config directory".to_string())
        })?;
        Ok(dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Parse settings text in the given format and validate it
    pub fn from_str_as(content: &str, format: SettingsFormat) -> SettingsResult<Self> {
        let config: Self = match format {
            SettingsFormat::Json => serde_json::from_str(content)?,
            SettingsFormat::Toml => toml::from_str(content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Render settings in the given format
    pub fn to_string_as(&self, format: SettingsFormat) -> SettingsResult<String> {
        Ok(match format {
            SettingsFormat::Json => serde_json::to_string_pretty(self)?,
            SettingsFormat::Toml => toml::to_string_pretty(self)?,
        })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = SettingsFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_str_as(&content, format)?;
        debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    ///
    /// Missing parent directories are created.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = self.to_string_as(SettingsFormat::from_path(path)?)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Validate every section
    pub fn validate(&self) -> SettingsResult<()> {
        if self.max_points == 0 || self.max_points > MAX_SCAN_POINTS {
            return Err(SettingsError::InvalidSetting {
                key: "maxPoints".to_string(),
                reason: format!("must be between 1 and {}", MAX_SCAN_POINTS),
            });
        }

        self.probe.validate()?;
        self.surface.validate_with_cap(self.max_points)?;
        self.rotary.validate_with_cap(self.max_points)?;
        Ok(())
    }
}
