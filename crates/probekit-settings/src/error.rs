//! Error types for the settings crate.
//!
//! This module provides structured error types for loading, saving and
//! validating persisted settings.

use probekit_scan::ParameterError;
use std::io;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file has an extension other than `.json` or `.toml`.
    #[error("Unsupported settings format: {0}")]
    UnsupportedFormat(String),

    /// A setting value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// The platform configuration directory could not be resolved.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    /// The probe configuration failed validation.
    #[error("Probe config error: {0}")]
    Probe(#[from] probekit_core::ConfigError),

    /// A default scan area failed validation.
    #[error("Scan defaults error: {0}")]
    Scan(#[from] ParameterError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
