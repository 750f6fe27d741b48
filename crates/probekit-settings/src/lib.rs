//! ProbeKit Settings Crate
//!
//! Handles persisted probe configuration and the default scan areas offered
//! to the operator.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{Config, SettingsFormat, APP_DIR, SETTINGS_FILE};
pub use error::{SettingsError, SettingsResult};
pub use persistence::SettingsPersistence;
