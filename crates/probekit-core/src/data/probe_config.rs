//! Probe configuration
//!
//! Every generated program is parameterised by these values. They are
//! persisted by the settings layer and edited by the operator.

use crate::error::ConfigError;
use crate::units::MeasurementSystem;
use serde::{Deserialize, Serialize};

/// Touch-probe settings used by every generated program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProbeConfig {
    /// Thickness of the touch plate
    pub plate_thickness: f64,
    /// Probe feed speed (move and plunge)
    pub probe_speed: f64,
    /// Clearance above the zeroed reference for travel moves
    pub safe_z: f64,
    /// Clearance above the zeroed reference between samples
    pub retract_distance: f64,
    /// Controller input channel the probe is wired to
    pub input_number: u32,
    /// Deepest Z the probe may travel before giving up (negative)
    pub max_probe_depth: f64,
    /// Size of the corner block used for XYZ corner probing
    pub corner_block_size: f64,
    /// Unit the controller is configured for
    pub units: MeasurementSystem,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            plate_thickness: 0.5,
            probe_speed: 1.0,
            safe_z: 0.5,
            retract_distance: 0.125,
            input_number: 7,
            max_probe_depth: -2.0,
            corner_block_size: 2.0,
            units: MeasurementSystem::Imperial,
        }
    }
}

impl ProbeConfig {
    /// Validate the configuration
    ///
    /// Speed and both clearances must be positive, the probe depth must point
    /// down and every value must be finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("plate_thickness", self.plate_thickness),
            ("probe_speed", self.probe_speed),
            ("safe_z", self.safe_z),
            ("retract_distance", self.retract_distance),
            ("max_probe_depth", self.max_probe_depth),
            ("corner_block_size", self.corner_block_size),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::invalid(name, "must be a finite number"));
            }
        }

        if self.probe_speed <= 0.0 {
            return Err(ConfigError::invalid("probe_speed", "must be > 0"));
        }
        if self.safe_z <= 0.0 {
            return Err(ConfigError::invalid("safe_z", "must be > 0"));
        }
        if self.retract_distance <= 0.0 {
            return Err(ConfigError::invalid("retract_distance", "must be > 0"));
        }
        if self.max_probe_depth >= 0.0 {
            return Err(ConfigError::invalid("max_probe_depth", "must be < 0"));
        }
        if self.input_number == 0 {
            return Err(ConfigError::invalid("input_number", "must be >= 1"));
        }
        if self.plate_thickness < 0.0 {
            return Err(ConfigError::invalid("plate_thickness", "must be >= 0"));
        }
        if self.corner_block_size < 0.0 {
            return Err(ConfigError::invalid("corner_block_size", "must be >= 0"));
        }

        Ok(())
    }
}
