//! Scan parameters and their validation
//!
//! Point counts per axis are `floor((end - start) / spacing) + 1`. A tiny
//! tolerance is added before flooring so that ranges such as `0.3 / 0.1`
//! keep their final row despite binary representation error.

use crate::error::{ParameterError, ParameterResult};
use probekit_core::{LinearAxis, RotaryAxis};
use serde::{Deserialize, Serialize};

/// Hard cap on the number of points a single scan may visit
pub const MAX_SCAN_POINTS: u64 = 10_000;

const COUNT_TOLERANCE: f64 = 1e-9;

/// Number of samples along one axis, saturating on absurd ranges
pub(crate) fn axis_point_count(start: f64, end: f64, spacing: f64) -> u64 {
    let steps = ((end - start) / spacing + COUNT_TOLERANCE).floor();
    (steps as u64).saturating_add(1)
}

fn check_finite(name: &str, value: f64) -> ParameterResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::NonFinite {
            name: name.to_string(),
        })
    }
}

fn check_range(axis: &str, start: f64, end: f64) -> ParameterResult<()> {
    if end > start {
        Ok(())
    } else {
        Err(ParameterError::EmptyRange {
            axis: axis.to_string(),
            start,
            end,
        })
    }
}

fn check_spacing(spacing: f64) -> ParameterResult<()> {
    if spacing > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::NonPositiveSpacing(spacing))
    }
}

fn check_cap(total: u64, max: u64) -> ParameterResult<()> {
    let max = max.min(MAX_SCAN_POINTS);
    if total > max {
        Err(ParameterError::TooManyPoints { total, max })
    } else {
        Ok(())
    }
}

/// Parameters for a rectangular surface scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanParameters {
    /// X coordinate of the first column
    pub start_x: f64,
    /// Y coordinate of the first row
    pub start_y: f64,
    /// X limit of the scan area
    pub end_x: f64,
    /// Y limit of the scan area
    pub end_y: f64,
    /// Distance between neighbouring samples on both axes
    pub spacing: f64,
}

impl Default for ScanParameters {
    fn default() -> Self {
        Self {
            start_x: 0.0,
            start_y: 0.0,
            end_x: 10.0,
            end_y: 10.0,
            spacing: 1.0,
        }
    }
}

impl ScanParameters {
    /// Number of columns
    pub fn x_count(&self) -> u64 {
        axis_point_count(self.start_x, self.end_x, self.spacing)
    }

    /// Number of rows
    pub fn y_count(&self) -> u64 {
        axis_point_count(self.start_y, self.end_y, self.spacing)
    }

    /// Total number of samples in the grid
    pub fn total_points(&self) -> u64 {
        self.x_count()
            .checked_mul(self.y_count())
            .unwrap_or(u64::MAX)
    }

    /// Validate against the default point cap
    pub fn validate(&self) -> ParameterResult<()> {
        self.validate_with_cap(MAX_SCAN_POINTS)
    }

    /// Validate against a caller-supplied point cap, never above [`MAX_SCAN_POINTS`]
    pub fn validate_with_cap(&self, max_points: u64) -> ParameterResult<()> {
        check_finite("start_x", self.start_x)?;
        check_finite("start_y", self.start_y)?;
        check_finite("end_x", self.end_x)?;
        check_finite("end_y", self.end_y)?;
        check_finite("spacing", self.spacing)?;
        check_range("X", self.start_x, self.end_x)?;
        check_range("Y", self.start_y, self.end_y)?;
        check_spacing(self.spacing)?;
        check_cap(self.total_points(), max_points)
    }
}

/// Parameters for a rotary (cylinder) scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotaryScanParameters {
    /// First position along the linear axis
    pub start: f64,
    /// Limit along the linear axis
    pub end: f64,
    /// Distance between samples along the linear axis
    pub spacing: f64,
    /// Degrees between successive angles
    pub angle_step: f64,
    /// Axis the cylinder lies along
    pub linear_axis: LinearAxis,
    /// Axis that rotates the cylinder
    pub rotary_axis: RotaryAxis,
    /// Prompt the operator to rotate by hand instead of driving the axis
    pub manual_rotation: bool,
}

impl Default for RotaryScanParameters {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 10.0,
            spacing: 1.0,
            angle_step: 45.0,
            linear_axis: LinearAxis::X,
            rotary_axis: RotaryAxis::A,
            manual_rotation: false,
        }
    }
}

impl RotaryScanParameters {
    /// Number of angles visited: `floor(360 / angle_step)`
    pub fn num_angles(&self) -> u64 {
        ((360.0 / self.angle_step) + COUNT_TOLERANCE).floor() as u64
    }

    /// Number of positions along the linear axis
    pub fn linear_count(&self) -> u64 {
        axis_point_count(self.start, self.end, self.spacing)
    }

    /// Total number of samples in the sweep
    pub fn total_points(&self) -> u64 {
        self.num_angles()
            .checked_mul(self.linear_count())
            .unwrap_or(u64::MAX)
    }

    /// Validate against the default point cap
    pub fn validate(&self) -> ParameterResult<()> {
        self.validate_with_cap(MAX_SCAN_POINTS)
    }

    /// Validate against a caller-supplied point cap, never above [`MAX_SCAN_POINTS`]
    pub fn validate_with_cap(&self, max_points: u64) -> ParameterResult<()> {
        check_finite("start", self.start)?;
        check_finite("end", self.end)?;
        check_finite("spacing", self.spacing)?;
        check_finite("angle_step", self.angle_step)?;
        check_range(&self.linear_axis.to_string(), self.start, self.end)?;
        check_spacing(self.spacing)?;
        if self.angle_step <= 0.0 || self.angle_step > 360.0 {
            return Err(ParameterError::InvalidAngleStep(self.angle_step));
        }
        check_cap(self.total_points(), max_points)
    }
}
