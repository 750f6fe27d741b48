//! Scan pattern planning
//!
//! Computes the ordered sample coordinates for a scan. Surface scans raster
//! the rectangle row by row in a serpentine order: even rows ascend in X,
//! odd rows descend. Rotary scans are angle-major: every linear position is
//! visited at one angle before the next angle starts.
//!
//! Coordinates are always computed as `start + k * spacing` so no drift
//! accumulates along long rows.

use crate::error::ParameterResult;
use crate::params::{RotaryScanParameters, ScanParameters, MAX_SCAN_POINTS};
use probekit_core::LinearAxis;
use tracing::debug;

/// One planned surface sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedPoint {
    /// 1-based visitation index
    pub index: u32,
    /// Target X
    pub x: f64,
    /// Target Y
    pub y: f64,
    /// Zero-based row the point belongs to
    pub row: usize,
}

/// One planned rotary sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedRotaryPoint {
    /// 1-based visitation index
    pub index: u32,
    /// Rotation angle in degrees
    pub angle: f64,
    /// Position along the linear axis
    pub position: f64,
    /// Target X (the linear position, or 0 when scanning along Y)
    pub x: f64,
    /// Target Y (the linear position, or 0 when scanning along X)
    pub y: f64,
}

/// Ordered visitation plan for a surface scan
#[derive(Debug, Clone)]
pub struct SurfacePlan {
    /// Columns per row
    pub x_count: usize,
    /// Number of rows
    pub y_count: usize,
    /// Samples in visitation order
    pub points: Vec<PlannedPoint>,
}

/// Ordered visitation plan for a rotary scan
#[derive(Debug, Clone)]
pub struct RotaryPlan {
    /// Number of angles
    pub num_angles: usize,
    /// Positions per angle
    pub linear_count: usize,
    /// Samples in visitation order
    pub points: Vec<PlannedRotaryPoint>,
}

impl RotaryPlan {
    /// Angles visited, in order
    pub fn angles(&self) -> impl Iterator<Item = f64> + '_ {
        self.points
            .chunks(self.linear_count.max(1))
            .filter_map(|chunk| chunk.first().map(|p| p.angle))
    }
}

/// Pattern planner bound to a point cap
#[derive(Debug, Clone, Copy)]
pub struct ScanPlanner {
    max_points: u64,
}

impl Default for ScanPlanner {
    fn default() -> Self {
        Self {
            max_points: MAX_SCAN_POINTS,
        }
    }
}

impl ScanPlanner {
    /// Create a planner with the default 10,000 point cap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a planner with a lower point cap
    ///
    /// Caps above [`MAX_SCAN_POINTS`] are clamped to it.
    pub fn with_max_points(max_points: u64) -> Self {
        Self {
            max_points: max_points.min(MAX_SCAN_POINTS),
        }
    }

    /// The point cap this planner enforces
    pub fn max_points(&self) -> u64 {
        self.max_points
    }

    /// Plan a serpentine surface raster
    pub fn surface(&self, params: &ScanParameters) -> ParameterResult<SurfacePlan> {
        params.validate_with_cap(self.max_points)?;

        let x_count = params.x_count() as usize;
        let y_count = params.y_count() as usize;
        let mut points = Vec::with_capacity(x_count.checked_mul(y_count).unwrap_or(0));

        for row in 0..y_count {
            let y = (params.start_y + row as f64 * params.spacing).min(params.end_y);
            let reversed = row % 2 == 1;

            for col in 0..x_count {
                let x_index = if reversed { x_count - 1 - col } else { col };
                let x = (params.start_x + x_index as f64 * params.spacing).min(params.end_x);
                points.push(PlannedPoint {
                    index: (points.len() + 1) as u32,
                    x,
                    y,
                    row,
                });
            }
        }

        debug!(
            "Planned surface scan: {}x{} = {} points",
            x_count,
            y_count,
            points.len()
        );

        Ok(SurfacePlan {
            x_count,
            y_count,
            points,
        })
    }

    /// Plan an angle-major rotary sweep
    pub fn rotary(&self, params: &RotaryScanParameters) -> ParameterResult<RotaryPlan> {
        params.validate_with_cap(self.max_points)?;

        let num_angles = params.num_angles() as usize;
        let linear_count = params.linear_count() as usize;
        let mut points = Vec::with_capacity(num_angles.checked_mul(linear_count).unwrap_or(0));

        for angle_index in 0..num_angles {
            let angle = angle_index as f64 * params.angle_step;

            for k in 0..linear_count {
                let position = (params.start + k as f64 * params.spacing).min(params.end);
                let (x, y) = match params.linear_axis {
                    LinearAxis::X => (position, 0.0),
                    LinearAxis::Y => (0.0, position),
                };
                points.push(PlannedRotaryPoint {
                    index: (points.len() + 1) as u32,
                    angle,
                    position,
                    x,
                    y,
                });
            }
        }

        debug!(
            "Planned rotary scan: {} angles x {} positions = {} points",
            num_angles,
            linear_count,
            points.len()
        );

        Ok(RotaryPlan {
            num_angles,
            linear_count,
            points,
        })
    }
}
