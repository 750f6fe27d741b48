//! Workpiece models probed by the simulator
//!
//! Heights are machine Z coordinates. `None` means the probe finds nothing
//! at that location.

/// Height of the workpiece under the probe
pub trait SurfaceModel: Send + Sync {
    /// Machine Z of the surface at the given axis positions
    fn height_at(&self, x: f64, y: f64, a: f64, b: f64) -> Option<f64>;
}

impl<F> SurfaceModel for F
where
    F: Fn(f64, f64, f64, f64) -> Option<f64> + Send + Sync,
{
    fn height_at(&self, x: f64, y: f64, a: f64, b: f64) -> Option<f64> {
        self(x, y, a, b)
    }
}

/// Level surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatSurface {
    /// Machine Z of the surface
    pub height: f64,
}

impl SurfaceModel for FlatSurface {
    fn height_at(&self, _x: f64, _y: f64, _a: f64, _b: f64) -> Option<f64> {
        Some(self.height)
    }
}

/// Plane tilted along X and Y
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltedSurface {
    /// Machine Z at X = Y = 0
    pub height: f64,
    /// Rise per unit of X
    pub slope_x: f64,
    /// Rise per unit of Y
    pub slope_y: f64,
}

impl SurfaceModel for TiltedSurface {
    fn height_at(&self, x: f64, y: f64, _a: f64, _b: f64) -> Option<f64> {
        Some(self.height + self.slope_x * x + self.slope_y * y)
    }
}

/// Cylinder mounted on a rotary axis
///
/// Only one rotary axis is driven during a scan, so the sum of A and B is
/// taken as the rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderSurface {
    /// Machine Z of the rotation axis
    pub axis_height: f64,
    /// Nominal radius
    pub radius: f64,
    /// Eccentricity of the stock about the rotation axis
    pub runout: f64,
}

impl SurfaceModel for CylinderSurface {
    fn height_at(&self, _x: f64, _y: f64, a: f64, b: f64) -> Option<f64> {
        let angle = (a + b).to_radians();
        Some(self.axis_height + self.radius + self.runout * angle.cos())
    }
}
