//! Decoded sample records
//!
//! These are the records handed to exporters and viewers. The shape is a
//! contract: `{index, x, y, z}` for surface scans and `{index, x, y, z, a, b}`
//! for rotary scans.

use serde::{Deserialize, Serialize};

/// One probed point of a surface scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// 1-based visitation index assigned at plan time
    pub index: u32,
    /// X position read back from the controller
    pub x: f64,
    /// Y position read back from the controller
    pub y: f64,
    /// Probed Z height
    pub z: f64,
}

impl SamplePoint {
    /// Create a new sample point
    pub fn new(index: u32, x: f64, y: f64, z: f64) -> Self {
        Self { index, x, y, z }
    }
}

/// One probed point of a rotary scan
///
/// Both rotary positions are carried even though only one axis is driven;
/// the other holds whatever the controller reported for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotarySamplePoint {
    /// 1-based visitation index assigned at plan time
    pub index: u32,
    /// X position read back from the controller
    pub x: f64,
    /// Y position read back from the controller
    pub y: f64,
    /// Probed Z height
    pub z: f64,
    /// A axis position in degrees
    pub a: f64,
    /// B axis position in degrees
    pub b: f64,
}

impl RotarySamplePoint {
    /// Create a new rotary sample point
    pub fn new(index: u32, x: f64, y: f64, z: f64, a: f64, b: f64) -> Self {
        Self {
            index,
            x,
            y,
            z,
            a,
            b,
        }
    }
}

/// Access to the Z value shared by both record shapes
pub trait HasHeight {
    /// Probed Z height
    fn height(&self) -> f64;
}

impl HasHeight for SamplePoint {
    fn height(&self) -> f64 {
        self.z
    }
}

impl HasHeight for RotarySamplePoint {
    fn height(&self) -> f64 {
        self.z
    }
}
