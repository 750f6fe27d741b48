//! Data models shared by every ProbeKit layer
//!
//! This module provides:
//! - Axis identities for the linear scan axis and the rotary axis
//! - Probe configuration persisted by the settings layer
//! - Sample point records produced by the result decoder

pub mod points;
pub mod probe_config;

pub use points::{HasHeight, RotarySamplePoint, SamplePoint};
pub use probe_config::ProbeConfig;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Linear axis a rotary scan travels along (the cylinder's long axis)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinearAxis {
    /// Cylinder parallel to X
    X,
    /// Cylinder parallel to Y
    Y,
}

impl Default for LinearAxis {
    fn default() -> Self {
        Self::X
    }
}

impl fmt::Display for LinearAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinearAxis::X => write!(f, "X"),
            LinearAxis::Y => write!(f, "Y"),
        }
    }
}

impl FromStr for LinearAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(Self::X),
            "Y" => Ok(Self::Y),
            _ => Err(format!("Unknown linear axis: {}", s)),
        }
    }
}

/// Physical rotary axis driving the workpiece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotaryAxis {
    /// A axis (rotation about X)
    A,
    /// B axis (rotation about Y)
    B,
}

impl Default for RotaryAxis {
    fn default() -> Self {
        Self::A
    }
}

impl fmt::Display for RotaryAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotaryAxis::A => write!(f, "A"),
            RotaryAxis::B => write!(f, "B"),
        }
    }
}

impl FromStr for RotaryAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            _ => Err(format!("Unknown rotary axis: {}", s)),
        }
    }
}

/// Machine axes whose live position the controller exposes in registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineAxis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
    /// A axis
    A,
    /// B axis
    B,
}

impl MachineAxis {
    /// All axes in register order
    pub const ALL: [MachineAxis; 5] = [
        MachineAxis::X,
        MachineAxis::Y,
        MachineAxis::Z,
        MachineAxis::A,
        MachineAxis::B,
    ];
}

impl From<RotaryAxis> for MachineAxis {
    fn from(axis: RotaryAxis) -> Self {
        match axis {
            RotaryAxis::A => MachineAxis::A,
            RotaryAxis::B => MachineAxis::B,
        }
    }
}
