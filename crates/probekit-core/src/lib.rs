//! # ProbeKit Core
//!
//! Core types and utilities for ProbeKit.
//! Provides the probe configuration, axis identities, decoded sample records
//! and the error types shared by the host and settings layers.

pub mod data;
pub mod error;
pub mod units;

pub use data::{
    HasHeight, LinearAxis, MachineAxis, ProbeConfig, RotaryAxis, RotarySamplePoint, SamplePoint,
};

pub use error::{ConfigError, HostError};

pub use units::MeasurementSystem;
