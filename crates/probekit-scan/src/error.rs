//! Error types for the scan crate.
//!
//! This module provides structured error types for scan parameter
//! validation, program emission and result export.

use std::io;
use thiserror::Error;

/// Errors that can occur while planning, emitting or exporting a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A scan parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// The inline data encoder refused a key or literal.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// The probe configuration is invalid.
    #[error("Probe configuration error: {0}")]
    ProbeConfig(#[from] probekit_core::ConfigError),

    /// Export to an external format failed.
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Errors related to scan parameter validation.
///
/// These are reported before any planning happens; no partial plan is ever
/// produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A parameter is NaN or infinite.
    #[error("Parameter '{name}' must be finite")]
    NonFinite { name: String },

    /// The end of a range does not lie beyond its start.
    #[error("Invalid {axis} range: end {end} must be greater than start {start}")]
    EmptyRange { axis: String, start: f64, end: f64 },

    /// Grid spacing is zero or negative.
    #[error("Spacing must be positive, got {0}")]
    NonPositiveSpacing(f64),

    /// The angular step cannot produce at least one angle below a full turn.
    #[error("Angle step must be in (0, 360], got {0}")]
    InvalidAngleStep(f64),

    /// The scan would visit more points than the configured cap.
    #[error("Too many points ({total}). Maximum is {max}")]
    TooManyPoints { total: u64, max: u64 },
}

/// Errors raised by the inline data encoder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    /// A key would break the JSON or the controller string syntax.
    #[error("Illegal JSON key '{0}'")]
    IllegalKey(String),

    /// A literal contains a character the controller cannot quote.
    #[error("String literal cannot contain a double quote: {0}")]
    UnquotableLiteral(String),

    /// An object was requested with no fields.
    #[error("Encoded objects need at least one field")]
    EmptyObject,
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;
