//! Error handling for ProbeKit
//!
//! Provides error types for the layers that sit outside scan planning:
//! - Host errors (program submission, configuration snapshot access)
//! - Configuration errors (probe settings validation)

use thiserror::Error;

/// Host error type
///
/// Represents failures talking to the controller host: submitting program
/// text and reading back its configuration snapshot.
#[derive(Error, Debug, Clone)]
pub enum HostError {
    /// The snapshot has no variable store at all
    #[error("Host configuration has no variable store at '{path}'")]
    ChannelMissing {
        /// The snapshot path that was searched.
        path: String,
    },

    /// The host refused the program text
    #[error("Program submission rejected: {reason}")]
    SubmissionRejected {
        /// The reason given by the host.
        reason: String,
    },

    /// A program is already outstanding on the controller
    #[error("A scan program is already running")]
    Busy,

    /// Retrieval asked for a different kind of scan than the one outstanding
    #[error("Cannot retrieve {requested} results while a {outstanding} scan is outstanding")]
    KindMismatch {
        /// The kind of the submitted program.
        outstanding: String,
        /// The kind the caller asked for.
        requested: String,
    },

    /// The configuration snapshot could not be read
    #[error("Configuration snapshot unavailable: {reason}")]
    SnapshotUnavailable {
        /// The reason the snapshot could not be read.
        reason: String,
    },

    /// Waiting for the completion flag timed out
    #[error("Timed out after {timeout_ms}ms waiting for scan completion")]
    CompletionTimeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The simulated controller stopped executing a program
    #[error("Program aborted at line {line_number}: {reason}")]
    ProgramAborted {
        /// The 1-based program line that failed.
        line_number: usize,
        /// The reason execution stopped.
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {reason}")]
    IoError {
        /// The reason for the I/O error.
        reason: String,
    },
}

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A probe setting has an invalid value
    #[error("Invalid probe setting '{field}': {reason}")]
    InvalidField {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for an invalid-field error
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
