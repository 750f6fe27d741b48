//! # ProbeKit
//!
//! Surface and rotary probing scans for OpenSBP controllers:
//! - Serpentine surface grids and angle-major rotary sweeps
//! - Probe programs that record each sample as JSON inside a controller
//!   string variable
//! - A completion flag telling a host when the recorded data is whole
//! - Decoding of the recorded data from the host's configuration snapshot
//!
//! ## Architecture
//!
//! ProbeKit is organized as a workspace with multiple crates:
//!
//! 1. **probekit-core** - Probe configuration, sample records, axes, errors
//! 2. **probekit-scan** - Planning, program emission, encoding, decoding, export
//! 3. **probekit-host** - Host interface, scan controller, simulated controller
//! 4. **probekit-settings** - Persisted settings (JSON/TOML)
//! 5. **probekit** - Command-line binary that integrates all crates

pub mod cli;
pub mod commands;

pub use probekit_core::{
    HostError, LinearAxis, MeasurementSystem, ProbeConfig, RotaryAxis, RotarySamplePoint,
    SamplePoint,
};
pub use probekit_host::{ControllerHost, ScanController, SimulatedHost, SnapshotFileHost};
pub use probekit_scan::{
    decode_rotary, decode_surface, decode_z_probe, ProgramEmitter, Retrieval,
    RotaryScanParameters, ScanKind, ScanParameters, ScanProgram, ScanSession,
};
pub use probekit_settings::{Config, SettingsPersistence};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Version with build date, as shown by `--version`
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("BUILD_DATE"),
    ")"
);

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output to stderr with pretty formatting, leaving stdout for programs
/// - RUST_LOG environment variable support, `info` otherwise
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
