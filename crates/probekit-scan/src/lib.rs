//! # ProbeKit Scan
//!
//! This crate turns scan parameters into controller probe programs and turns
//! the controller's variables back into measured points.
//!
//! ## Pipeline
//!
//! - **Params / Planner**: validated scan areas and their serpentine or
//!   angle-major visitation order
//! - **Program Emitter**: zeroing block, one probe-and-record block per
//!   sample, completion trailer
//! - **Encoder**: JSON accumulated in a controller string variable with
//!   `&quot;` standing in for quotes
//! - **Completion**: the `COMPLETE` flag a host waits for
//! - **Decoder**: snapshot variable store to typed points, with not-ready
//!   and malformed outcomes kept apart
//!
//! ## Supporting Pieces
//!
//! - **Dialect**: statement spelling for a controller language (OpenSBP)
//! - **Session**: caller-owned points and timing with Z statistics
//! - **Export**: CSV and DXF writers for retrieved points

pub mod completion;
pub mod decoder;
pub mod dialect;
pub mod encoder;
pub mod error;
pub mod export;
pub mod params;
pub mod planner;
pub mod program;
pub mod session;
pub mod zeroing;

// Re-export commonly used items
pub use completion::COMPLETE_VARIABLE;
pub use decoder::{
    decode_rotary, decode_surface, decode_z_probe, Retrieval, VariableStore, ZProbeReading,
};
pub use dialect::{ControllerDialect, OpenSbp};
pub use encoder::{InlineJsonEncoder, JsonField, QUOTE_PLACEHOLDER};
pub use error::{EncodingError, ParameterError, ScanError, ScanResult};
pub use export::{default_file_name, save_csv, save_dxf, write_csv, write_dxf, ExportRecord};
pub use params::{RotaryScanParameters, ScanParameters, MAX_SCAN_POINTS};
pub use planner::{PlannedPoint, PlannedRotaryPoint, RotaryPlan, ScanPlanner, SurfacePlan};
pub use program::{format_number, ProgramEmitter, ScanKind, ScanProgram};
pub use session::{ScanSession, ScanStatistics};
pub use zeroing::ZeroingRoutine;
