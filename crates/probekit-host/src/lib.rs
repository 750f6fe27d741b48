//! # ProbeKit Host
//!
//! Collaborators that carry generated programs to a controller and bring its
//! variables back.
//!
//! - **Host**: the [`ControllerHost`] seam plus a file-based offline host
//! - **Simulator**: an OpenSBP interpreter probing a modelled workpiece
//! - **Simulated host**: the simulator behind the host seam, running
//!   programs on a blocking task
//! - **Controller**: one-scan-at-a-time submission, completion polling and
//!   retrieval into a caller-owned session

pub mod controller;
pub mod host;
pub mod simulated;
pub mod simulator;

pub use controller::ScanController;
pub use host::{ControllerHost, SnapshotFileHost};
pub use simulated::SimulatedHost;
pub use simulator::{
    CylinderSurface, FlatSurface, MachinePosition, OperatorScript, RunReport,
    SimulatedController, SurfaceModel, TiltedSurface,
};
