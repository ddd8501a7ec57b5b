//! Fleet Simulator Core - Rust Engine
//!
//! Trip simulation for a vehicle fleet: fuel consumption, tyre wear,
//! maintenance stops and the event log they leave behind.
//!
//! # Architecture
//!
//! - **core**: Fixed-point quantities and decimal conversion
//! - **models**: Domain types (Vehicle, Tyre, Trip, Event, FleetState)
//! - **maintenance**: Stop scheduling and maintenance actions
//! - **orchestrator**: Trip simulation loop, fleet runner, checkpoints
//!
//! # Critical Invariants
//!
//! 1. All quantity values are i64 hundredths (two decimal places)
//! 2. `0 <= fuel_level <= fuel_capacity` after every operation
//! 3. A vehicle is mutated by one trip simulation at a time
//! 4. FFI boundary is minimal and safe
//!
//! # Trip Lifecycle
//!
//! ```text
//! NotStarted -> InProgress -> Arrived     (terminal)
//!                          -> Stranded    (terminal, tank ran dry)
//!                          -> Stalled     (terminal, a zero-distance stop changed nothing)
//!                          -> Cancelled   (resumable from the recorded km)
//! ```

// Module declarations
pub mod core;
pub mod maintenance;
pub mod models;
pub mod orchestrator;

// Re-exports for convenience
pub use crate::core::units::{format_fixed, parse_fixed, UnitsError};
pub use maintenance::{MaintenanceError, MaintenanceOutcome, MaintenanceStop, TieBreak};
pub use models::{
    event::{Event, EventLog, EventTypeError, MaintenanceKind},
    state::{FleetState, StateError},
    trip::{Trip, TripStatus},
    tyre::{DegradationRate, Tyre},
    vehicle::{Vehicle, VehicleError, VehicleStatus},
};
pub use orchestrator::{
    simulate_trip, CancelSignal, CheckpointError, Fleet, FleetCheckpoint, FleetRunSummary,
    SimulationConfig, SimulationError, TripOutcome, TripReport, TripSimulator,
};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn fleet_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::fleet::PyFleet>()?;
    Ok(())
}
