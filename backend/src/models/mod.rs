//! Domain models for the fleet simulator

pub mod event;
pub mod state;
pub mod trip;
pub mod tyre;
pub mod vehicle;

// Re-exports
pub use event::{Event, EventLog, EventTypeError, MaintenanceKind};
pub use state::{FleetState, StateError};
pub use trip::{Trip, TripStatus};
pub use tyre::{DegradationRate, Tyre, DEFAULT_DEGRADATION_LIMIT};
pub use vehicle::{Vehicle, VehicleError, VehicleStatus, DEFAULT_MAX_TYRES};
