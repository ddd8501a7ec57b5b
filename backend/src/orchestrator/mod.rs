//! Orchestrator - trip simulation loop and fleet runner
//!
//! See `engine.rs` for the driving loop and `fleet.rs` for running many
//! vehicles at once.

pub mod checkpoint;
pub mod config;
pub mod engine;
pub mod fleet;


// Re-export main types for convenience
pub use config::SimulationConfig;
pub use engine::{
    simulate_trip, CancelSignal, SimulationError, TripOutcome, TripReport, TripSimulator,
};
pub use fleet::{Fleet, FleetRunSummary};

// Re-export checkpoint types
pub use checkpoint::{CheckpointError, FleetCheckpoint, TripSnapshot, VehicleSnapshot};
