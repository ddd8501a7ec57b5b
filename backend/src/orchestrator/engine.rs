//! Trip Simulator Engine
//!
//! Drives one vehicle along one trip, stopping for maintenance whenever a
//! resource runs out before the destination.
//!
//! # Architecture
//!
//! ```text
//! While the trip is InProgress:
//! 1. Check for cancellation
//! 2. Ask the scheduler for the next maintenance stop
//! 3. Stop falls before the destination:
//!      drive to it, wear tyres, burn fuel,
//!      perform the maintenance, log an event
//! 4. Otherwise:
//!      drive the remaining distance and arrive (no event)
//! 5. Tank cannot cover a leg:
//!      drive as far as the fuel allows, end Stranded
//! ```
//!
//! # Example
//!
//! ```rust
//! use fleet_simulator_core_rs::{
//!     MaintenanceKind, SimulationConfig, Trip, TripOutcome, TripSimulator, Vehicle,
//! };
//!
//! let simulator = TripSimulator::new(SimulationConfig::default()).unwrap();
//! let mut car = Vehicle::new("CAR_1".to_string(), 4_000, 800) // 40 l, 8 km/l
//!     .with_fuel_level(2_000)
//!     .with_tyres(1, 4);
//! let mut trip = Trip::new("CAR_1".to_string(), 20_000); // 200 km
//!
//! let report = simulator.simulate_trip(&mut car, &mut trip).unwrap();
//!
//! assert_eq!(report.outcome, TripOutcome::Arrived);
//! assert_eq!(report.events.len(), 1);
//! assert_eq!(report.events[0].kind(), MaintenanceKind::Refuel);
//! assert_eq!(report.events[0].km(), 16_000);
//! ```

use crate::maintenance::{next_maintenance_stop, perform_maintenance};
use crate::models::event::{Event, MaintenanceKind};
use crate::models::trip::{Trip, TripStatus};
use crate::models::vehicle::{Vehicle, VehicleError, VehicleStatus};
use crate::orchestrator::SimulationConfig;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Simulation error types
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid vehicle {vehicle_id}: {reason}")]
    InvalidVehicle { vehicle_id: String, reason: String },

    #[error("Invalid trip {trip_id}: {reason}")]
    InvalidTrip { trip_id: String, reason: String },

    #[error("Trip {trip_id} belongs to vehicle {expected}, not {actual}")]
    VehicleMismatch {
        trip_id: String,
        expected: String,
        actual: String,
    },

    #[error("Trip {trip_id} cannot run from status {status:?}")]
    TripNotRunnable { trip_id: String, status: TripStatus },

    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("Trip not found: {0}")]
    TripNotFound(String),

    #[error("Trip {trip_id} made no progress at km {km}")]
    Stalled { trip_id: String, km: i64 },

    #[error("Vehicle error: {0}")]
    Vehicle(#[from] VehicleError),
}

/// How a simulation run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripOutcome {
    /// Destination reached
    Arrived,

    /// Ran out of fuel at `km`; `fuel_shortfall` is what the last leg lacked
    Stranded { km: i64, fuel_shortfall: i64 },

    /// Stopped on request at `km`; the trip can be resumed
    Cancelled { km: i64 },
}

/// Result of one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct TripReport {
    pub trip_id: String,

    pub outcome: TripOutcome,

    /// Events recorded during this run, in order
    pub events: Vec<Event>,

    /// Vehicle state after the run
    pub vehicle: VehicleStatus,

    /// Maintenance stops made during this run
    pub stops: usize,
}

/// Source of a cooperative stop request
///
/// The engine asks once per step, before planning the next stop.
pub trait CancelSignal: Sync {
    fn is_cancelled(&self) -> bool;
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// Result of driving one leg
enum Leg {
    Completed,
    Stranded(TripOutcome),
}

/// Runs trips against a fixed configuration
///
/// The simulator holds no per-trip state, so one instance can be shared
/// across threads. Exclusive access to a vehicle is expressed by the
/// `&mut Vehicle` each call takes.
#[derive(Debug, Clone)]
pub struct TripSimulator {
    config: SimulationConfig,
}

impl TripSimulator {
    /// Create a simulator, rejecting an invalid configuration
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run a trip to completion
    pub fn simulate_trip(
        &self,
        vehicle: &mut Vehicle,
        trip: &mut Trip,
    ) -> Result<TripReport, SimulationError> {
        let never = AtomicBool::new(false);
        self.simulate_trip_with_cancel(vehicle, trip, &never)
    }

    /// Run a trip, checking `cancel` once per step
    ///
    /// A cancelled run leaves the trip `Cancelled` at the position of the
    /// last completed step; running it again resumes from there.
    ///
    /// # Returns
    ///
    /// * `Ok(TripReport)` - The run ended as Arrived, Stranded or Cancelled
    /// * `Err(SimulationError)` - Records were invalid or the trip cannot run
    pub fn simulate_trip_with_cancel<C: CancelSignal + ?Sized>(
        &self,
        vehicle: &mut Vehicle,
        trip: &mut Trip,
        cancel: &C,
    ) -> Result<TripReport, SimulationError> {
        self.check_records(vehicle, trip)?;

        let events_before = trip.events().len();
        let mut refuels = trip.events().events_of_kind(MaintenanceKind::Refuel).len() as u32;
        let mut stops = 0;

        trip.set_status(TripStatus::InProgress);
        debug!(
            "Trip {} started for vehicle {} at km {} of {}",
            trip.id(),
            vehicle.id(),
            trip.traveled_distance(),
            trip.total_distance()
        );

        let outcome = loop {
            if cancel.is_cancelled() {
                trip.set_status(TripStatus::Cancelled);
                warn!(
                    "Trip {} cancelled at km {}",
                    trip.id(),
                    trip.traveled_distance()
                );
                break TripOutcome::Cancelled {
                    km: trip.traveled_distance(),
                };
            }

            if trip.has_arrived_at_destination() {
                trip.set_status(TripStatus::Arrived);
                break TripOutcome::Arrived;
            }

            let refuel_available = self.config.refuel_allowed(refuels);
            let stop = next_maintenance_stop(vehicle, &self.config, refuel_available)
                .filter(|stop| trip.stop_needed_before_destination(Some(stop.distance)));

            let Some(stop) = stop else {
                // Nothing forces a stop before the destination: final leg
                let remaining = trip.remaining_distance();
                if let Leg::Stranded(outcome) = self.drive(vehicle, trip, remaining)? {
                    break outcome;
                }
                trip.set_status(TripStatus::Arrived);
                break TripOutcome::Arrived;
            };

            if let Leg::Stranded(outcome) = self.drive(vehicle, trip, stop.distance)? {
                break outcome;
            }

            let action = perform_maintenance(vehicle, stop.trigger, &self.config)?;
            if action.changed {
                let event = trip.record_event(stop.trigger);
                debug!(
                    "Trip {}: {} at km {}",
                    trip.id(),
                    event.kind(),
                    event.km()
                );
                if stop.trigger == MaintenanceKind::Refuel {
                    refuels += 1;
                }
                stops += 1;
            } else if stop.distance == 0 {
                trip.set_status(TripStatus::Stalled);
                warn!(
                    "Trip {} stalled at km {}: {} changed nothing",
                    trip.id(),
                    trip.traveled_distance(),
                    stop.trigger
                );
                return Err(SimulationError::Stalled {
                    trip_id: trip.id().to_string(),
                    km: trip.traveled_distance(),
                });
            }
        };

        match outcome {
            TripOutcome::Arrived => info!(
                "Trip {} arrived after {} km with {} stop(s)",
                trip.id(),
                trip.total_distance(),
                stops
            ),
            TripOutcome::Stranded { km, fuel_shortfall } => warn!(
                "Trip {} stranded at km {} (short {} of fuel)",
                trip.id(),
                km,
                fuel_shortfall
            ),
            TripOutcome::Cancelled { .. } => {}
        }

        Ok(TripReport {
            trip_id: trip.id().to_string(),
            outcome,
            events: trip.events().since(events_before).to_vec(),
            vehicle: vehicle.status(),
            stops,
        })
    }

    fn check_records(&self, vehicle: &Vehicle, trip: &Trip) -> Result<(), SimulationError> {
        vehicle
            .validate(self.config.max_tyres)
            .map_err(|e| SimulationError::InvalidVehicle {
                vehicle_id: vehicle.id().to_string(),
                reason: e.to_string(),
            })?;

        trip.validate().map_err(|reason| SimulationError::InvalidTrip {
            trip_id: trip.id().to_string(),
            reason,
        })?;

        if trip.vehicle_id() != vehicle.id() {
            return Err(SimulationError::VehicleMismatch {
                trip_id: trip.id().to_string(),
                expected: trip.vehicle_id().to_string(),
                actual: vehicle.id().to_string(),
            });
        }

        if !trip.status().can_run() {
            return Err(SimulationError::TripNotRunnable {
                trip_id: trip.id().to_string(),
                status: trip.status(),
            });
        }

        Ok(())
    }

    /// Drive `distance`, applying fuel and tyre changes together with the
    /// trip's progress. If the tank cannot cover it, drive what the fuel
    /// allows and strand the trip there.
    fn drive(
        &self,
        vehicle: &mut Vehicle,
        trip: &mut Trip,
        distance: i64,
    ) -> Result<Leg, SimulationError> {
        let rate = &self.config.degradation_rate;

        match vehicle.travel(distance, rate) {
            Ok(()) => {
                trip.advance(distance);
                Ok(Leg::Completed)
            }
            Err(VehicleError::InsufficientFuel {
                required,
                available,
            }) => {
                let covered = vehicle.consume_fuel_clamped(distance);
                vehicle.degrade_tyres(covered, rate);
                trip.advance(covered);
                trip.set_status(TripStatus::Stranded);
                Ok(Leg::Stranded(TripOutcome::Stranded {
                    km: trip.traveled_distance(),
                    fuel_shortfall: required - available,
                }))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Run a trip with a one-off simulator
///
/// # Example
///
/// ```rust
/// use fleet_simulator_core_rs::{simulate_trip, SimulationConfig, Trip, TripOutcome, Vehicle};
///
/// let mut car = Vehicle::new("CAR_1".to_string(), 4_000, 800).with_fuel_level(4_000);
/// let mut trip = Trip::new("CAR_1".to_string(), 5_000);
///
/// let report = simulate_trip(&SimulationConfig::default(), &mut car, &mut trip).unwrap();
/// assert_eq!(report.outcome, TripOutcome::Arrived);
/// assert!(report.events.is_empty());
/// ```
pub fn simulate_trip(
    config: &SimulationConfig,
    vehicle: &mut Vehicle,
    trip: &mut Trip,
) -> Result<TripReport, SimulationError> {
    TripSimulator::new(config.clone())?.simulate_trip(vehicle, trip)
}
