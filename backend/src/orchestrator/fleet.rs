//! Fleet runner
//!
//! Runs every pending trip in a `FleetState`.
//!
//! # Concurrency
//!
//! A vehicle's fuel and tyres are mutated at every step, so a vehicle's
//! trips run one after another, in the order they were added, on a single
//! worker. Different vehicles share nothing and are processed in parallel
//! with rayon. Each vehicle and its trips are moved out of the state for
//! the duration of the run, which makes the single-writer rule a matter of
//! ownership rather than locking.

use crate::models::state::{FleetState, StateError};
use crate::models::trip::Trip;
use crate::models::vehicle::Vehicle;
use crate::orchestrator::engine::{CancelSignal, SimulationError, TripReport, TripSimulator};
use crate::orchestrator::SimulationConfig;
use log::{debug, info};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;

/// Outcome of running a batch of trips
#[derive(Debug, Default)]
pub struct FleetRunSummary {
    /// Reports of trips that ran, in trip insertion order
    pub reports: Vec<TripReport>,

    /// Trips rejected by the simulator, with the reason
    pub failures: Vec<(String, SimulationError)>,
}

impl FleetRunSummary {
    pub fn report_for(&self, trip_id: &str) -> Option<&TripReport> {
        self.reports.iter().find(|r| r.trip_id == trip_id)
    }
}

/// A fleet of vehicles and their trips, plus the simulator that runs them
///
/// # Example
///
/// ```rust
/// use fleet_simulator_core_rs::{Fleet, FleetState, SimulationConfig, Trip, Vehicle};
///
/// let state = FleetState::new(vec![
///     Vehicle::new("CAR_1".to_string(), 4_000, 800).with_fuel_level(4_000).with_tyres(4, 4),
///     Vehicle::new("CAR_2".to_string(), 5_000, 1_000).with_fuel_level(1_000).with_tyres(4, 4),
/// ]);
/// let mut fleet = Fleet::new(SimulationConfig::default(), state).unwrap();
/// fleet.add_trip(Trip::with_id("T1".to_string(), "CAR_1".to_string(), 50_000)).unwrap();
/// fleet.add_trip(Trip::with_id("T2".to_string(), "CAR_2".to_string(), 20_000)).unwrap();
///
/// let summary = fleet.run_pending();
/// assert_eq!(summary.reports.len(), 2);
/// assert!(summary.failures.is_empty());
/// ```
#[derive(Debug)]
pub struct Fleet {
    simulator: TripSimulator,
    state: FleetState,
}

impl Fleet {
    pub fn new(config: SimulationConfig, state: FleetState) -> Result<Self, SimulationError> {
        Ok(Self {
            simulator: TripSimulator::new(config)?,
            state,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        self.simulator.config()
    }

    pub fn state(&self) -> &FleetState {
        &self.state
    }

    /// Consume the fleet, handing its records back to the caller
    pub fn into_state(self) -> FleetState {
        self.state
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) {
        self.state.add_vehicle(vehicle);
    }

    /// Add a trip; its vehicle must already be in the fleet and its id unused
    pub fn add_trip(&mut self, trip: Trip) -> Result<(), SimulationError> {
        self.state.add_trip(trip).map_err(|e| match e {
            StateError::VehicleNotFound(vehicle_id) => SimulationError::VehicleNotFound(vehicle_id),
            StateError::DuplicateTrip(trip_id) => SimulationError::InvalidTrip {
                trip_id,
                reason: "duplicate trip id".to_string(),
            },
        })
    }

    /// Run a single trip by id
    pub fn run_trip(&mut self, trip_id: &str) -> Result<TripReport, SimulationError> {
        let vehicle_id = self
            .state
            .get_trip(trip_id)
            .ok_or_else(|| SimulationError::TripNotFound(trip_id.to_string()))?
            .vehicle_id()
            .to_string();

        let (mut vehicle, mut trips) = self
            .state
            .take_vehicle_batch(&vehicle_id)
            .ok_or_else(|| SimulationError::VehicleNotFound(vehicle_id.clone()))?;

        let result = match trips.iter_mut().find(|t| t.id() == trip_id) {
            Some(trip) => self.simulator.simulate_trip(&mut vehicle, trip),
            None => Err(SimulationError::TripNotFound(trip_id.to_string())),
        };

        self.state.restore_vehicle_batch(vehicle, trips);
        result
    }

    /// Run every runnable trip
    pub fn run_pending(&mut self) -> FleetRunSummary {
        let never = AtomicBool::new(false);
        self.run_pending_with_cancel(&never)
    }

    /// Run every runnable trip, stopping early once `cancel` is set
    ///
    /// Trips interrupted by cancellation end `Cancelled` and are picked up
    /// again by the next run.
    pub fn run_pending_with_cancel<C: CancelSignal + ?Sized>(
        &mut self,
        cancel: &C,
    ) -> FleetRunSummary {
        let order = self.state.runnable_trip_ids();
        if order.is_empty() {
            return FleetRunSummary::default();
        }

        let batches: Vec<(Vehicle, Vec<Trip>)> = self
            .state
            .vehicle_ids()
            .iter()
            .filter_map(|id| self.state.take_vehicle_batch(id))
            .collect();
        info!(
            "Running {} trip(s) across {} vehicle(s)",
            order.len(),
            batches.len()
        );

        let simulator = &self.simulator;
        let processed: Vec<(Vehicle, Vec<Trip>, Vec<(String, Result<TripReport, SimulationError>)>)> =
            batches
                .into_par_iter()
                .map(|(mut vehicle, mut trips)| {
                    let mut results = Vec::new();
                    for trip in trips.iter_mut().filter(|t| t.status().can_run()) {
                        debug!("Vehicle {} running trip {}", vehicle.id(), trip.id());
                        let result = simulator.simulate_trip_with_cancel(&mut vehicle, trip, cancel);
                        results.push((trip.id().to_string(), result));
                    }
                    (vehicle, trips, results)
                })
                .collect();

        let mut summary = FleetRunSummary::default();
        let mut results = Vec::new();
        for (vehicle, trips, batch_results) in processed {
            self.state.restore_vehicle_batch(vehicle, trips);
            results.extend(batch_results);
        }

        let rank: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        results.sort_by_key(|(trip_id, _)| rank.get(trip_id.as_str()).copied());
        for (trip_id, result) in results {
            match result {
                Ok(report) => summary.reports.push(report),
                Err(e) => summary.failures.push((trip_id, e)),
            }
        }
        summary
    }
}
