//! Fleet State
//!
//! In-memory holder of every vehicle and trip the fleet runner works on.
//! This is the hand-off point with the external persistence layer: records
//! are loaded into a `FleetState`, simulated, and read back out.
//!
//! # Critical Invariants
//!
//! 1. **Vehicle Uniqueness**: Each vehicle ID appears exactly once
//! 2. **Trip Uniqueness**: Each trip ID appears exactly once
//! 3. **No Orphan Trips**: Every trip references a vehicle in the state
//! 4. **Stable Order**: Trips are run in the order they were added

use crate::models::trip::Trip;
use crate::models::vehicle::Vehicle;
use std::collections::HashMap;
use thiserror::Error;

/// Reasons a record is refused by the state
#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("Duplicate trip: {0}")]
    DuplicateTrip(String),
}

/// All vehicles and trips known to a fleet
///
/// # Example
///
/// ```rust
/// use fleet_simulator_core_rs::{FleetState, Trip, Vehicle};
///
/// let mut state = FleetState::new(vec![Vehicle::new("CAR_1".to_string(), 4_000, 800)]);
/// state.add_trip(Trip::with_id("T1".to_string(), "CAR_1".to_string(), 10_000)).unwrap();
/// assert_eq!(state.num_vehicles(), 1);
/// assert_eq!(state.trip_ids_for_vehicle("CAR_1"), vec!["T1".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FleetState {
    vehicles: HashMap<String, Vehicle>,

    trips: HashMap<String, Trip>,

    /// Trip IDs in insertion order
    trip_order: Vec<String>,
}

impl FleetState {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        let vehicles = vehicles
            .into_iter()
            .map(|vehicle| (vehicle.id().to_string(), vehicle))
            .collect();

        Self {
            vehicles,
            trips: HashMap::new(),
            trip_order: Vec::new(),
        }
    }

    /// Add or replace a vehicle
    pub fn add_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicles.insert(vehicle.id().to_string(), vehicle);
    }

    /// Add a trip for a known vehicle; the trip ID must be unused
    pub fn add_trip(&mut self, trip: Trip) -> Result<(), StateError> {
        if !self.vehicles.contains_key(trip.vehicle_id()) {
            return Err(StateError::VehicleNotFound(trip.vehicle_id().to_string()));
        }
        if self.trips.contains_key(trip.id()) {
            return Err(StateError::DuplicateTrip(trip.id().to_string()));
        }
        self.trip_order.push(trip.id().to_string());
        self.trips.insert(trip.id().to_string(), trip);
        Ok(())
    }

    pub fn get_vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    pub fn get_vehicle_mut(&mut self, id: &str) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(id)
    }

    pub fn get_trip(&self, id: &str) -> Option<&Trip> {
        self.trips.get(id)
    }

    pub fn get_trip_mut(&mut self, id: &str) -> Option<&mut Trip> {
        self.trips.get_mut(id)
    }

    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    pub fn num_trips(&self) -> usize {
        self.trips.len()
    }

    /// Vehicle IDs, sorted for deterministic iteration
    pub fn vehicle_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.vehicles.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Trips in insertion order
    pub fn trips(&self) -> impl Iterator<Item = &Trip> {
        self.trip_order.iter().filter_map(|id| self.trips.get(id))
    }

    /// IDs of a vehicle's trips in insertion order
    pub fn trip_ids_for_vehicle(&self, vehicle_id: &str) -> Vec<String> {
        self.trips()
            .filter(|t| t.vehicle_id() == vehicle_id)
            .map(|t| t.id().to_string())
            .collect()
    }

    /// IDs of trips the simulator may still run, in insertion order
    pub fn runnable_trip_ids(&self) -> Vec<String> {
        self.trips()
            .filter(|t| t.status().can_run())
            .map(|t| t.id().to_string())
            .collect()
    }

    /// Take a vehicle and its trips out of the state for exclusive use
    pub(crate) fn take_vehicle_batch(&mut self, vehicle_id: &str) -> Option<(Vehicle, Vec<Trip>)> {
        let vehicle = self.vehicles.remove(vehicle_id)?;
        let trip_ids = self.trip_ids_for_vehicle(vehicle_id);
        let trips = trip_ids
            .iter()
            .filter_map(|id| self.trips.remove(id))
            .collect();
        Some((vehicle, trips))
    }

    /// Return a batch taken with `take_vehicle_batch`
    pub(crate) fn restore_vehicle_batch(&mut self, vehicle: Vehicle, trips: Vec<Trip>) {
        for trip in trips {
            self.trips.insert(trip.id().to_string(), trip);
        }
        self.add_vehicle(vehicle);
    }
}
