//! Checkpoint - Save/Load Fleet State
//!
//! Snapshots are the records the external persistence and HTTP layers
//! read and write. Quantities travel as two-decimal strings
//! (`"current_gas_level": "12.50"`), matching the stored schema.
//!
//! # Critical Invariants
//!
//! - **Config Matching**: A checkpoint only loads under the config it was taken with
//! - **Referential Integrity**: Every trip references a vehicle in the checkpoint
//! - **Record Validity**: Restored vehicles and trips pass their own validation

use crate::core::units::{format_fixed, parse_fixed, UnitsError};
use crate::models::event::{Event, EventTypeError, MaintenanceKind};
use crate::models::state::FleetState;
use crate::models::trip::{Trip, TripStatus};
use crate::models::tyre::Tyre;
use crate::models::vehicle::Vehicle;
use crate::orchestrator::engine::SimulationError;
use crate::orchestrator::fleet::Fleet;
use crate::orchestrator::SimulationConfig;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while saving or restoring a checkpoint
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config mismatch: checkpoint {expected}, current {actual}")]
    ConfigMismatch { expected: String, actual: String },

    #[error("Invalid quantity: {0}")]
    Units(#[from] UnitsError),

    #[error("Invalid event: {0}")]
    EventType(#[from] EventTypeError),

    #[error("Invalid checkpoint: {0}")]
    Invalid(String),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
}

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete fleet snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetCheckpoint {
    /// SHA256 hash of the config in force when the snapshot was taken
    pub config_hash: String,

    pub vehicles: Vec<VehicleSnapshot>,

    /// Trips in insertion order
    pub trips: Vec<TripSnapshot>,
}

/// Vehicle record as the persistence layer stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub id: String,
    pub current_gas_level: String,
    pub gas_capacity: String,
    pub kms_per_liter: String,
    pub tyres: Vec<TyreSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TyreSnapshot {
    pub id: u64,
    pub degradation: String,
    pub currently_in_use: bool,
    pub vehicle_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSnapshot {
    pub id: String,
    pub vehicle_id: String,
    pub distance: String,
    pub travelled_distance: String,
    pub status: TripStatus,
    pub events: Vec<EventSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub event_type_id: u8,
    pub km: String,
}

impl From<&Vehicle> for VehicleSnapshot {
    fn from(vehicle: &Vehicle) -> Self {
        VehicleSnapshot {
            id: vehicle.id().to_string(),
            current_gas_level: format_fixed(vehicle.fuel_level()),
            gas_capacity: format_fixed(vehicle.fuel_capacity()),
            kms_per_liter: format_fixed(vehicle.fuel_efficiency()),
            tyres: vehicle
                .tyres()
                .iter()
                .map(|tyre| TyreSnapshot {
                    id: tyre.id(),
                    degradation: format_fixed(tyre.wear()),
                    currently_in_use: tyre.in_use(),
                    vehicle_id: tyre.vehicle_id().map(str::to_string),
                })
                .collect(),
        }
    }
}

impl TryFrom<VehicleSnapshot> for Vehicle {
    type Error = CheckpointError;

    fn try_from(snapshot: VehicleSnapshot) -> Result<Self, Self::Error> {
        let tyres = snapshot
            .tyres
            .into_iter()
            .map(|t| {
                Ok(Tyre::from_parts(
                    t.id,
                    parse_fixed(&t.degradation)?,
                    t.currently_in_use,
                    t.vehicle_id,
                ))
            })
            .collect::<Result<Vec<_>, CheckpointError>>()?;

        Ok(Vehicle::from_parts(
            snapshot.id,
            parse_fixed(&snapshot.current_gas_level)?,
            parse_fixed(&snapshot.gas_capacity)?,
            parse_fixed(&snapshot.kms_per_liter)?,
            tyres,
        ))
    }
}

impl From<&Trip> for TripSnapshot {
    fn from(trip: &Trip) -> Self {
        TripSnapshot {
            id: trip.id().to_string(),
            vehicle_id: trip.vehicle_id().to_string(),
            distance: format_fixed(trip.total_distance()),
            travelled_distance: format_fixed(trip.traveled_distance()),
            status: trip.status(),
            events: trip
                .events()
                .events()
                .iter()
                .map(|e| EventSnapshot {
                    event_type_id: e.kind().id(),
                    km: format_fixed(e.km()),
                })
                .collect(),
        }
    }
}

impl TryFrom<TripSnapshot> for Trip {
    type Error = CheckpointError;

    fn try_from(snapshot: TripSnapshot) -> Result<Self, Self::Error> {
        let events = snapshot
            .events
            .iter()
            .map(|e| {
                Ok(Event::new(
                    snapshot.id.clone(),
                    MaintenanceKind::from_id(e.event_type_id)?,
                    parse_fixed(&e.km)?,
                ))
            })
            .collect::<Result<Vec<_>, CheckpointError>>()?;

        Ok(Trip::from_parts(
            snapshot.id,
            snapshot.vehicle_id,
            parse_fixed(&snapshot.distance)?,
            parse_fixed(&snapshot.travelled_distance)?,
            snapshot.status,
            events,
        ))
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Object keys are sorted before hashing so the result does not depend on
/// field order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, CheckpointError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let canonical_value = canonicalize(serde_json::to_value(config)?);
    let json = serde_json::to_string(&canonical_value)?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Save / Load
// ============================================================================

impl FleetCheckpoint {
    /// Snapshot a fleet state taken under `config`
    pub fn capture(config: &SimulationConfig, state: &FleetState) -> Result<Self, CheckpointError> {
        let vehicles = state
            .vehicle_ids()
            .iter()
            .filter_map(|id| state.get_vehicle(id))
            .map(VehicleSnapshot::from)
            .collect();

        Ok(Self {
            config_hash: compute_config_hash(config)?,
            vehicles,
            trips: state.trips().map(TripSnapshot::from).collect(),
        })
    }

    /// Rebuild the fleet state, checking config and record integrity
    pub fn restore(self, config: &SimulationConfig) -> Result<FleetState, CheckpointError> {
        let actual = compute_config_hash(config)?;
        if actual != self.config_hash {
            return Err(CheckpointError::ConfigMismatch {
                expected: self.config_hash,
                actual,
            });
        }

        let mut seen = HashSet::new();
        let mut vehicles = Vec::with_capacity(self.vehicles.len());
        for snapshot in self.vehicles {
            if !seen.insert(snapshot.id.clone()) {
                return Err(CheckpointError::Invalid(format!(
                    "Duplicate vehicle {}",
                    snapshot.id
                )));
            }
            let vehicle = Vehicle::try_from(snapshot)?;
            vehicle
                .validate(config.max_tyres)
                .map_err(|e| CheckpointError::Invalid(format!("Vehicle {}: {}", vehicle.id(), e)))?;
            vehicles.push(vehicle);
        }

        let mut state = FleetState::new(vehicles);
        for snapshot in self.trips {
            let trip = Trip::try_from(snapshot)?;
            trip.validate()
                .map_err(|e| CheckpointError::Invalid(format!("Trip {}: {}", trip.id(), e)))?;
            let trip_id = trip.id().to_string();
            state
                .add_trip(trip)
                .map_err(|e| CheckpointError::Invalid(format!("Trip {}: {}", trip_id, e)))?;
        }

        Ok(state)
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Fleet {
    /// Serialize the whole fleet to JSON
    pub fn save_checkpoint(&self) -> Result<String, CheckpointError> {
        FleetCheckpoint::capture(self.config(), self.state())?.to_json()
    }

    /// Rebuild a fleet from JSON saved under the same config
    pub fn load_checkpoint(config: SimulationConfig, json: &str) -> Result<Self, CheckpointError> {
        let state = FleetCheckpoint::from_json(json)?.restore(&config)?;
        Ok(Fleet::new(config, state)?)
    }
}
