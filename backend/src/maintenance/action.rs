//! Maintenance Actions
//!
//! What happens at a maintenance stop:
//! - **Tyre change**: every mounted tyre worn to the limit is retired and a
//!   fresh one is mounted in its slot
//! - **Refuel**: the tank is filled to capacity
//!
//! Actions report whether they changed the vehicle. A refuel on a full tank
//! changes nothing, and the simulator records no event for it.
//!
//! A replacement tyre that cannot be mounted (`TyreSlotFull`) does not fail
//! the action: the worn tyre is still retired and the vehicle carries on
//! with a free slot.

use crate::models::event::{EventTypeError, MaintenanceKind};
use crate::models::vehicle::{Vehicle, VehicleError};
use crate::orchestrator::SimulationConfig;
use log::{debug, warn};
use thiserror::Error;

/// Errors from dispatching maintenance by reference-table id
#[derive(Debug, Error, PartialEq)]
pub enum MaintenanceError {
    #[error("Event type error: {0}")]
    EventType(#[from] EventTypeError),

    #[error("Vehicle error: {0}")]
    Vehicle(#[from] VehicleError),
}

/// What a maintenance action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceOutcome {
    pub kind: MaintenanceKind,

    /// False when the action found nothing to do
    pub changed: bool,

    /// Tyres taken out of service
    pub tyres_retired: Vec<u64>,

    /// Fresh tyres mounted
    pub tyres_mounted: Vec<u64>,

    /// Liters added to the tank (i64 hundredths)
    pub fuel_added: i64,
}

impl MaintenanceOutcome {
    fn new(kind: MaintenanceKind) -> Self {
        Self {
            kind,
            changed: false,
            tyres_retired: Vec::new(),
            tyres_mounted: Vec::new(),
            fuel_added: 0,
        }
    }
}

/// Replace every mounted tyre worn to the degradation limit
pub fn perform_tyre_change(vehicle: &mut Vehicle, config: &SimulationConfig) -> MaintenanceOutcome {
    let mut outcome = MaintenanceOutcome::new(MaintenanceKind::TyreChange);

    for tyre_id in vehicle.replaceable_tyres(config.degradation_limit) {
        if !vehicle.retire_tyre(tyre_id) {
            continue;
        }
        outcome.tyres_retired.push(tyre_id);

        match vehicle.add_new_tyre(config.max_tyres) {
            Ok(new_id) => {
                debug!(
                    "Vehicle {}: tyre {} replaced by tyre {}",
                    vehicle.id(),
                    tyre_id,
                    new_id
                );
                outcome.tyres_mounted.push(new_id);
            }
            Err(e) => {
                warn!(
                    "Vehicle {}: tyre {} retired, replacement deferred ({})",
                    vehicle.id(),
                    tyre_id,
                    e
                );
            }
        }
    }

    outcome.changed = !outcome.tyres_retired.is_empty();
    outcome
}

/// Fill the tank to capacity
///
/// A full tank is left alone and reported as unchanged.
///
/// # Example
/// ```
/// use fleet_simulator_core_rs::maintenance::perform_refuel;
/// use fleet_simulator_core_rs::Vehicle;
///
/// let mut car = Vehicle::new("CAR_1".to_string(), 4_000, 800).with_fuel_level(1_500);
/// let outcome = perform_refuel(&mut car).unwrap();
/// assert!(outcome.changed);
/// assert_eq!(outcome.fuel_added, 2_500);
/// assert!(!perform_refuel(&mut car).unwrap().changed);
/// ```
pub fn perform_refuel(vehicle: &mut Vehicle) -> Result<MaintenanceOutcome, VehicleError> {
    let mut outcome = MaintenanceOutcome::new(MaintenanceKind::Refuel);

    let amount = vehicle.refuel_amount();
    if amount == 0 {
        return Ok(outcome);
    }

    let new_level = vehicle.refuel(amount)?;
    debug!(
        "Vehicle {}: refuelled {} to level {}",
        vehicle.id(),
        amount,
        new_level
    );
    outcome.fuel_added = amount;
    outcome.changed = true;
    Ok(outcome)
}

/// Run the action for a maintenance kind
pub fn perform_maintenance(
    vehicle: &mut Vehicle,
    kind: MaintenanceKind,
    config: &SimulationConfig,
) -> Result<MaintenanceOutcome, VehicleError> {
    match kind {
        MaintenanceKind::TyreChange => Ok(perform_tyre_change(vehicle, config)),
        MaintenanceKind::Refuel => perform_refuel(vehicle),
    }
}

/// Run the action for a reference-table event type id
///
/// Unknown ids are rejected before anything is touched.
pub fn perform_maintenance_by_id(
    vehicle: &mut Vehicle,
    event_type_id: u8,
    config: &SimulationConfig,
) -> Result<MaintenanceOutcome, MaintenanceError> {
    let kind = MaintenanceKind::from_id(event_type_id)?;
    Ok(perform_maintenance(vehicle, kind, config)?)
}
