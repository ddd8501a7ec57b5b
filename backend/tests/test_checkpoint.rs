//! Checkpoint Tests - Save/Load Fleet State
//!
//! Checkpoints are the records the persistence layer stores between runs.
//!
//! Critical invariants tested:
//! - Determinism: a restored fleet produces the same results as the original
//! - Referential integrity: no orphaned or duplicate records are accepted
//! - Config matching: state taken under a different config is rejected

use fleet_simulator_core_rs::orchestrator::checkpoint::{EventSnapshot, TripSnapshot};
use fleet_simulator_core_rs::{
    CheckpointError, EventTypeError, Fleet, FleetCheckpoint, FleetState, SimulationConfig,
    Trip, TripStatus, Vehicle,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn create_test_fleet() -> Fleet {
    let state = FleetState::new(vec![
        Vehicle::new("CAR_1".to_string(), 4_000, 800)
            .with_fuel_level(2_000)
            .with_tyres(2, 4),
        Vehicle::new("CAR_2".to_string(), 6_000, 1_250).with_fuel_level(6_000),
    ]);
    let mut fleet = Fleet::new(SimulationConfig::default(), state).unwrap();
    for (id, vehicle, distance) in [
        ("T1", "CAR_1", 20_000),
        ("T2", "CAR_2", 90_000),
        ("T3", "CAR_1", 45_000),
    ] {
        fleet
            .add_trip(Trip::with_id(id.to_string(), vehicle.to_string(), distance))
            .unwrap();
    }
    fleet
}

fn saved_checkpoint(fleet: &Fleet) -> FleetCheckpoint {
    FleetCheckpoint::from_json(&fleet.save_checkpoint().unwrap()).unwrap()
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn test_save_load_preserves_records() {
    let mut fleet = create_test_fleet();
    fleet.run_trip("T1").unwrap();

    let json = fleet.save_checkpoint().unwrap();
    let restored = Fleet::load_checkpoint(SimulationConfig::default(), &json).unwrap();

    for id in ["CAR_1", "CAR_2"] {
        assert_eq!(
            restored.state().get_vehicle(id),
            fleet.state().get_vehicle(id),
            "Vehicle {} differs after restore",
            id
        );
    }
    let original: Vec<&Trip> = fleet.state().trips().collect();
    let loaded: Vec<&Trip> = restored.state().trips().collect();
    assert_eq!(original, loaded, "Trips and their order are preserved");
}

#[test]
fn test_restored_fleet_runs_identically() {
    let mut fleet = create_test_fleet();
    fleet.run_trip("T1").unwrap();
    let json = fleet.save_checkpoint().unwrap();
    let mut restored = Fleet::load_checkpoint(SimulationConfig::default(), &json).unwrap();

    let original = fleet.run_pending();
    let replayed = restored.run_pending();

    assert_eq!(original.reports, replayed.reports);
    assert_eq!(
        fleet.save_checkpoint().unwrap(),
        restored.save_checkpoint().unwrap()
    );
}

#[test]
fn test_checkpoint_uses_stored_schema() {
    let mut fleet = create_test_fleet();
    fleet.run_trip("T1").unwrap();

    let checkpoint = saved_checkpoint(&fleet);
    let car = checkpoint
        .vehicles
        .iter()
        .find(|v| v.id == "CAR_1")
        .unwrap();

    assert_eq!(car.gas_capacity, "40.00");
    assert_eq!(car.current_gas_level, "35.00");
    assert_eq!(car.kms_per_liter, "8.00");

    let trip = &checkpoint.trips[0];
    assert_eq!(trip.id, "T1");
    assert_eq!(trip.status, TripStatus::Arrived);
    assert_eq!(trip.travelled_distance, "200.00");
    assert_eq!(
        trip.events,
        vec![EventSnapshot {
            event_type_id: 2,
            km: "160.00".to_string(),
        }]
    );
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_config_mismatch_rejected() {
    let fleet = create_test_fleet();
    let json = fleet.save_checkpoint().unwrap();

    let other = SimulationConfig {
        degradation_limit: 9_400,
        ..SimulationConfig::default()
    };
    let result = Fleet::load_checkpoint(other, &json);

    assert!(matches!(result, Err(CheckpointError::ConfigMismatch { .. })));
}

#[test]
fn test_orphaned_trip_rejected() {
    let fleet = create_test_fleet();
    let mut checkpoint = saved_checkpoint(&fleet);
    checkpoint.trips.push(TripSnapshot {
        id: "T9".to_string(),
        vehicle_id: "GHOST".to_string(),
        distance: "10.00".to_string(),
        travelled_distance: "0.00".to_string(),
        status: TripStatus::NotStarted,
        events: Vec::new(),
    });

    let result = checkpoint.restore(&SimulationConfig::default());
    assert!(matches!(result, Err(CheckpointError::Invalid(_))));
}

#[test]
fn test_duplicate_vehicle_rejected() {
    let fleet = create_test_fleet();
    let mut checkpoint = saved_checkpoint(&fleet);
    let copy = checkpoint.vehicles[0].clone();
    checkpoint.vehicles.push(copy);

    let result = checkpoint.restore(&SimulationConfig::default());
    assert!(matches!(result, Err(CheckpointError::Invalid(_))));
}

#[test]
fn test_unknown_event_type_rejected() {
    let fleet = create_test_fleet();
    let mut checkpoint = saved_checkpoint(&fleet);
    checkpoint.trips[0].events.push(EventSnapshot {
        event_type_id: 7,
        km: "1.00".to_string(),
    });

    let result = checkpoint.restore(&SimulationConfig::default());
    assert!(matches!(
        result,
        Err(CheckpointError::EventType(EventTypeError::NoEventTypeFound(7)))
    ));
}

#[test]
fn test_overfull_tank_rejected() {
    let fleet = create_test_fleet();
    let mut checkpoint = saved_checkpoint(&fleet);
    checkpoint.vehicles[0].current_gas_level = "999.00".to_string();

    let result = checkpoint.restore(&SimulationConfig::default());
    assert!(matches!(result, Err(CheckpointError::Invalid(_))));
}

#[test]
fn test_trip_past_destination_rejected() {
    let fleet = create_test_fleet();
    let mut checkpoint = saved_checkpoint(&fleet);
    checkpoint.trips[0].travelled_distance = "500.00".to_string();

    let result = checkpoint.restore(&SimulationConfig::default());
    assert!(matches!(result, Err(CheckpointError::Invalid(_))));
}

#[test]
fn test_malformed_json_rejected() {
    let result = Fleet::load_checkpoint(SimulationConfig::default(), "{ not json");
    assert!(matches!(result, Err(CheckpointError::Serialization(_))));
}
