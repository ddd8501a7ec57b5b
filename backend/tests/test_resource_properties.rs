//! Property tests for resource bookkeeping and trip termination
//!
//! Critical invariants tested:
//! - Fuel conservation: `0 <= fuel_level <= fuel_capacity` after every call
//! - Tyre wear monotonicity: positive distance always adds wear
//! - Termination: every trip ends Arrived, or Stranded under a refuel budget
//! - Idempotence: refuelling a full tank changes nothing

use fleet_simulator_core_rs::maintenance::perform_refuel;
use fleet_simulator_core_rs::{
    DegradationRate, MaintenanceKind, SimulationConfig, Trip, TripOutcome, TripSimulator,
    TripStatus, Tyre, Vehicle,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum FuelOp {
    Consume(i64),
    ConsumeClamped(i64),
    Refuel(i64),
    Fill,
}

/// Mostly realistic values, with the full i64 range mixed in
fn quantity(realistic: std::ops::Range<i64>) -> impl Strategy<Value = i64> {
    prop_oneof![realistic, any::<i64>()]
}

fn fuel_op() -> impl Strategy<Value = FuelOp> {
    prop_oneof![
        quantity(-1_000..50_000).prop_map(FuelOp::Consume),
        quantity(-1_000..50_000).prop_map(FuelOp::ConsumeClamped),
        quantity(-1_000..10_000).prop_map(FuelOp::Refuel),
        Just(FuelOp::Fill),
    ]
}

proptest! {
    #[test]
    fn prop_fuel_level_stays_within_tank(
        capacity in prop_oneof![1i64..10_000, 1i64..i64::MAX / 100],
        efficiency in prop_oneof![1i64..5_000, 1i64..i64::MAX],
        start in 0i64..=100,
        ops in prop::collection::vec(fuel_op(), 1..50),
    ) {
        let mut car = Vehicle::new("CAR_1".to_string(), capacity, efficiency)
            .with_fuel_level(capacity * start / 100);

        for op in ops {
            let before = car.fuel_level();
            match op {
                FuelOp::Consume(distance) => {
                    if car.consume_fuel(distance).is_err() {
                        prop_assert_eq!(car.fuel_level(), before, "Rejected call mutated state");
                    }
                }
                FuelOp::ConsumeClamped(distance) => {
                    let covered = car.consume_fuel_clamped(distance);
                    prop_assert!(covered >= 0 && covered <= distance.max(0));
                }
                FuelOp::Refuel(amount) => {
                    if car.refuel(amount).is_err() {
                        prop_assert_eq!(car.fuel_level(), before, "Rejected call mutated state");
                    }
                }
                FuelOp::Fill => {
                    perform_refuel(&mut car).unwrap();
                    prop_assert_eq!(car.fuel_level(), capacity);
                }
            }
            prop_assert!(car.fuel_level() >= 0);
            prop_assert!(car.fuel_level() <= car.fuel_capacity());
        }
    }

    #[test]
    fn prop_tyre_wear_strictly_increases(
        wear in 1i64..1_000,
        per_km in 1i64..1_000,
        distances in prop::collection::vec(1i64..100_000, 1..20),
    ) {
        let rate = DegradationRate { wear, per_km };
        let mut tyre = Tyre::new(1, "CAR_1");

        for distance in distances {
            let before = tyre.wear();
            let added = tyre.degrade(distance, &rate);
            prop_assert!(added > 0);
            prop_assert_eq!(tyre.wear(), before + added);
        }
    }

    #[test]
    fn prop_refuel_on_full_tank_is_noop(capacity in 1i64..10_000, efficiency in 1i64..5_000) {
        let mut car = Vehicle::new("CAR_1".to_string(), capacity, efficiency)
            .with_fuel_level(capacity);
        let before = car.clone();

        let outcome = perform_refuel(&mut car).unwrap();

        prop_assert!(!outcome.changed);
        prop_assert_eq!(outcome.fuel_added, 0);
        prop_assert_eq!(car, before);
    }

    #[test]
    fn prop_trip_terminates(
        capacity in 100i64..10_000,
        efficiency in 100i64..3_000,
        start in 0i64..=100,
        tyres in 0usize..=4,
        distance in 1i64..200_000,
        refuel_limit in prop::option::of(0u32..5),
        prefer_tyres in any::<bool>(),
    ) {
        let mut config = SimulationConfig {
            refuel_limit,
            ..SimulationConfig::default()
        };
        if prefer_tyres {
            config.tie_break = fleet_simulator_core_rs::TieBreak::PreferTyreChange;
        }
        let simulator = TripSimulator::new(config).unwrap();
        let mut car = Vehicle::new("CAR_1".to_string(), capacity, efficiency)
            .with_fuel_level(capacity * start / 100)
            .with_tyres(tyres, 4);
        let mut trip = Trip::with_id("T1".to_string(), "CAR_1".to_string(), distance);

        let report = simulator.simulate_trip(&mut car, &mut trip).unwrap();

        match report.outcome {
            TripOutcome::Arrived => {
                prop_assert_eq!(trip.status(), TripStatus::Arrived);
                prop_assert_eq!(trip.traveled_distance(), distance);
            }
            TripOutcome::Stranded { km, fuel_shortfall } => {
                prop_assert!(refuel_limit.is_some(), "Unlimited refuels never strand");
                prop_assert_eq!(trip.status(), TripStatus::Stranded);
                prop_assert_eq!(trip.traveled_distance(), km);
                prop_assert!(km < distance);
                prop_assert!(fuel_shortfall > 0);
                prop_assert_eq!(car.fuel_level(), 0);
            }
            TripOutcome::Cancelled { .. } => prop_assert!(false, "Nothing cancelled this run"),
        }

        let events = trip.events().events();
        prop_assert!(events.windows(2).all(|w| w[0].km() <= w[1].km()));
        prop_assert!(events.iter().all(|e| e.km() < distance));
        if let Some(limit) = refuel_limit {
            let refuels = trip.events().events_of_kind(MaintenanceKind::Refuel).len();
            prop_assert!(refuels <= limit as usize);
        }

        prop_assert_eq!(car.amount_in_use(), tyres, "Tyre changes keep every slot filled");
        prop_assert!(car.fuel_level() >= 0 && car.fuel_level() <= capacity);
    }
}
