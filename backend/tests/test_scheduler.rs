//! Maintenance Scheduler Tests
//!
//! The scheduler looks at a vehicle and answers one question: how far can
//! it go before it must stop, and why.

use fleet_simulator_core_rs::maintenance::{
    choose_trigger, km_until_refuel, km_until_tyre_change, most_worn_tyre,
    next_maintenance_stop,
};
use fleet_simulator_core_rs::{MaintenanceKind, SimulationConfig, TieBreak, Tyre, Vehicle};

fn car_with_tyres(fuel_level: i64, wears: &[i64]) -> Vehicle {
    let tyres = wears
        .iter()
        .enumerate()
        .map(|(i, &wear)| Tyre::from_parts(i as u64 + 1, wear, true, Some("CAR_1".to_string())))
        .collect();
    Vehicle::from_parts("CAR_1".to_string(), fuel_level, 4_000, 800, tyres)
}

#[test]
fn test_most_worn_tyre_ties_go_to_lowest_id() {
    let car = car_with_tyres(0, &[100, 700, 700, 300]);
    assert_eq!(most_worn_tyre(&car).map(Tyre::id), Some(2));
}

#[test]
fn test_km_until_tyre_change_uses_most_worn_tyre() {
    let config = SimulationConfig::default();
    let car = car_with_tyres(0, &[0, 5_334]);

    // 45.66% left at 1% per 3 km, rounded up
    assert_eq!(km_until_tyre_change(&car, &config), Some(13_698));
}

#[test]
fn test_km_until_tyre_change_without_tyres_is_unbounded() {
    let config = SimulationConfig::default();
    let car = car_with_tyres(4_000, &[]);
    assert_eq!(km_until_tyre_change(&car, &config), None);
}

#[test]
fn test_km_until_tyre_change_zero_when_worn_past_limit() {
    let config = SimulationConfig::default();
    let car = car_with_tyres(0, &[10_000]);
    assert_eq!(km_until_tyre_change(&car, &config), Some(0));
}

#[test]
fn test_km_until_refuel_is_tank_range() {
    assert_eq!(km_until_refuel(&car_with_tyres(2_000, &[])), 16_000);
    assert_eq!(km_until_refuel(&car_with_tyres(0, &[])), 0);
}

#[test]
fn test_choose_trigger_nearest_wins() {
    assert_eq!(
        choose_trigger(Some(100), Some(200), TieBreak::PreferRefuel),
        Some((100, MaintenanceKind::TyreChange))
    );
    assert_eq!(
        choose_trigger(Some(300), Some(200), TieBreak::PreferTyreChange),
        Some((200, MaintenanceKind::Refuel))
    );
    assert_eq!(
        choose_trigger(None, Some(200), TieBreak::PreferTyreChange),
        Some((200, MaintenanceKind::Refuel))
    );
    assert_eq!(choose_trigger(None, None, TieBreak::PreferRefuel), None);
}

#[test]
fn test_tie_break_is_configurable() {
    let mut config = SimulationConfig::default();
    // 29.70 l at 10 km/l and a fresh tyre both last 297 km
    let car = Vehicle::from_parts(
        "CAR_1".to_string(),
        2_970,
        4_000,
        1_000,
        vec![Tyre::from_parts(1, 0, true, Some("CAR_1".to_string()))],
    );
    assert_eq!(km_until_refuel(&car), 29_700);
    assert_eq!(km_until_tyre_change(&car, &config), Some(29_700));

    let stop = next_maintenance_stop(&car, &config, true).unwrap();
    assert_eq!(stop.trigger, MaintenanceKind::Refuel, "Default prefers refuel");

    config.tie_break = TieBreak::PreferTyreChange;
    let stop = next_maintenance_stop(&car, &config, true).unwrap();
    assert_eq!(stop.trigger, MaintenanceKind::TyreChange);
    assert_eq!(stop.distance, 29_700);
}

#[test]
fn test_next_stop_reports_both_counters() {
    let config = SimulationConfig::default();
    let car = car_with_tyres(2_000, &[0]);

    let stop = next_maintenance_stop(&car, &config, true).unwrap();

    assert_eq!(stop.trigger, MaintenanceKind::Refuel);
    assert_eq!(stop.distance, 16_000);
    assert_eq!(stop.km_until_refuel, 16_000);
    assert_eq!(stop.km_until_tyre_change, Some(29_700));
}

#[test]
fn test_next_stop_without_refuel_budget() {
    let config = SimulationConfig::default();

    let car = car_with_tyres(2_000, &[0]);
    let stop = next_maintenance_stop(&car, &config, false).unwrap();
    assert_eq!(stop.trigger, MaintenanceKind::TyreChange);
    assert_eq!(stop.distance, 29_700);

    let bare = car_with_tyres(2_000, &[]);
    assert!(next_maintenance_stop(&bare, &config, false).is_none());
}
