//! Maintenance Scheduler
//!
//! Answers "how far can this vehicle go before something forces a stop?"
//! Each consumable resource yields a distance:
//!
//! ```text
//! tyres: most-worn mounted tyre → (limit - wear) / degradation_rate
//! fuel:  fuel_level * fuel_efficiency
//! ```
//!
//! The nearest of the two is the next maintenance stop. Ties are settled by
//! the configured `TieBreak`; the other resource is re-evaluated on the
//! following step, so each stop triggers exactly one action.
//!
//! A vehicle with no mounted tyre has no tyre stop at all (`None`), which is
//! treated as unbounded rather than as an error.

use crate::models::event::MaintenanceKind;
use crate::models::tyre::Tyre;
use crate::models::vehicle::Vehicle;
use crate::orchestrator::SimulationConfig;
use serde::{Deserialize, Serialize};

/// Which stop wins when tyre and fuel limits fall at the same distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TieBreak {
    #[default]
    PreferRefuel,
    PreferTyreChange,
}

/// The next forced stop and the distances that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceStop {
    /// Distance from the current position to the stop (i64 hundredths of a km)
    pub distance: i64,

    /// Action to perform at the stop
    pub trigger: MaintenanceKind,

    /// Distance until the most-worn tyre hits the limit (`None` = no tyres)
    pub km_until_tyre_change: Option<i64>,

    /// Distance the current tank allows
    pub km_until_refuel: i64,
}

/// The mounted tyre with the highest wear; ties go to the lowest id
pub fn most_worn_tyre(vehicle: &Vehicle) -> Option<&Tyre> {
    vehicle
        .tyres_in_use()
        .min_by(|a, b| b.wear().cmp(&a.wear()).then(a.id().cmp(&b.id())))
}

/// Distance until the most-worn mounted tyre must be changed
///
/// `None` when no tyre is mounted.
pub fn km_until_tyre_change(vehicle: &Vehicle, config: &SimulationConfig) -> Option<i64> {
    most_worn_tyre(vehicle).map(|tyre| {
        let lifespan = tyre.lifespan(config.degradation_limit);
        config.degradation_rate.distance_for_wear(lifespan)
    })
}

/// Distance until the tank is empty
pub fn km_until_refuel(vehicle: &Vehicle) -> i64 {
    vehicle.tank_range()
}

/// Pick the nearer of two candidate stops
///
/// A `None` candidate never wins.
pub fn choose_trigger(
    tyre_change_in: Option<i64>,
    refuel_in: Option<i64>,
    tie_break: TieBreak,
) -> Option<(i64, MaintenanceKind)> {
    match (tyre_change_in, refuel_in) {
        (None, None) => None,
        (Some(tyre), None) => Some((tyre, MaintenanceKind::TyreChange)),
        (None, Some(fuel)) => Some((fuel, MaintenanceKind::Refuel)),
        (Some(tyre), Some(fuel)) if tyre < fuel => Some((tyre, MaintenanceKind::TyreChange)),
        (Some(tyre), Some(fuel)) if fuel < tyre => Some((fuel, MaintenanceKind::Refuel)),
        (Some(tyre), Some(_)) => match tie_break {
            TieBreak::PreferRefuel => Some((tyre, MaintenanceKind::Refuel)),
            TieBreak::PreferTyreChange => Some((tyre, MaintenanceKind::TyreChange)),
        },
    }
}

/// Next stop the vehicle must make
///
/// When `refuel_available` is false only tyre changes are candidates, so a
/// vehicle without mounted tyres has no stop at all.
///
/// # Example
/// ```
/// use fleet_simulator_core_rs::maintenance::next_maintenance_stop;
/// use fleet_simulator_core_rs::{MaintenanceKind, SimulationConfig, Vehicle};
///
/// let config = SimulationConfig::default();
/// let car = Vehicle::new("CAR_1".to_string(), 4_000, 800)
///     .with_fuel_level(2_000)
///     .with_tyres(1, 4);
///
/// let stop = next_maintenance_stop(&car, &config, true).unwrap();
/// assert_eq!(stop.trigger, MaintenanceKind::Refuel);
/// assert_eq!(stop.distance, 16_000); // 160 km
/// assert_eq!(stop.km_until_tyre_change, Some(29_700));
/// ```
pub fn next_maintenance_stop(
    vehicle: &Vehicle,
    config: &SimulationConfig,
    refuel_available: bool,
) -> Option<MaintenanceStop> {
    let km_until_tyre_change = km_until_tyre_change(vehicle, config);
    let km_until_refuel = km_until_refuel(vehicle);
    let refuel_candidate = refuel_available.then_some(km_until_refuel);

    choose_trigger(km_until_tyre_change, refuel_candidate, config.tie_break).map(
        |(distance, trigger)| MaintenanceStop {
            distance,
            trigger,
            km_until_tyre_change,
            km_until_refuel,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_trigger_tie_break() {
        assert_eq!(
            choose_trigger(Some(500), Some(500), TieBreak::PreferRefuel),
            Some((500, MaintenanceKind::Refuel))
        );
        assert_eq!(
            choose_trigger(Some(500), Some(500), TieBreak::PreferTyreChange),
            Some((500, MaintenanceKind::TyreChange))
        );
    }

    #[test]
    fn test_choose_trigger_missing_candidates() {
        assert_eq!(choose_trigger(None, None, TieBreak::PreferRefuel), None);
        assert_eq!(
            choose_trigger(None, Some(10), TieBreak::PreferTyreChange),
            Some((10, MaintenanceKind::Refuel))
        );
        assert_eq!(
            choose_trigger(Some(10), None, TieBreak::PreferRefuel),
            Some((10, MaintenanceKind::TyreChange))
        );
    }

    #[test]
    fn test_most_worn_tie_goes_to_lowest_id() {
        use crate::models::tyre::Tyre;

        let tyres = vec![
            Tyre::from_parts(4, 2_000, true, None),
            Tyre::from_parts(2, 2_000, true, None),
            Tyre::from_parts(3, 1_000, true, None),
            Tyre::from_parts(1, 9_000, false, None),
        ];
        let car = Vehicle::from_parts("CAR_1".to_string(), 0, 4_000, 800, tyres);
        assert_eq!(most_worn_tyre(&car).map(Tyre::id), Some(2));
    }
}
