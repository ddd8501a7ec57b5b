//! Vehicle model
//!
//! A vehicle carries the two consumable resources the simulator tracks:
//! - Fuel tank (level and capacity in i64 hundredths of a liter)
//! - Tyres (mounted set plus the history of retired ones)
//!
//! The resource model lives here: consuming fuel, wearing tyres and
//! refuelling are plain mutations on the vehicle that either succeed fully
//! or fail without touching state.
//!
//! CRITICAL: All quantity values are i64 hundredths

use crate::core::units::{format_fixed, ratio_ceil, ratio_floor, SCALE};
use crate::models::tyre::{DegradationRate, Tyre};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of tyre slots on a vehicle
pub const DEFAULT_MAX_TYRES: usize = 4;

/// Errors that can occur during vehicle resource operations
#[derive(Debug, Error, PartialEq)]
pub enum VehicleError {
    #[error("Invalid amount: {amount} (must be non-negative)")]
    InvalidAmount { amount: i64 },

    #[error("Refuel of {amount} would exceed capacity: level {fuel_level}, capacity {fuel_capacity}")]
    OverCapacity {
        amount: i64,
        fuel_level: i64,
        fuel_capacity: i64,
    },

    #[error("Insufficient fuel: required {required}, available {available}")]
    InsufficientFuel { required: i64, available: i64 },

    #[error("No free tyre slot: {mounted} of {max} mounted")]
    TyreSlotFull { mounted: usize, max: usize },

    #[error("Invalid vehicle state: {0}")]
    InvalidState(String),
}

/// A fleet vehicle
///
/// # Example
/// ```
/// use fleet_simulator_core_rs::Vehicle;
///
/// let mut car = Vehicle::new("CAR_1".to_string(), 4_000, 800); // 40 l, 8 km/l
/// car.refuel(1_000).unwrap();
/// assert_eq!(car.fuel_level(), 1_000);
/// assert_eq!(car.tank_range(), 8_000); // 80 km
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique vehicle identifier (e.g., "CAR_1")
    id: String,

    /// Liters in the tank (i64 hundredths)
    fuel_level: i64,

    /// Tank capacity (i64 hundredths of a liter, positive)
    fuel_capacity: i64,

    /// Kilometres per liter (i64 hundredths, positive)
    fuel_efficiency: i64,

    /// Mounted tyres followed by retired ones, in mount order
    tyres: Vec<Tyre>,

    /// Next identity handed to a mounted tyre
    next_tyre_id: u64,
}

impl Vehicle {
    /// Create a vehicle with an empty tank and no tyres
    ///
    /// # Panics
    /// If `fuel_capacity` or `fuel_efficiency` is not positive.
    pub fn new(id: String, fuel_capacity: i64, fuel_efficiency: i64) -> Self {
        assert!(fuel_capacity > 0, "fuel_capacity must be positive");
        assert!(fuel_efficiency > 0, "fuel_efficiency must be positive");
        Self {
            id,
            fuel_level: 0,
            fuel_capacity,
            fuel_efficiency,
            tyres: Vec::new(),
            next_tyre_id: 1,
        }
    }

    /// Restore a vehicle from stored state (no invariant checks, see `validate`)
    pub fn from_parts(
        id: String,
        fuel_level: i64,
        fuel_capacity: i64,
        fuel_efficiency: i64,
        tyres: Vec<Tyre>,
    ) -> Self {
        let next_tyre_id = tyres.iter().map(Tyre::id).max().unwrap_or(0) + 1;
        Self {
            id,
            fuel_level,
            fuel_capacity,
            fuel_efficiency,
            tyres,
            next_tyre_id,
        }
    }

    /// Builder: set the starting fuel level
    ///
    /// # Panics
    /// If the level is negative or above capacity.
    pub fn with_fuel_level(mut self, fuel_level: i64) -> Self {
        assert!(
            (0..=self.fuel_capacity).contains(&fuel_level),
            "fuel_level must be within 0..=fuel_capacity"
        );
        self.fuel_level = fuel_level;
        self
    }

    /// Builder: mount `count` fresh tyres
    ///
    /// # Panics
    /// If `count` exceeds `max_tyres`.
    pub fn with_tyres(mut self, count: usize, max_tyres: usize) -> Self {
        for _ in 0..count {
            if let Err(e) = self.add_new_tyre(max_tyres) {
                panic!("cannot mount tyre: {}", e);
            }
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fuel_level(&self) -> i64 {
        self.fuel_level
    }

    pub fn fuel_capacity(&self) -> i64 {
        self.fuel_capacity
    }

    pub fn fuel_efficiency(&self) -> i64 {
        self.fuel_efficiency
    }

    /// All tyres ever mounted on this vehicle
    pub fn tyres(&self) -> &[Tyre] {
        &self.tyres
    }

    pub fn tyre(&self, id: u64) -> Option<&Tyre> {
        self.tyres.iter().find(|t| t.id() == id)
    }

    pub fn tyres_in_use(&self) -> impl Iterator<Item = &Tyre> {
        self.tyres.iter().filter(|t| t.in_use())
    }

    pub fn amount_in_use(&self) -> usize {
        self.tyres_in_use().count()
    }

    /// Mounted tyres worn to (or past) the limit
    pub fn replaceable_tyres(&self, limit: i64) -> Vec<u64> {
        self.tyres_in_use()
            .filter(|t| t.is_worn_out(limit))
            .map(Tyre::id)
            .collect()
    }

    /// Retired tyres that were worn out when taken off
    pub fn discarded_tyres(&self, limit: i64) -> impl Iterator<Item = &Tyre> {
        self.tyres
            .iter()
            .filter(move |t| !t.in_use() && t.is_worn_out(limit))
    }

    /// Whether at least one tyre slot is free
    pub fn is_missing_tyre(&self, max_tyres: usize) -> bool {
        self.amount_in_use() < max_tyres
    }

    /// Mount a fresh tyre in a free slot, returning its id
    pub fn add_new_tyre(&mut self, max_tyres: usize) -> Result<u64, VehicleError> {
        let mounted = self.amount_in_use();
        if mounted >= max_tyres {
            return Err(VehicleError::TyreSlotFull {
                mounted,
                max: max_tyres,
            });
        }

        let id = self.next_tyre_id;
        self.next_tyre_id += 1;
        self.tyres.push(Tyre::new(id, self.id.clone()));
        Ok(id)
    }

    /// Retire a mounted tyre. Returns false if no such mounted tyre exists.
    pub fn retire_tyre(&mut self, id: u64) -> bool {
        match self.tyres.iter_mut().find(|t| t.id() == id && t.in_use()) {
            Some(tyre) => {
                tyre.retire();
                true
            }
            None => false,
        }
    }

    /// Distance the current tank allows, rounded down
    pub fn tank_range(&self) -> i64 {
        ratio_floor(self.fuel_level, self.fuel_efficiency, SCALE)
    }

    /// Fuel needed to cover `distance`, rounded up (saturates at `i64::MAX`)
    pub fn fuel_for_distance(&self, distance: i64) -> i64 {
        ratio_ceil(distance, SCALE, self.fuel_efficiency)
    }

    /// Burn the fuel needed for `distance`
    ///
    /// Rejects with `InsufficientFuel` (no mutation) if the tank cannot
    /// cover the distance. Returns the liters consumed.
    pub fn consume_fuel(&mut self, distance: i64) -> Result<i64, VehicleError> {
        if distance < 0 {
            return Err(VehicleError::InvalidAmount { amount: distance });
        }

        let required = self.fuel_for_distance(distance);
        if required > self.fuel_level {
            return Err(VehicleError::InsufficientFuel {
                required,
                available: self.fuel_level,
            });
        }

        self.fuel_level -= required;
        Ok(required)
    }

    /// Burn fuel for up to `distance`, stopping when the tank runs dry
    ///
    /// Returns the distance actually covered.
    pub fn consume_fuel_clamped(&mut self, distance: i64) -> i64 {
        if distance <= 0 {
            return 0;
        }

        let range = self.tank_range();
        if distance <= range {
            self.fuel_level -= self.fuel_for_distance(distance);
            distance
        } else {
            self.fuel_level = 0;
            range
        }
    }

    /// Wear every mounted tyre for `distance`
    pub fn degrade_tyres(&mut self, distance: i64, rate: &DegradationRate) {
        for tyre in self.tyres.iter_mut().filter(|t| t.in_use()) {
            tyre.degrade(distance, rate);
        }
    }

    /// Apply every resource change caused by driving `distance`
    ///
    /// Fuel is checked first, so an `InsufficientFuel` rejection leaves the
    /// tyres untouched as well.
    pub fn travel(&mut self, distance: i64, rate: &DegradationRate) -> Result<(), VehicleError> {
        self.consume_fuel(distance)?;
        self.degrade_tyres(distance, rate);
        Ok(())
    }

    /// Add `amount` to the tank
    ///
    /// Returns the new level. Negative amounts and amounts that would
    /// overflow the tank are rejected without changing anything.
    ///
    /// # Example
    /// ```
    /// use fleet_simulator_core_rs::{Vehicle, VehicleError};
    ///
    /// let mut car = Vehicle::new("CAR_1".to_string(), 4_000, 800).with_fuel_level(1_000);
    /// assert!(matches!(car.refuel(5_000), Err(VehicleError::OverCapacity { .. })));
    /// assert_eq!(car.fuel_level(), 1_000);
    /// ```
    pub fn refuel(&mut self, amount: i64) -> Result<i64, VehicleError> {
        if amount < 0 {
            return Err(VehicleError::InvalidAmount { amount });
        }
        let new_level = match self.fuel_level.checked_add(amount) {
            Some(level) if level <= self.fuel_capacity => level,
            _ => {
                return Err(VehicleError::OverCapacity {
                    amount,
                    fuel_level: self.fuel_level,
                    fuel_capacity: self.fuel_capacity,
                })
            }
        };

        self.fuel_level = new_level;
        Ok(self.fuel_level)
    }

    /// Liters needed to fill the tank
    pub fn refuel_amount(&self) -> i64 {
        self.fuel_capacity - self.fuel_level
    }

    /// Check the record invariants
    pub fn validate(&self, max_tyres: usize) -> Result<(), VehicleError> {
        if self.fuel_capacity <= 0 {
            return Err(VehicleError::InvalidState(format!(
                "fuel_capacity must be positive, got {}",
                self.fuel_capacity
            )));
        }
        if self.fuel_efficiency <= 0 {
            return Err(VehicleError::InvalidState(format!(
                "fuel_efficiency must be positive, got {}",
                self.fuel_efficiency
            )));
        }
        if self.fuel_level < 0 || self.fuel_level > self.fuel_capacity {
            return Err(VehicleError::InvalidState(format!(
                "fuel_level {} outside 0..={}",
                self.fuel_level, self.fuel_capacity
            )));
        }
        let mounted = self.amount_in_use();
        if mounted > max_tyres {
            return Err(VehicleError::InvalidState(format!(
                "{} tyres mounted, limit is {}",
                mounted, max_tyres
            )));
        }
        Ok(())
    }

    /// Read-only view of the vehicle for external consumers
    pub fn status(&self) -> VehicleStatus {
        let most_worn = self.tyres_in_use().map(Tyre::wear).max();
        VehicleStatus {
            vehicle_id: self.id.clone(),
            current_gas_level: format_fixed(self.fuel_level),
            gas_capacity: format_fixed(self.fuel_capacity),
            tank_range_km: format_fixed(self.tank_range()),
            tyres_in_use: self.amount_in_use(),
            max_tyre_wear: most_worn.map(format_fixed),
        }
    }
}

/// Everything an external reader needs about a vehicle, as decimal strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleStatus {
    pub vehicle_id: String,
    pub current_gas_level: String,
    pub gas_capacity: String,
    pub tank_range_km: String,
    pub tyres_in_use: usize,
    /// `None` when no tyre is mounted
    pub max_tyre_wear: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car() -> Vehicle {
        Vehicle::new("CAR_1".to_string(), 4_000, 800)
    }

    #[test]
    #[should_panic(expected = "fuel_capacity must be positive")]
    fn test_zero_capacity_panics() {
        Vehicle::new("CAR_1".to_string(), 0, 800);
    }

    #[test]
    fn test_tyre_ids_continue_after_restore() {
        let tyres = vec![Tyre::from_parts(7, 0, true, Some("CAR_1".to_string()))];
        let mut vehicle = Vehicle::from_parts("CAR_1".to_string(), 0, 4_000, 800, tyres);
        assert_eq!(vehicle.add_new_tyre(4), Ok(8));
    }

    #[test]
    fn test_travel_rejection_leaves_tyres_untouched() {
        let rate = DegradationRate::default();
        let mut vehicle = car().with_fuel_level(100).with_tyres(2, 4);

        let result = vehicle.travel(100_000, &rate);
        assert!(matches!(result, Err(VehicleError::InsufficientFuel { .. })));
        assert_eq!(vehicle.fuel_level(), 100);
        assert!(vehicle.tyres_in_use().all(|t| t.wear() == 0));
    }

    #[test]
    fn test_status_formats_decimals() {
        let vehicle = car().with_fuel_level(1_050);
        let status = vehicle.status();
        assert_eq!(status.current_gas_level, "10.50");
        assert_eq!(status.gas_capacity, "40.00");
        assert_eq!(status.tank_range_km, "84.00");
        assert_eq!(status.max_tyre_wear, None);
    }
}
