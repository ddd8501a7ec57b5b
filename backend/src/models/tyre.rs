//! Tyre model
//!
//! A tyre accumulates wear (percentage, i64 hundredths) while mounted on a
//! vehicle. Once worn to the degradation limit it is retired and stays in
//! the vehicle's history; it never returns to service.

use crate::core::units::{ratio_ceil, whole};
use serde::{Deserialize, Serialize};

/// Wear limit at which a tyre must be replaced (99.00%)
pub const DEFAULT_DEGRADATION_LIMIT: i64 = whole(99);

/// Wear accumulated per distance, as a rational `wear / per_km`
///
/// Both fields are i64 hundredths. The default is 1.00% of wear every
/// 3.00 km.
///
/// # Example
/// ```
/// use fleet_simulator_core_rs::models::tyre::DegradationRate;
///
/// let rate = DegradationRate::default();
/// assert_eq!(rate.wear_for_distance(30_000), 10_000); // 300 km -> 100%
/// assert_eq!(rate.distance_for_wear(9_900), 29_700); // 99% -> 297 km
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradationRate {
    /// Wear added (hundredths of a percent)...
    pub wear: i64,
    /// ...for this much distance (hundredths of a km)
    pub per_km: i64,
}

impl Default for DegradationRate {
    fn default() -> Self {
        Self {
            wear: whole(1),
            per_km: whole(3),
        }
    }
}

impl DegradationRate {
    /// Wear caused by `distance`, rounded up so any movement registers
    pub fn wear_for_distance(&self, distance: i64) -> i64 {
        ratio_ceil(distance, self.wear, self.per_km)
    }

    /// Distance needed to accumulate `wear`, rounded up so a stop placed
    /// there reaches the wear rather than falling just short of it
    pub fn distance_for_wear(&self, wear: i64) -> i64 {
        ratio_ceil(wear, self.per_km, self.wear)
    }

    pub fn is_valid(&self) -> bool {
        self.wear > 0 && self.per_km > 0
    }
}

/// A single tyre, mounted or retired
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tyre {
    /// Identity, unique within the owning vehicle and allocated in mount order
    id: u64,

    /// Accumulated wear (hundredths of a percent)
    wear: i64,

    /// Whether the tyre is currently mounted
    in_use: bool,

    /// Vehicle the tyre belongs (or belonged) to
    vehicle_id: Option<String>,
}

impl Tyre {
    /// Create a fresh, mounted tyre for a vehicle
    pub fn new(id: u64, vehicle_id: impl Into<String>) -> Self {
        Self {
            id,
            wear: 0,
            in_use: true,
            vehicle_id: Some(vehicle_id.into()),
        }
    }

    /// Restore a tyre from stored state
    pub fn from_parts(id: u64, wear: i64, in_use: bool, vehicle_id: Option<String>) -> Self {
        Self {
            id,
            wear: wear.max(0),
            in_use,
            vehicle_id,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn wear(&self) -> i64 {
        self.wear
    }

    pub fn in_use(&self) -> bool {
        self.in_use
    }

    pub fn vehicle_id(&self) -> Option<&str> {
        self.vehicle_id.as_deref()
    }

    /// Percentage left before the limit, never negative
    pub fn lifespan(&self, limit: i64) -> i64 {
        (limit - self.wear).max(0)
    }

    /// True once wear has reached the limit
    pub fn is_worn_out(&self, limit: i64) -> bool {
        self.wear >= limit
    }

    /// Accumulate wear for `distance`. Retired tyres are untouched.
    ///
    /// Returns the wear actually added.
    pub fn degrade(&mut self, distance: i64, rate: &DegradationRate) -> i64 {
        if !self.in_use || distance <= 0 {
            return 0;
        }
        let before = self.wear;
        self.wear = self.wear.saturating_add(rate.wear_for_distance(distance));
        self.wear - before
    }

    /// Take the tyre out of service. It keeps its wear and owner for history.
    pub fn retire(&mut self) {
        self.in_use = false;
    }
}
