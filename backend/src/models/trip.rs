//! Trip model
//!
//! A trip moves one vehicle over a fixed distance. Only the trip simulator
//! advances it; everything else reads it.
//!
//! # Lifecycle
//!
//! ```text
//! NotStarted ──► InProgress ──► Arrived    (terminal)
//!                    │     ├──► Stranded   (terminal, out of fuel)
//!                    │     └──► Stalled    (terminal, no progress possible)
//!                    └────────► Cancelled  (can be resumed)
//! ```
//!
//! # Critical Invariants
//!
//! 1. `0 <= traveled_distance <= total_distance`
//! 2. `traveled_distance` never decreases
//! 3. Events are appended in kilometre order and never edited

use crate::models::event::{Event, EventLog, EventTypeError, MaintenanceKind};
use serde::{Deserialize, Serialize};

/// Where a trip is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripStatus {
    NotStarted,
    InProgress,
    Arrived,
    Stranded,
    Cancelled,
    /// A zero-distance stop changed nothing; rerunning would fail the same way
    Stalled,
}

impl TripStatus {
    /// Arrived, Stranded and Stalled trips never run again
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TripStatus::Arrived | TripStatus::Stranded | TripStatus::Stalled
        )
    }

    /// Whether the simulator may (re)start this trip
    pub fn can_run(self) -> bool {
        matches!(self, TripStatus::NotStarted | TripStatus::Cancelled)
    }
}

/// A planned or running trip
///
/// # Example
/// ```
/// use fleet_simulator_core_rs::{Trip, TripStatus};
///
/// let trip = Trip::new("CAR_1".to_string(), 20_000); // 200 km
/// assert_eq!(trip.status(), TripStatus::NotStarted);
/// assert_eq!(trip.remaining_distance(), 20_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Unique trip identifier (UUID v4 unless given)
    id: String,

    /// Vehicle driving this trip
    vehicle_id: String,

    /// Distance to cover (i64 hundredths of a km, positive)
    total_distance: i64,

    /// Distance covered so far (i64 hundredths of a km)
    traveled_distance: i64,

    status: TripStatus,

    /// Maintenance events, in the order they happened
    events: EventLog,
}

impl Trip {
    /// Plan a trip with a generated id
    ///
    /// # Panics
    /// If `total_distance` is not positive.
    pub fn new(vehicle_id: String, total_distance: i64) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), vehicle_id, total_distance)
    }

    /// Plan a trip with a caller-chosen id
    ///
    /// # Panics
    /// If `total_distance` is not positive.
    pub fn with_id(id: String, vehicle_id: String, total_distance: i64) -> Self {
        assert!(total_distance > 0, "total_distance must be positive");
        Self {
            id,
            vehicle_id,
            total_distance,
            traveled_distance: 0,
            status: TripStatus::NotStarted,
            events: EventLog::new(),
        }
    }

    /// Restore a trip from stored state (no invariant checks, see `validate`)
    pub fn from_parts(
        id: String,
        vehicle_id: String,
        total_distance: i64,
        traveled_distance: i64,
        status: TripStatus,
        events: Vec<Event>,
    ) -> Self {
        let mut log = EventLog::new();
        for event in events {
            log.log(event);
        }
        Self {
            id,
            vehicle_id,
            total_distance,
            traveled_distance,
            status,
            events: log,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn total_distance(&self) -> i64 {
        self.total_distance
    }

    pub fn traveled_distance(&self) -> i64 {
        self.traveled_distance
    }

    pub fn remaining_distance(&self) -> i64 {
        (self.total_distance - self.traveled_distance).max(0)
    }

    pub fn status(&self) -> TripStatus {
        self.status
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn has_arrived_at_destination(&self) -> bool {
        self.traveled_distance >= self.total_distance
    }

    /// Whether a stop `next_stop_distance` ahead falls strictly before the
    /// destination. Without a distance, asks whether the trip needs any stop
    /// at all before arriving, which it never does.
    pub fn stop_needed_before_destination(&self, next_stop_distance: Option<i64>) -> bool {
        let distance = next_stop_distance.unwrap_or(self.total_distance);
        self.traveled_distance.saturating_add(distance) < self.total_distance
    }

    /// Record an event at `km` for a reference-table event type id
    ///
    /// Unknown ids are rejected and nothing is recorded.
    pub fn new_event(&mut self, km: i64, event_type_id: u8) -> Result<&Event, EventTypeError> {
        let kind = MaintenanceKind::from_id(event_type_id)?;
        self.events.log(Event::new(self.id.clone(), kind, km));
        Ok(&self.events.events()[self.events.len() - 1])
    }

    /// Record a maintenance event at the current position
    pub(crate) fn record_event(&mut self, kind: MaintenanceKind) -> Event {
        let event = Event::new(self.id.clone(), kind, self.traveled_distance);
        self.events.log(event.clone());
        event
    }

    /// Move forward, never past the destination
    pub(crate) fn advance(&mut self, distance: i64) {
        let step = distance.clamp(0, self.remaining_distance());
        self.traveled_distance += step;
    }

    pub(crate) fn set_status(&mut self, status: TripStatus) {
        self.status = status;
    }

    /// Check the record invariants
    pub fn validate(&self) -> Result<(), String> {
        if self.total_distance <= 0 {
            return Err(format!(
                "total_distance must be positive, got {}",
                self.total_distance
            ));
        }
        if self.traveled_distance < 0 || self.traveled_distance > self.total_distance {
            return Err(format!(
                "traveled_distance {} outside 0..={}",
                self.traveled_distance, self.total_distance
            ));
        }
        Ok(())
    }
}
