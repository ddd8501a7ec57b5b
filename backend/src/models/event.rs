//! Maintenance events recorded during a trip
//!
//! Every maintenance action that changes a vehicle produces exactly one
//! immutable `Event`. A trip keeps its events in an append-only `EventLog`
//! whose insertion order is also kilometre order.
//!
//! # Event Types
//!
//! The event-type reference table is static:
//!
//! | id | kind         | description   |
//! |----|--------------|---------------|
//! | 1  | `TyreChange` | "Tyre Change" |
//! | 2  | `Refuel`     | "Refuel"      |
//!
//! # Example
//!
//! ```rust
//! use fleet_simulator_core_rs::models::event::{Event, MaintenanceKind};
//!
//! let event = Event::new("trip_1".to_string(), MaintenanceKind::Refuel, 16_000);
//! assert_eq!(event.kind().id(), 2);
//! assert_eq!(event.km(), 16_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by the event-type reference table
#[derive(Debug, Error, PartialEq)]
pub enum EventTypeError {
    #[error("No event type found with id {0}")]
    NoEventTypeFound(u8),
}

/// Maintenance that can interrupt a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaintenanceKind {
    TyreChange,
    Refuel,
}

impl MaintenanceKind {
    /// Every known kind, in id order
    pub const ALL: [MaintenanceKind; 2] = [MaintenanceKind::TyreChange, MaintenanceKind::Refuel];

    /// Stable reference-table id
    pub const fn id(self) -> u8 {
        match self {
            MaintenanceKind::TyreChange => 1,
            MaintenanceKind::Refuel => 2,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            MaintenanceKind::TyreChange => "Tyre Change",
            MaintenanceKind::Refuel => "Refuel",
        }
    }

    /// Look up a kind by reference-table id
    pub fn from_id(id: u8) -> Result<Self, EventTypeError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or(EventTypeError::NoEventTypeFound(id))
    }
}

impl fmt::Display for MaintenanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Immutable record of one maintenance stop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    trip_id: String,
    kind: MaintenanceKind,
    /// Trip distance at which the stop happened (i64 hundredths of a km)
    km: i64,
}

impl Event {
    pub fn new(trip_id: String, kind: MaintenanceKind, km: i64) -> Self {
        Self { trip_id, kind, km }
    }

    pub fn trip_id(&self) -> &str {
        &self.trip_id
    }

    pub fn kind(&self) -> MaintenanceKind {
        self.kind
    }

    pub fn km(&self) -> i64 {
        self.km
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on Trip ({})", self.kind, self.trip_id)
    }
}

/// Append-only event log
///
/// A thin wrapper around `Vec<Event>` that offers no way to edit or remove
/// a recorded event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events of one maintenance kind, in order
    pub fn events_of_kind(&self, kind: MaintenanceKind) -> Vec<&Event> {
        self.events.iter().filter(|e| e.kind() == kind).collect()
    }

    /// Events recorded from index `start` onwards
    pub fn since(&self, start: usize) -> &[Event] {
        self.events.get(start..).unwrap_or(&[])
    }
}
