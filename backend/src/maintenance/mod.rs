//! Maintenance Module
//!
//! Decides where a vehicle must stop and what happens when it does:
//! - `scheduler`: distance until each resource forces a stop, nearest wins
//! - `action`: tyre replacement and refuelling
//!
//! # Critical Invariants
//!
//! 1. **One trigger per stop**: a stop performs exactly one kind of action
//! 2. **No partial refuel**: a refuel either fills the tank or changes nothing
//! 3. **Slots respected**: a vehicle never mounts more than `max_tyres` tyres

pub mod action;
pub mod scheduler;

// Re-export public API
pub use action::{
    perform_maintenance, perform_maintenance_by_id, perform_refuel, perform_tyre_change,
    MaintenanceError, MaintenanceOutcome,
};
pub use scheduler::{
    choose_trigger, km_until_refuel, km_until_tyre_change, most_worn_tyre, next_maintenance_stop,
    MaintenanceStop, TieBreak,
};
