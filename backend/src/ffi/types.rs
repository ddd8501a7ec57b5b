//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList).
//! Quantities cross the boundary as decimal strings, the same form the
//! Python persistence layer stores them in; plain ints and floats are
//! accepted too.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::core::units::{format_fixed, parse_fixed};
use crate::maintenance::TieBreak;
use crate::models::event::Event;
use crate::models::trip::Trip;
use crate::models::tyre::DegradationRate;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::orchestrator::{SimulationConfig, TripOutcome, TripReport};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with a clear error message.
fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| PyValueError::new_err(format!("Missing required field '{}'", key)))?
        .extract()
}

/// Extract an optional field from a Python dict.
fn extract_optional<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(value.extract()?)),
        _ => Ok(None),
    }
}

/// Read a decimal quantity (str, int or float) as i64 hundredths.
fn to_fixed(value: &Bound<'_, PyAny>, key: &str) -> PyResult<i64> {
    let text = if let Ok(s) = value.extract::<String>() {
        s
    } else if let Ok(i) = value.extract::<i64>() {
        i.to_string()
    } else if let Ok(f) = value.extract::<f64>() {
        format!("{:.2}", f)
    } else {
        return Err(PyValueError::new_err(format!(
            "Field '{}' must be a decimal number",
            key
        )));
    };

    parse_fixed(&text).map_err(|e| PyValueError::new_err(format!("Field '{}': {}", key, e)))
}

fn extract_fixed(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<i64> {
    let value = dict
        .get_item(key)?
        .ok_or_else(|| PyValueError::new_err(format!("Missing required field '{}'", key)))?;
    to_fixed(&value, key)
}

fn extract_fixed_optional(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<Option<i64>> {
    match dict.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(to_fixed(&value, key)?)),
        _ => Ok(None),
    }
}

// ========================================================================
// Parsers
// ========================================================================

/// Convert Python dict to SimulationConfig; missing keys keep defaults
pub fn parse_simulation_config(py_config: &Bound<'_, PyDict>) -> PyResult<SimulationConfig> {
    let mut config = SimulationConfig::default();

    if let Some(wear) = extract_fixed_optional(py_config, "degradation_wear")? {
        config.degradation_rate = DegradationRate {
            wear,
            per_km: extract_fixed_optional(py_config, "degradation_per_km")?
                .unwrap_or(config.degradation_rate.per_km),
        };
    } else if let Some(per_km) = extract_fixed_optional(py_config, "degradation_per_km")? {
        config.degradation_rate.per_km = per_km;
    }

    if let Some(limit) = extract_fixed_optional(py_config, "degradation_limit")? {
        config.degradation_limit = limit;
    }
    if let Some(max_tyres) = extract_optional::<usize>(py_config, "max_tyres")? {
        config.max_tyres = max_tyres;
    }
    if let Some(tie_break) = extract_optional::<String>(py_config, "tie_break")? {
        config.tie_break = match tie_break.as_str() {
            "refuel" | "PreferRefuel" => TieBreak::PreferRefuel,
            "tyre_change" | "PreferTyreChange" => TieBreak::PreferTyreChange,
            other => {
                return Err(PyValueError::new_err(format!(
                    "Invalid tie_break: '{}'. Must be 'refuel' or 'tyre_change'",
                    other
                )))
            }
        };
    }
    config.refuel_limit = extract_optional::<u32>(py_config, "refuel_limit")?;

    config
        .validate()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(config)
}

/// Convert Python dict to Vehicle
///
/// Keys: `id`, `gas_capacity`, `kms_per_liter`, optional
/// `current_gas_level` (default 0) and `tyres` (number of fresh tyres).
pub fn parse_vehicle(py_vehicle: &Bound<'_, PyDict>, max_tyres: usize) -> PyResult<Vehicle> {
    let id: String = extract_required(py_vehicle, "id")?;
    let capacity = extract_fixed(py_vehicle, "gas_capacity")?;
    let efficiency = extract_fixed(py_vehicle, "kms_per_liter")?;
    let level = extract_fixed_optional(py_vehicle, "current_gas_level")?.unwrap_or(0);
    let tyres = extract_optional::<usize>(py_vehicle, "tyres")?.unwrap_or(0);

    if capacity <= 0 || efficiency <= 0 {
        return Err(PyValueError::new_err(
            "gas_capacity and kms_per_liter must be positive",
        ));
    }
    if !(0..=capacity).contains(&level) {
        return Err(PyValueError::new_err(
            "current_gas_level must be between 0 and gas_capacity",
        ));
    }
    if tyres > max_tyres {
        return Err(PyValueError::new_err(format!(
            "tyres must be at most {}",
            max_tyres
        )));
    }

    Ok(Vehicle::new(id, capacity, efficiency)
        .with_fuel_level(level)
        .with_tyres(tyres, max_tyres))
}

/// Convert Python dict to Trip
///
/// Keys: `vehicle_id`, `distance`, optional `id`.
pub fn parse_trip(py_trip: &Bound<'_, PyDict>) -> PyResult<Trip> {
    let vehicle_id: String = extract_required(py_trip, "vehicle_id")?;
    let distance = extract_fixed(py_trip, "distance")?;
    if distance <= 0 {
        return Err(PyValueError::new_err("distance must be positive"));
    }

    Ok(match extract_optional::<String>(py_trip, "id")? {
        Some(id) => Trip::with_id(id, vehicle_id, distance),
        None => Trip::new(vehicle_id, distance),
    })
}

// ========================================================================
// Converters
// ========================================================================

pub fn vehicle_status_to_py<'py>(
    py: Python<'py>,
    status: &VehicleStatus,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("vehicle_id", &status.vehicle_id)?;
    dict.set_item("current_gas_level", &status.current_gas_level)?;
    dict.set_item("gas_capacity", &status.gas_capacity)?;
    dict.set_item("tank_range_km", &status.tank_range_km)?;
    dict.set_item("tyres_in_use", status.tyres_in_use)?;
    dict.set_item("max_tyre_wear", status.max_tyre_wear.clone())?;
    Ok(dict)
}

pub fn event_to_py<'py>(py: Python<'py>, event: &Event) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("trip_id", event.trip_id())?;
    dict.set_item("event_type_id", event.kind().id())?;
    dict.set_item("description", event.kind().description())?;
    dict.set_item("km", format_fixed(event.km()))?;
    Ok(dict)
}

pub fn events_to_py<'py>(py: Python<'py>, events: &[Event]) -> PyResult<Bound<'py, PyList>> {
    let list = PyList::empty(py);
    for event in events {
        list.append(event_to_py(py, event)?)?;
    }
    Ok(list)
}

/// Convert TripReport to Python dict
pub fn trip_report_to_py<'py>(py: Python<'py>, report: &TripReport) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("trip_id", &report.trip_id)?;

    match report.outcome {
        TripOutcome::Arrived => {
            dict.set_item("outcome", "arrived")?;
        }
        TripOutcome::Stranded { km, fuel_shortfall } => {
            dict.set_item("outcome", "stranded")?;
            dict.set_item("stranded_at_km", format_fixed(km))?;
            dict.set_item("fuel_shortfall", format_fixed(fuel_shortfall))?;
        }
        TripOutcome::Cancelled { km } => {
            dict.set_item("outcome", "cancelled")?;
            dict.set_item("cancelled_at_km", format_fixed(km))?;
        }
    }

    dict.set_item("stops", report.stops)?;
    dict.set_item("events", events_to_py(py, &report.events)?)?;
    dict.set_item("vehicle", vehicle_status_to_py(py, &report.vehicle)?)?;
    Ok(dict)
}
