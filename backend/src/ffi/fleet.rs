//! PyO3 wrapper for Fleet
//!
//! This module provides the Python interface to the Rust fleet runner. The
//! Python side owns persistence: it loads records, hands them over as
//! dicts, runs trips and writes the returned state back.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{
    events_to_py, parse_simulation_config, parse_trip, parse_vehicle, trip_report_to_py,
    vehicle_status_to_py,
};
use crate::models::state::FleetState;
use crate::orchestrator::{Fleet, SimulationConfig};

/// Python wrapper for Rust Fleet
///
/// # Example (from Python)
///
/// ```python
/// from fleet_simulator_core_rs import Fleet
///
/// fleet = Fleet({"tie_break": "refuel"})
/// fleet.add_vehicle({"id": "CAR_1", "gas_capacity": "40.00",
///                    "kms_per_liter": "8.00", "current_gas_level": "20.00",
///                    "tyres": 4})
/// trip_id = fleet.add_trip({"vehicle_id": "CAR_1", "distance": "200.00"})
/// report = fleet.run_trip(trip_id)
/// print(report["outcome"], report["events"])
/// ```
#[pyclass(name = "Fleet")]
pub struct PyFleet {
    inner: Fleet,
}

#[pymethods]
impl PyFleet {
    /// Create an empty fleet, optionally from a config dict
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let config = match config {
            Some(dict) => parse_simulation_config(dict)?,
            None => SimulationConfig::default(),
        };

        let inner = Fleet::new(config, FleetState::default())
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(PyFleet { inner })
    }

    /// Add (or replace) a vehicle
    fn add_vehicle(&mut self, vehicle: &Bound<'_, PyDict>) -> PyResult<()> {
        let vehicle = parse_vehicle(vehicle, self.inner.config().max_tyres)?;
        self.inner.add_vehicle(vehicle);
        Ok(())
    }

    /// Add a trip and return its id
    fn add_trip(&mut self, trip: &Bound<'_, PyDict>) -> PyResult<String> {
        let trip = parse_trip(trip)?;
        let trip_id = trip.id().to_string();
        self.inner
            .add_trip(trip)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(trip_id)
    }

    /// Simulate one trip and return its report
    fn run_trip<'py>(&mut self, py: Python<'py>, trip_id: &str) -> PyResult<Bound<'py, PyDict>> {
        let report = self
            .inner
            .run_trip(trip_id)
            .map_err(|e| PyRuntimeError::new_err(format!("Trip simulation failed: {}", e)))?;
        trip_report_to_py(py, &report)
    }

    /// Simulate every pending trip
    ///
    /// Returns a list of reports; failed trips appear as
    /// `{"trip_id": ..., "error": ...}`.
    fn run_pending<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyList>> {
        let summary = py.allow_threads(|| self.inner.run_pending());

        let list = PyList::empty(py);
        for report in &summary.reports {
            list.append(trip_report_to_py(py, report)?)?;
        }
        for (trip_id, error) in &summary.failures {
            let dict = PyDict::new(py);
            dict.set_item("trip_id", trip_id)?;
            dict.set_item("error", error.to_string())?;
            list.append(dict)?;
        }
        Ok(list)
    }

    /// Current state of a vehicle, or None if unknown
    fn vehicle_status<'py>(
        &self,
        py: Python<'py>,
        vehicle_id: &str,
    ) -> PyResult<Option<Bound<'py, PyDict>>> {
        self.inner
            .state()
            .get_vehicle(vehicle_id)
            .map(|v| vehicle_status_to_py(py, &v.status()))
            .transpose()
    }

    /// All events recorded for a trip, or None if unknown
    fn trip_events<'py>(
        &self,
        py: Python<'py>,
        trip_id: &str,
    ) -> PyResult<Option<Bound<'py, PyList>>> {
        self.inner
            .state()
            .get_trip(trip_id)
            .map(|t| events_to_py(py, t.events().events()))
            .transpose()
    }

    /// Serialize the fleet to a JSON checkpoint
    fn save_checkpoint(&self) -> PyResult<String> {
        self.inner
            .save_checkpoint()
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Restore a fleet from a JSON checkpoint taken under the same config
    #[staticmethod]
    #[pyo3(signature = (json, config=None))]
    fn load_checkpoint(json: &str, config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let config = match config {
            Some(dict) => parse_simulation_config(dict)?,
            None => SimulationConfig::default(),
        };
        let inner = Fleet::load_checkpoint(config, json)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(PyFleet { inner })
    }
}
