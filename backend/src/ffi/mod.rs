//! Python bindings (feature `pyo3`)

pub mod fleet;
pub mod types;
