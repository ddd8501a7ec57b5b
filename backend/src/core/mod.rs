//! Core primitives shared by every simulation component

pub mod units;

pub use units::{format_fixed, parse_fixed, UnitsError, SCALE};
