//! Simulation configuration
//!
//! Degradation rate, wear limit, tyre slots and scheduling policy are
//! immutable values handed to every simulator call. Nothing in the crate
//! keeps them in global state.
//!
//! # Example
//!
//! ```rust
//! use fleet_simulator_core_rs::{SimulationConfig, TieBreak};
//!
//! let config = SimulationConfig::from_json(r#"{ "tie_break": "PreferTyreChange" }"#).unwrap();
//! assert_eq!(config.tie_break, TieBreak::PreferTyreChange);
//! assert_eq!(config.max_tyres, 4);
//! ```

use crate::maintenance::TieBreak;
use crate::models::tyre::{DegradationRate, DEFAULT_DEGRADATION_LIMIT};
use crate::models::vehicle::DEFAULT_MAX_TYRES;
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};

/// Parameters shared by every trip a simulator runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Tyre wear per distance driven
    pub degradation_rate: DegradationRate,

    /// Wear (i64 hundredths of a percent) at which a tyre is replaced
    pub degradation_limit: i64,

    /// Tyre slots per vehicle
    pub max_tyres: usize,

    /// Winner when tyre and fuel stops coincide
    pub tie_break: TieBreak,

    /// Maximum refuel stops per trip (`None` = unlimited)
    ///
    /// Once the budget is spent the scheduler stops offering refuels and a
    /// vehicle that runs dry is stranded.
    pub refuel_limit: Option<u32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            degradation_rate: DegradationRate::default(),
            degradation_limit: DEFAULT_DEGRADATION_LIMIT,
            max_tyres: DEFAULT_MAX_TYRES,
            tie_break: TieBreak::default(),
            refuel_limit: None,
        }
    }
}

impl SimulationConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SimulationError::InvalidConfig(format!("Malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.degradation_rate.is_valid() {
            return Err(SimulationError::InvalidConfig(format!(
                "degradation_rate must be positive, got {}/{}",
                self.degradation_rate.wear, self.degradation_rate.per_km
            )));
        }
        if self.degradation_limit <= 0 {
            return Err(SimulationError::InvalidConfig(format!(
                "degradation_limit must be positive, got {}",
                self.degradation_limit
            )));
        }
        if self.max_tyres == 0 {
            return Err(SimulationError::InvalidConfig(
                "max_tyres must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether another refuel stop fits in the budget
    pub fn refuel_allowed(&self, refuels_so_far: u32) -> bool {
        self.refuel_limit.map_or(true, |limit| refuels_so_far < limit)
    }
}
