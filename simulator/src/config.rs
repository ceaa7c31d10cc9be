//! Validated run configuration.
//!
//! A [`SimulationConfig`] is assembled once (from command-line arguments or a
//! JSON file), validated, and then handed to the engine. Nothing in it changes
//! while the event loop runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::flux::FluxModel;
use crate::hardware::stations::DEFAULT_STATION;
use crate::hardware::telescope::StationSelection;
use crate::sims::clock::ElapsedTimeScale;

/// Number of muons generated when not specified.
pub const DEFAULT_NUM_EVENTS: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of generation loop iterations.
    pub num_events: u64,
    pub station: StationSelection,
    #[serde(default)]
    pub flux: FluxModel,
    /// RNG seed; a fresh one is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub elapsed_time_scale: ElapsedTimeScale,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_events: DEFAULT_NUM_EVENTS,
            station: StationSelection::Named(DEFAULT_STATION.to_string()),
            flux: FluxModel::default(),
            seed: None,
            elapsed_time_scale: ElapsedTimeScale::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.num_events == 0 {
            return Err(SimError::invalid(
                "num_events",
                "at least one event must be generated",
            ));
        }
        if let StationSelection::Named(name) = &self.station {
            if name.trim().is_empty() {
                return Err(SimError::invalid("station", "station name is empty"));
            }
        }
        self.flux.validate()
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_num_events(mut self, num_events: u64) -> Self {
        self.num_events = num_events;
        self
    }

    pub fn with_station(mut self, station: StationSelection) -> Self {
        self.station = station;
        self
    }

    pub fn with_flux(mut self, flux: FluxModel) -> Self {
        self.flux = flux;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_elapsed_time_scale(mut self, scale: ElapsedTimeScale) -> Self {
        self.elapsed_time_scale = scale;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        config.validate().unwrap();
        assert_eq!(config.num_events, 100_000);
        assert_eq!(config.station, StationSelection::Named("SAVO-01".to_string()));
        assert_eq!(config.flux.theta_exponent(), 2.0);
    }

    #[test]
    fn test_zero_events_rejected() {
        let config = SimulationConfig::default().with_num_events(0);
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidParameter { name: "num_events", .. })
        ));
    }

    #[test]
    fn test_blank_station_rejected() {
        let config =
            SimulationConfig::default().with_station(StationSelection::Named("  ".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_defaults_and_validation() {
        let json = r#"{"num_events": 500, "station": "Base", "seed": 3}"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
        assert_eq!(config.station, StationSelection::Base);
        assert_eq!(config.flux, FluxModel::default());
        assert_eq!(config.elapsed_time_scale, ElapsedTimeScale::Legacy);

        let json = r#"{
            "num_events": 10,
            "station": {"Named": "BOLO-01"},
            "flux": {"theta_exponent": -1.0, "rate_hz": 10.0, "theta_max": 1.0}
        }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }
}
