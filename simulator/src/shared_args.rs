use std::path::PathBuf;

use clap::Parser;

use crate::config::{SimulationConfig, DEFAULT_NUM_EVENTS};
use crate::error::SimResult;
use crate::flux::{FluxModel, DEFAULT_RATE_HZ, DEFAULT_THETA_EXPONENT, DEFAULT_THETA_MAX_DEG};
use crate::hardware::stations::DEFAULT_STATION;
use crate::hardware::telescope::{StationSelection, Telescope, BASE_TELESCOPE_NAME};
use crate::sims::clock::ElapsedTimeScale;

/// Station name selecting the base telescope geometry.
pub const BASE_STATION_ARG: &str = "base";

/// Command line arguments of the fast muon telescope simulator
#[derive(Parser, Debug, Clone)]
#[command(
    name = "e3sim",
    about = "EEE fast simulator: Monte Carlo of cosmic-ray muons through a telescope",
    long_about = None
)]
pub struct SimulationArgs {
    /// Path to the output CSV file (default: <station>_mc.csv)
    #[arg(short = 'o', long)]
    pub output_file: Option<PathBuf>,

    /// Number of events to generate
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_EVENTS)]
    pub num_events: u64,

    /// Telescope to simulate ("base" for the default geometry)
    #[arg(short = 's', long, default_value = DEFAULT_STATION)]
    pub station: String,

    /// Power of the cos(theta) term in the muon flux
    #[arg(short = 'p', long, default_value_t = DEFAULT_THETA_EXPONENT)]
    pub theta_power: f64,

    /// Mean arrival rate of triggered muons in Hz
    #[arg(long, default_value_t = DEFAULT_RATE_HZ)]
    pub rate: f64,

    /// Zenith angle cutoff in degrees
    #[arg(long, default_value_t = DEFAULT_THETA_MAX_DEG)]
    pub theta_max_deg: f64,

    /// Seed for the random number generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON file with additional station geometries
    #[arg(long)]
    pub stations_file: Option<PathBuf>,

    /// JSON run configuration; overrides the simulation options above
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Scale nanoseconds by 1e-9 instead of the legacy 1e-6 in elapsed time
    #[arg(long, default_value_t = false)]
    pub nanosecond_time_scale: bool,

    /// Run interactively (show the monitoring plots)
    #[arg(short = 'i', long, default_value_t = false)]
    pub interactive: bool,

    /// List the known stations and exit
    #[arg(long, default_value_t = false)]
    pub list_stations: bool,
}

impl SimulationArgs {
    pub fn station_selection(&self) -> StationSelection {
        if self.station.eq_ignore_ascii_case(BASE_STATION_ARG) {
            StationSelection::Base
        } else {
            StationSelection::Named(self.station.clone())
        }
    }

    /// Build the validated run configuration.
    pub fn to_config(&self) -> SimResult<SimulationConfig> {
        if let Some(path) = &self.config {
            return SimulationConfig::from_file(path);
        }
        let flux = FluxModel::new(self.theta_power, self.rate, self.theta_max_deg.to_radians())?;
        let scale = if self.nanosecond_time_scale {
            ElapsedTimeScale::Nanoseconds
        } else {
            ElapsedTimeScale::Legacy
        };
        let mut config = SimulationConfig::default()
            .with_num_events(self.num_events)
            .with_station(self.station_selection())
            .with_flux(flux)
            .with_elapsed_time_scale(scale);
        config.seed = self.seed;
        config.validate()?;
        Ok(config)
    }

    /// Output path; defaults to `<STATION>_mc.csv` with the registry's
    /// normalized station name, or `BASE_mc.csv` for the base geometry.
    pub fn output_path(&self, telescope: &Telescope) -> PathBuf {
        self.output_file.clone().unwrap_or_else(|| {
            let label = if telescope.name() == BASE_TELESCOPE_NAME {
                StationSelection::Base.label()
            } else {
                telescope.name()
            };
            PathBuf::from(format!("{label}_mc.csv"))
        })
    }
}
