//! Muon telescope model: station geometry plus trajectory sampling.
//!
//! A [`Telescope`] couples a station [`GeometryConfig`] with the two random
//! ingredients of a simulated muon: an entry point drawn uniformly on the top
//! plane, and a direction drawn from a [`MuonFluxService`]. The acceptance test
//! is purely geometric: the muon triggers when its track crosses the bottom
//! plane inside the active area.
//!
//! # Examples
//!
//! ```rust
//! use muon_simulator::flux::{FluxModel, MuonFluxService};
//! use muon_simulator::hardware::telescope::Telescope;
//! use rand::SeedableRng;
//!
//! let telescope = Telescope::base();
//! let flux = MuonFluxService::new(FluxModel::default()).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//!
//! let muon = telescope.shoot_muon(&flux, &mut rng).unwrap();
//! assert_eq!(muon.entry.z, telescope.z_top());
//! ```

use std::fmt;

use nalgebra::Point3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::GeometryConfig;
use super::stations::{StationRegistry, BASE_GEOMETRY};
use crate::error::SimResult;
use crate::flux::MuonFluxService;
use crate::track::Track;

/// Name reported for the base telescope.
pub const BASE_TELESCOPE_NAME: &str = "EEE base telescope";

/// Which geometry a run should use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationSelection {
    /// The fixed default geometry.
    Base,
    /// A station looked up by name in the registry.
    Named(String),
}

impl StationSelection {
    /// Label used for file names and log messages.
    pub fn label(&self) -> &str {
        match self {
            StationSelection::Base => "BASE",
            StationSelection::Named(name) => name,
        }
    }
}

impl fmt::Display for StationSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One generated muon, before any trigger annotation.
#[derive(Debug, Clone, Copy)]
pub struct MuonSample {
    pub track: Track,
    /// Entry point on the top plane.
    pub entry: Point3<f64>,
    /// Crossing point with the bottom plane.
    pub exit: Point3<f64>,
    /// Whether `exit` lies within the active area.
    pub triggered: bool,
}

/// A telescope station ready to shoot muons through.
#[derive(Debug, Clone)]
pub struct Telescope {
    name: String,
    geometry: GeometryConfig,
}

impl Telescope {
    pub fn new(name: impl Into<String>, geometry: GeometryConfig) -> Self {
        Self {
            name: name.into(),
            geometry,
        }
    }

    /// The base telescope with the fixed default geometry.
    pub fn base() -> Self {
        Self::new(BASE_TELESCOPE_NAME, BASE_GEOMETRY.clone())
    }

    /// Look up a station by name; fails with `UnknownStation` if absent.
    pub fn for_station(name: &str, registry: &StationRegistry) -> SimResult<Self> {
        let geometry = registry.get(name)?.clone();
        Ok(Self::new(name.trim().to_ascii_uppercase(), geometry))
    }

    pub fn from_selection(
        selection: &StationSelection,
        registry: &StationRegistry,
    ) -> SimResult<Self> {
        match selection {
            StationSelection::Base => Ok(Self::base()),
            StationSelection::Named(name) => Self::for_station(name, registry),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    pub fn z_bottom(&self) -> f64 {
        self.geometry.z_bottom()
    }

    pub fn z_top(&self) -> f64 {
        self.geometry.z_top()
    }

    /// Closed-bounds acceptance test on the detector plane.
    pub fn within_active_area(&self, x: f64, y: f64) -> bool {
        self.geometry.active_area().contains(x, y)
    }

    /// Uniform random point on the active area of the top plane.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point3<f64> {
        let area = self.geometry.active_area();
        let x = rng.gen_range(area.x_min..=area.x_max);
        let y = rng.gen_range(area.y_min..=area.y_max);
        Point3::new(x, y, self.z_top())
    }

    /// Generate one muon and decide whether it triggers.
    pub fn shoot_muon<R: Rng + ?Sized>(
        &self,
        flux: &MuonFluxService,
        rng: &mut R,
    ) -> SimResult<MuonSample> {
        let entry = self.random_point(rng);
        let direction = flux.random_direction(rng);
        let track = Track::new(entry, direction);
        let exit = track.point_at_z(self.z_bottom())?;
        Ok(MuonSample {
            track,
            entry,
            exit,
            triggered: self.within_active_area(exit.x, exit.y),
        })
    }
}

impl fmt::Display for Telescope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let area = self.geometry.active_area();
        write!(
            f,
            "{} ({:.1} x {:.1} cm, planes at z = {:.1} / {:.1} cm)",
            self.name,
            area.width(),
            area.height(),
            self.z_bottom(),
            self.z_top()
        )
    }
}
