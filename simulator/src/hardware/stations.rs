//! Registry of named telescope stations.
//!
//! The built-in table holds nominal geometries for a handful of EEE-style
//! stations: three MRPC chambers with a 158 cm x 82 cm active area stacked
//! with station-specific spacing. Additional stations can be merged in from a
//! JSON file mapping station names to [`GeometryConfig`] objects.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;

use super::geometry::{ActiveArea, GeometryConfig};
use crate::error::{SimError, SimResult};

/// Station simulated when none is requested on the command line.
pub const DEFAULT_STATION: &str = "SAVO-01";

/// Active area width of a nominal MRPC chamber [cm].
pub const CHAMBER_WIDTH_CM: f64 = 158.0;

/// Active area height of a nominal MRPC chamber [cm].
pub const CHAMBER_HEIGHT_CM: f64 = 82.0;

/// Top-to-bottom plane distance of the base telescope [cm].
pub const BASE_PLANE_SEPARATION_CM: f64 = 100.0;

fn nominal_geometry(plane_separation_cm: f64) -> GeometryConfig {
    let area = ActiveArea::centered(CHAMBER_WIDTH_CM, CHAMBER_HEIGHT_CM)
        .expect("nominal chamber area is valid");
    GeometryConfig::new(area, 0.0, plane_separation_cm).expect("nominal plane stack is valid")
}

/// Geometry of the base telescope used when no station is specified.
pub static BASE_GEOMETRY: Lazy<GeometryConfig> =
    Lazy::new(|| nominal_geometry(BASE_PLANE_SEPARATION_CM));

/// Built-in station table.
pub static BUILTIN_STATIONS: Lazy<StationRegistry> = Lazy::new(|| {
    let mut registry = StationRegistry::empty();
    // (name, top-to-bottom plane separation in cm)
    let table = [
        ("BOLO-01", 100.0),
        ("CAGL-01", 80.0),
        ("FRAS-02", 60.0),
        ("LAQU-01", 90.0),
        ("PISA-01", 80.0),
        ("ROMA-01", 100.0),
        ("SAVO-01", 80.0),
        ("TORI-01", 120.0),
    ];
    for (name, separation) in table {
        registry.insert(name, nominal_geometry(separation));
    }
    registry
});

/// Name-to-geometry lookup table. Names are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: BTreeMap<String, GeometryConfig>,
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

impl StationRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A copy of the built-in station table.
    pub fn builtin() -> Self {
        BUILTIN_STATIONS.clone()
    }

    /// Built-in stations plus those listed in a JSON file.
    pub fn with_json_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let mut registry = Self::builtin();
        registry.merge_json_file(path)?;
        Ok(registry)
    }

    /// Add or replace a station.
    pub fn insert(&mut self, name: &str, geometry: GeometryConfig) -> Option<GeometryConfig> {
        self.stations.insert(normalize(name), geometry)
    }

    /// Look up a station geometry.
    pub fn get(&self, name: &str) -> SimResult<&GeometryConfig> {
        self.stations
            .get(&normalize(name))
            .ok_or_else(|| SimError::UnknownStation(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stations.contains_key(&normalize(name))
    }

    /// Station names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Merge stations from a JSON object `{ "NAME": GeometryConfig, ... }`.
    ///
    /// Every geometry is validated before anything is inserted, so a bad file
    /// leaves the registry untouched. Returns the number of merged stations.
    pub fn merge_json_file(&mut self, path: impl AsRef<Path>) -> SimResult<usize> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        self.merge_json_str(&contents)
    }

    pub fn merge_json_str(&mut self, contents: &str) -> SimResult<usize> {
        let parsed: BTreeMap<String, GeometryConfig> = serde_json::from_str(contents)?;
        for geometry in parsed.values() {
            geometry.validate()?;
        }
        let count = parsed.len();
        for (name, geometry) in parsed {
            if self.insert(&name, geometry).is_some() {
                debug!("Station {name} overridden by registry file");
            }
        }
        Ok(count)
    }
}
