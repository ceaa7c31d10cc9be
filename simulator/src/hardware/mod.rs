//! Telescope station geometry and acceptance.

pub mod geometry;
pub mod stations;
pub mod telescope;

pub use geometry::{ActiveArea, GeometryConfig};
pub use stations::{StationRegistry, DEFAULT_STATION};
pub use telescope::{MuonSample, StationSelection, Telescope};
