//! Test helpers for the muon simulator
//!
//! This crate provides common fixtures and output locations for the
//! integration tests of the muon simulator workspace.

use muon_simulator::flux::{FluxModel, MuonFluxService};
use muon_simulator::hardware::{ActiveArea, GeometryConfig, Telescope};
use muon_simulator::sims::{ElapsedTimeScale, SimulationEngine};
use once_cell::sync::Lazy;
use std::env;
use std::path::{Path, PathBuf};

/// Seed used by tests that only need some reproducible stream.
pub const TEST_SEED: u64 = 0x5eed_e3;

/// Error type for test helper operations
#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),
}

/// Returns the path to the project root directory.
///
/// Walks up from the current directory until it finds the `Cargo.toml`
/// that declares the workspace.
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let mut current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {}", e))
    })?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml).map_err(|e| {
                TestHelperError::ProjectRootNotFound(format!("Failed to read Cargo.toml: {}", e))
            })?;

            if content.contains("[workspace]") {
                return Ok(current_dir);
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Err(TestHelperError::ProjectRootNotFound(
        "Workspace root not found".to_string(),
    ))
}

/// Lazily initialized project root path
static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// Returns the directory for test artifacts (CSV files, summaries),
/// creating it if needed.
pub fn get_output_dir() -> PathBuf {
    let output_dir = PROJECT_ROOT.join("test_output");

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    }

    output_dir
}

/// Returns a path within the output directory.
pub fn output_path<P: AsRef<Path>>(path: P) -> PathBuf {
    get_output_dir().join(path)
}

/// A square `[-half, half]^2` station with planes at `z = 0` and `z = height`.
pub fn square_telescope(half: f64, height: f64) -> Telescope {
    let area = ActiveArea::new(-half, half, -half, half).expect("valid square area");
    let geometry = GeometryConfig::new(area, 0.0, height).expect("valid square geometry");
    Telescope::new(format!("square {}x{}", 2.0 * half, height), geometry)
}

/// Flux service with the default model and the given exponent.
pub fn flux_with_exponent(theta_exponent: f64) -> MuonFluxService {
    let defaults = FluxModel::default();
    let model = FluxModel::new(theta_exponent, defaults.rate_hz(), defaults.theta_max())
        .expect("valid flux model");
    MuonFluxService::new(model).expect("valid flux service")
}

/// Engine over the unit square station `[-1, 1]^2`, planes 10 cm apart.
pub fn unit_square_engine(num_events: u64, seed: u64) -> SimulationEngine {
    SimulationEngine::from_parts(
        square_telescope(1.0, 10.0),
        flux_with_exponent(2.0),
        num_events,
        seed,
        ElapsedTimeScale::Nanoseconds,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_root_exists() {
        let root = find_project_root().expect("Failed to find project root");
        assert!(root.exists());
        assert!(root.join("Cargo.toml").exists());
    }

    #[test]
    fn test_output_path() {
        let path = output_path("events.csv");
        assert_eq!(path, get_output_dir().join("events.csv"));
        assert!(get_output_dir().is_dir());
    }

    #[test]
    fn test_square_telescope() {
        let telescope = square_telescope(1.0, 10.0);
        assert_eq!(telescope.z_top(), 10.0);
        assert_eq!(telescope.z_bottom(), 0.0);
        assert!(telescope.within_active_area(1.0, -1.0));
        assert!(!telescope.within_active_area(1.01, 0.0));
    }
}
