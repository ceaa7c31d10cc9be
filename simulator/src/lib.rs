//! Monte Carlo simulation of cosmic-ray muon telescopes
//!
//! This crate generates muons following a `cos^n(theta)` flux, propagates
//! them through the two-plane geometry of an EEE telescope station and
//! records the ones that trigger, stamped with Poisson arrival times.
//!
//! ```
//! use muon_simulator::hardware::Telescope;
//! use muon_simulator::flux::{FluxModel, MuonFluxService};
//! use muon_simulator::io::VecSink;
//! use muon_simulator::sims::{ElapsedTimeScale, SimulationEngine};
//!
//! let flux = MuonFluxService::new(FluxModel::default()).unwrap();
//! let mut engine = SimulationEngine::from_parts(
//!     Telescope::base(),
//!     flux,
//!     1_000,
//!     42,
//!     ElapsedTimeScale::Nanoseconds,
//! );
//! let mut sink = VecSink::new();
//! let summary = engine.run(&mut sink).unwrap();
//! assert_eq!(summary.num_triggered, sink.events.len() as u64);
//! ```

pub mod algo;
pub mod config;
pub mod error;
pub mod flux;
pub mod hardware;
pub mod io;
pub mod monitor;
pub mod shared_args;
pub mod sims;
pub mod track;

// Re-exports for easier access
pub use config::SimulationConfig;
pub use error::{SimError, SimResult};
pub use flux::{FluxModel, MuonFluxService};
pub use hardware::{GeometryConfig, StationRegistry, StationSelection, Telescope};
pub use io::{CsvEventWriter, EventSink, VecSink};
pub use sims::{ElapsedTimeScale, EventRecord, RunSummary, SimulationEngine};
pub use track::Track;
