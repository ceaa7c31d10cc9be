//! Event loop orchestration and its output records.

pub mod clock;
pub mod engine;
pub mod record;

pub use clock::{ArrivalClock, ElapsedTimeScale};
pub use engine::{EngineState, SimulationEngine, StepOutcome};
pub use record::{EventRecord, RunStatistics, RunSummary, EVENT_SCHEMA_VERSION};
