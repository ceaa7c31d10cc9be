use thiserror::Error;

/// Errors produced while configuring or running a muon simulation.
#[derive(Error, Debug)]
pub enum SimError {
    /// A geometry, flux or run parameter failed validation.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The requested station is not in the registry.
    #[error("unknown station: {0}")]
    UnknownStation(String),

    /// A track with no vertical component cannot reach another z-plane.
    #[error("degenerate trajectory (vz = {vz}) cannot be extrapolated along z")]
    DegenerateTrajectory {
        /// Vertical component of the offending direction.
        vz: f64,
    },

    /// The run finished without a single trigger, so no rate can be computed.
    #[error("no events triggered out of {generated} generated")]
    NoEventsTriggered {
        /// Number of muons generated during the run.
        generated: u64,
    },

    /// An operation was attempted in the wrong engine state.
    #[error("cannot {operation} while engine is {state}")]
    StateViolation {
        /// The rejected operation.
        operation: &'static str,
        /// Engine state at the time of the call.
        state: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
