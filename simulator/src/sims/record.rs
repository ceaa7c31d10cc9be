//! Per-event output records and run-level statistics.

use serde::{Deserialize, Serialize};

use super::clock::ElapsedTimeScale;
use crate::error::{SimError, SimResult};

/// Version of the [`EventRecord`] column layout.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

/// Run number assigned to simulated data.
pub const MC_RUN_NUMBER: u32 = 0;

/// Status code of a good simulated event.
pub const MC_STATUS_OK: u32 = 0;

/// Annotated record of one triggered muon.
///
/// Column names follow the EEE event tree conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventRecord {
    pub run_number: u32,
    /// Index of the generation loop iteration, untriggered attempts included.
    pub event_number: u64,
    pub status_code: u32,
    pub seconds: u64,
    pub nanoseconds: u32,
    /// `seconds + scale * nanoseconds`, see [`ElapsedTimeScale`].
    pub elapsed_time: f64,
    /// Elapsed time since the previous triggered event, 0 for the first.
    pub delta_time: f64,
    /// Zenith angle [rad].
    pub theta: f64,
    /// Azimuth of the arrival direction [rad].
    pub phi: f64,
    pub x_top: f64,
    pub y_top: f64,
    pub x_bottom: f64,
    pub y_bottom: f64,
    /// Path length between the top and bottom planes [cm].
    pub track_length: f64,
}

/// Running counters of one simulation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    num_generated: u64,
    num_triggered: u64,
    last_elapsed_time: Option<f64>,
}

impl RunStatistics {
    pub(crate) fn record_generated(&mut self) {
        self.num_generated += 1;
    }

    pub(crate) fn record_triggered(&mut self, elapsed_time: f64) {
        debug_assert!(self.num_triggered < self.num_generated);
        self.num_triggered += 1;
        self.last_elapsed_time = Some(elapsed_time);
    }

    pub fn num_generated(&self) -> u64 {
        self.num_generated
    }

    pub fn num_triggered(&self) -> u64 {
        self.num_triggered
    }

    /// Elapsed time of the last triggered event, absent if none triggered.
    pub fn last_elapsed_time(&self) -> Option<f64> {
        self.last_elapsed_time
    }

    /// Fraction of generated muons that triggered, in `[0, 1]`.
    pub fn fraction_triggered(&self) -> f64 {
        if self.num_generated == 0 {
            0.0
        } else {
            self.num_triggered as f64 / self.num_generated as f64
        }
    }

    /// Triggers per second of simulated time.
    ///
    /// Fails with [`SimError::NoEventsTriggered`] when nothing triggered.
    pub fn trigger_rate(&self) -> SimResult<f64> {
        match self.last_elapsed_time {
            None => Err(SimError::NoEventsTriggered {
                generated: self.num_generated,
            }),
            Some(elapsed) if elapsed <= 0.0 => Err(SimError::invalid(
                "elapsed_time",
                format!("cannot compute a rate over {elapsed} s of simulated time"),
            )),
            Some(elapsed) => Ok(self.num_triggered as f64 / elapsed),
        }
    }
}

/// Terminal summary of a completed run, handed to the output collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub schema_version: u32,
    pub station: String,
    pub seed: u64,
    pub num_events: u64,
    pub num_generated: u64,
    pub num_triggered: u64,
    pub fraction_triggered: f64,
    pub trigger_rate_hz: f64,
    pub elapsed_time: f64,
    pub theta_exponent: f64,
    pub rate_hz: f64,
    pub elapsed_time_scale: ElapsedTimeScale,
}
