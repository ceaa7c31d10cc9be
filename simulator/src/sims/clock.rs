//! Simulated wall clock advanced by Poisson inter-arrival times.

use serde::{Deserialize, Serialize};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Scale applied to the `nanoseconds` field when forming elapsed time.
///
/// `Legacy` multiplies nanoseconds by 1e-6, which is how the EEE analysis
/// chain has always combined the two timestamp fields. It is kept as the
/// default so that outputs stay comparable with existing data, even though it
/// is inconsistent with a true nanosecond unit: the sub-second part is
/// inflated by a factor 1000 and elapsed time is not monotone in the clock.
/// `Nanoseconds` applies the physically consistent 1e-9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ElapsedTimeScale {
    #[default]
    Legacy,
    Nanoseconds,
}

impl ElapsedTimeScale {
    pub fn factor(self) -> f64 {
        match self {
            ElapsedTimeScale::Legacy => 1e-6,
            ElapsedTimeScale::Nanoseconds => 1e-9,
        }
    }

    /// Combine timestamp fields into elapsed seconds.
    pub fn elapsed(self, seconds: u64, nanoseconds: u32) -> f64 {
        seconds as f64 + self.factor() * nanoseconds as f64
    }
}

/// Running simulated clock with nanosecond resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArrivalClock {
    total_nanos: u64,
}

impl ArrivalClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds, rounded to the nearest nanosecond.
    pub fn advance(&mut self, dt: f64) {
        let nanos = (dt.max(0.0) * NANOS_PER_SECOND as f64).round() as u64;
        self.total_nanos = self.total_nanos.saturating_add(nanos);
    }

    pub fn seconds(&self) -> u64 {
        self.total_nanos / NANOS_PER_SECOND
    }

    pub fn nanoseconds(&self) -> u32 {
        (self.total_nanos % NANOS_PER_SECOND) as u32
    }

    /// True elapsed time in seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.total_nanos as f64 / NANOS_PER_SECOND as f64
    }

    pub fn reset(&mut self) {
        self.total_nanos = 0;
    }
}
