//! Numerical helpers shared by the simulation and its monitoring.

pub mod stats;

pub use stats::{ks_critical_value, ks_statistic, mean_and_rms};
