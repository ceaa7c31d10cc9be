//! ASCII visualization for simulation monitoring.
//!
//! Plots are rendered as plain text so they can be printed to a terminal or
//! embedded in log files without a graphical display.
//!
//! ```rust
//! use viz::histogram::Histogram;
//!
//! let mut hist = Histogram::new(0.0, 1.0, 10)?.with_title("cos(theta)");
//! hist.fill_all([0.95, 0.91, 0.87, 0.99]);
//! println!("{}", hist.format()?);
//! # Ok::<(), viz::VizError>(())
//! ```

pub mod histogram;

use thiserror::Error;

/// Errors produced while building or rendering plots.
#[derive(Error, Debug)]
pub enum VizError {
    #[error("histogram error: {0}")]
    HistogramError(String),

    #[error("formatting error: {0}")]
    FmtError(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, VizError>;
