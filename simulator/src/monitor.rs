//! Monitoring plots for a simulation run.
//!
//! [`MonitoredSink`] sits between the engine and the real output and fills a
//! [`RunMonitor`] with the kinematics of every triggered event. At the end of
//! the run the monitor renders ASCII histograms and checks the triggered
//! `cos(theta)` distribution against the generated `cos^n` law.

use std::f64::consts::TAU;

use viz::histogram::{Histogram, Scale};

use crate::algo::stats::{ks_statistic, mean_and_rms};
use crate::error::{SimError, SimResult};
use crate::flux::MuonFluxService;
use crate::hardware::telescope::Telescope;
use crate::io::sink::EventSink;
use crate::sims::record::{EventRecord, RunSummary};

const NUM_BINS: usize = 25;

fn viz_error(e: viz::VizError) -> SimError {
    SimError::invalid("monitor", e.to_string())
}

/// Histograms of the triggered event stream.
#[derive(Debug, Clone)]
pub struct RunMonitor {
    cos_theta: Histogram,
    phi: Histogram,
    delta_time: Histogram,
    x_bottom: Histogram,
    y_bottom: Histogram,
    cos_theta_values: Vec<f64>,
}

impl RunMonitor {
    /// Size the histograms for a telescope and flux model.
    pub fn new(telescope: &Telescope, flux: &MuonFluxService) -> SimResult<Self> {
        let area = telescope.geometry().active_area();
        // Mean trigger spacing; the delta-time axis covers ten of them.
        let max_delta = 10.0 / flux.model().rate_hz();
        Ok(Self {
            cos_theta: Histogram::new(flux.model().cos_theta_min(), 1.0, NUM_BINS)
                .map_err(viz_error)?
                .with_title("cos(theta) of triggered muons"),
            phi: Histogram::new(0.0, TAU, NUM_BINS)
                .map_err(viz_error)?
                .with_title("phi [rad]"),
            delta_time: Histogram::new(0.0, max_delta, NUM_BINS)
                .map_err(viz_error)?
                .with_title("Delta time [s]")
                .with_scale(Scale::Log10),
            x_bottom: Histogram::new(area.x_min, area.x_max, NUM_BINS)
                .map_err(viz_error)?
                .with_title("x on bottom plane [cm]"),
            y_bottom: Histogram::new(area.y_min, area.y_max, NUM_BINS)
                .map_err(viz_error)?
                .with_title("y on bottom plane [cm]"),
            cos_theta_values: Vec::new(),
        })
    }

    pub fn fill(&mut self, event: &EventRecord) {
        let cos_theta = event.theta.cos();
        self.cos_theta.fill(cos_theta);
        self.cos_theta_values.push(cos_theta);
        self.phi.fill(event.phi);
        self.delta_time.fill(event.delta_time);
        self.x_bottom.fill(event.x_bottom);
        self.y_bottom.fill(event.y_bottom);
    }

    pub fn cos_theta(&self) -> &Histogram {
        &self.cos_theta
    }

    pub fn phi(&self) -> &Histogram {
        &self.phi
    }

    pub fn delta_time(&self) -> &Histogram {
        &self.delta_time
    }

    pub fn entries(&self) -> usize {
        self.cos_theta_values.len()
    }

    /// KS distance between triggered `cos(theta)` and the generated law.
    ///
    /// The telescope acceptance favours vertical tracks, so triggered muons
    /// are harder than the generated spectrum; the distance measures that
    /// bias rather than a sampling error.
    pub fn cos_theta_ks_distance(&self, flux: &MuonFluxService) -> f64 {
        ks_statistic(&self.cos_theta_values, |c| flux.cos_theta_cdf(c))
    }

    /// Render all plots.
    pub fn report(&self, flux: &MuonFluxService) -> SimResult<String> {
        let mut out = String::new();
        for hist in [
            &self.cos_theta,
            &self.phi,
            &self.delta_time,
            &self.x_bottom,
            &self.y_bottom,
        ] {
            out.push_str(&hist.format().map_err(viz_error)?);
            out.push('\n');
        }
        if let Some((mean, rms)) = mean_and_rms(&self.cos_theta_values) {
            out.push_str(&format!(
                "Triggered cos(theta): mean {mean:.4}, rms {rms:.4}\n"
            ));
        }
        out.push_str(&format!(
            "KS distance of triggered cos(theta) from cos^{} law: {:.4}\n",
            flux.model().theta_exponent(),
            self.cos_theta_ks_distance(flux)
        ));
        Ok(out)
    }
}

/// Sink adapter feeding a [`RunMonitor`] before forwarding to `inner`.
pub struct MonitoredSink<S> {
    inner: S,
    monitor: RunMonitor,
}

impl<S: EventSink> MonitoredSink<S> {
    pub fn new(inner: S, monitor: RunMonitor) -> Self {
        Self { inner, monitor }
    }

    pub fn monitor(&self) -> &RunMonitor {
        &self.monitor
    }

    pub fn into_parts(self) -> (S, RunMonitor) {
        (self.inner, self.monitor)
    }
}

impl<S: EventSink> EventSink for MonitoredSink<S> {
    fn record(&mut self, event: &EventRecord) -> SimResult<()> {
        self.monitor.fill(event);
        self.inner.record(event)
    }

    fn summary(&mut self, summary: &RunSummary) -> SimResult<()> {
        self.inner.summary(summary)
    }
}
