//! Fixed-binning histograms with text rendering.

use crate::{Result, VizError};
use std::fmt::Write;

/// Scale type for bar lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    /// Logarithmic scale (base 10)
    Log10,
}

/// Display configuration
#[derive(Debug, Clone)]
struct HistogramConfig {
    title: Option<String>,
    /// Character to use for bars
    bar_char: char,
    show_percentage: bool,
    scale: Scale,
    show_empty_bins: bool,
    /// Maximum bar width in characters
    max_bar_width: usize,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            title: None,
            bar_char: '#',
            show_percentage: true,
            scale: Scale::Linear,
            show_empty_bins: true,
            max_bar_width: 40,
        }
    }
}

/// Histogram with equal-width bins over `[low, high)` plus underflow and
/// overflow counters.
///
/// Values exactly equal to `high` land in the last bin so that closed ranges
/// such as `cos(theta)` in `[c_min, 1]` are fully contained. NaN is ignored.
#[derive(Debug, Clone)]
pub struct Histogram {
    low: f64,
    high: f64,
    counts: Vec<u64>,
    underflow: u64,
    overflow: u64,
    sum: f64,
    sum_sq: f64,
    config: HistogramConfig,
}

impl Histogram {
    pub fn new(low: f64, high: f64, num_bins: usize) -> Result<Self> {
        if num_bins == 0 {
            return Err(VizError::HistogramError(
                "Histogram must have at least 1 bin".to_string(),
            ));
        }
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(VizError::HistogramError(format!(
                "Invalid histogram range [{low}, {high})"
            )));
        }
        Ok(Self {
            low,
            high,
            counts: vec![0; num_bins],
            underflow: 0,
            overflow: 0,
            sum: 0.0,
            sum_sq: 0.0,
            config: HistogramConfig::default(),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.config.scale = scale;
        self
    }

    pub fn bin_width(&self) -> f64 {
        (self.high - self.low) / self.counts.len() as f64
    }

    /// Bin index for a value, `None` when outside the range.
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        if value == self.high {
            return Some(self.counts.len() - 1);
        }
        if value < self.low || value > self.high {
            return None;
        }
        let idx = ((value - self.low) / self.bin_width()) as usize;
        Some(idx.min(self.counts.len() - 1))
    }

    pub fn fill(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        match self.find_bin(value) {
            Some(idx) => {
                self.counts[idx] += 1;
                self.sum += value;
                self.sum_sq += value * value;
            }
            None if value < self.low => self.underflow += 1,
            None => self.overflow += 1,
        }
    }

    pub fn fill_all<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = f64>,
    {
        for value in values {
            self.fill(value);
        }
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Lower edges of all bins followed by the upper edge of the last one.
    pub fn bin_edges(&self) -> Vec<f64> {
        let width = self.bin_width();
        (0..=self.counts.len())
            .map(|i| self.low + width * i as f64)
            .collect()
    }

    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// Number of in-range entries.
    pub fn entries(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Mean of the in-range entries.
    pub fn mean(&self) -> Option<f64> {
        let n = self.entries();
        (n > 0).then(|| self.sum / n as f64)
    }

    /// RMS deviation of the in-range entries.
    pub fn rms(&self) -> Option<f64> {
        let n = self.entries() as f64;
        let mean = self.mean()?;
        Some((self.sum_sq / n - mean * mean).max(0.0).sqrt())
    }

    /// Render the histogram as text.
    pub fn format(&self) -> Result<String> {
        let mut output = String::new();

        if let Some(title) = &self.config.title {
            writeln!(output, "{}", title)?;
            writeln!(output, "{}", "=".repeat(title.len()))?;
        }

        let max_count = *self.counts.iter().max().unwrap_or(&1).max(&1) as f64;
        let total = self.entries();
        let edges = self.bin_edges();

        for (i, &count) in self.counts.iter().enumerate() {
            if count == 0 && !self.config.show_empty_bins {
                continue;
            }

            let bar_length = match self.config.scale {
                Scale::Linear => {
                    ((count as f64 / max_count) * self.config.max_bar_width as f64).round() as usize
                }
                Scale::Log10 => {
                    if count > 0 {
                        let full = (max_count.log10() + 1.0).max(1.0);
                        (((count as f64).log10() + 1.0) / full * self.config.max_bar_width as f64)
                            .round() as usize
                    } else {
                        0
                    }
                }
            };

            write!(output, "{:>+11.4e} - {:>+11.4e} | {:>8}", edges[i], edges[i + 1], count)?;
            if self.config.show_percentage {
                let percentage = if total > 0 {
                    count as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                write!(output, " | {:6.2}%", percentage)?;
            }
            writeln!(
                output,
                " | {}",
                self.config.bar_char.to_string().repeat(bar_length)
            )?;
        }

        write!(output, "entries: {total}")?;
        if let (Some(mean), Some(rms)) = (self.mean(), self.rms()) {
            write!(output, ", mean: {mean:.4}, rms: {rms:.4}")?;
        }
        writeln!(
            output,
            ", underflow: {}, overflow: {}",
            self.underflow, self.overflow
        )?;
        if self.config.scale == Scale::Log10 {
            writeln!(output, "Note: bar lengths use a log10 scale")?;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_histogram_creation() {
        let hist = Histogram::new(0.0, 5.0, 5).unwrap();
        assert_eq!(hist.counts().len(), 5);
        assert_eq!(hist.entries(), 0);
        assert_eq!(hist.bin_edges(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(Histogram::new(0.0, 1.0, 0).is_err());
        assert!(Histogram::new(1.0, 1.0, 4).is_err());
        assert!(Histogram::new(0.0, f64::INFINITY, 4).is_err());
    }

    #[test]
    fn test_fill_with_under_and_overflow() {
        let mut hist = Histogram::new(0.0, 5.0, 5).unwrap();
        hist.fill_all([0.5, 1.5, 1.7, 5.0, -0.1, 5.1, f64::NAN]);

        assert_eq!(hist.counts(), &[1, 2, 0, 0, 1]);
        assert_eq!(hist.entries(), 4);
        assert_eq!(hist.underflow(), 1);
        assert_eq!(hist.overflow(), 1);
    }

    #[test]
    fn test_mean_and_rms() {
        let mut hist = Histogram::new(0.0, 10.0, 10).unwrap();
        assert_eq!(hist.mean(), None);
        hist.fill_all([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(hist.mean().unwrap(), 5.0);
        assert_relative_eq!(hist.rms().unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_format() {
        let mut hist = Histogram::new(0.0, 2.0, 2)
            .unwrap()
            .with_title("Delta time");
        hist.fill_all([0.5, 0.6, 1.5]);
        let text = hist.format().unwrap();
        assert!(text.starts_with("Delta time\n==========\n"));
        assert!(text.contains("entries: 3"));
        let bars: Vec<usize> = text
            .lines()
            .filter(|l| l.contains(" | "))
            .map(|l| l.chars().filter(|&c| c == '#').count())
            .collect();
        assert_eq!(bars, vec![40, 20]);
    }

    #[test]
    fn test_log_scale_note() {
        let mut hist = Histogram::new(0.0, 1.0, 4).unwrap().with_scale(Scale::Log10);
        hist.fill_all([0.1, 0.1, 0.1, 0.9]);
        let text = hist.format().unwrap();
        assert!(text.contains("log10"));
    }
}
