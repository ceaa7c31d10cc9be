//! Statistical functions for validating sampled distributions

/// Kolmogorov-Smirnov statistic of a sample against an analytic CDF.
///
/// Returns the maximum distance between the empirical CDF of `samples` and
/// `cdf`. NaN samples are ignored; an empty sample yields 1.0.
pub fn ks_statistic<F>(samples: &[f64], cdf: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let mut sorted: Vec<f64> = samples.iter().copied().filter(|v| !v.is_nan()).collect();
    let n = sorted.len();
    if n == 0 {
        return 1.0;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut max_diff: f64 = 0.0;
    for (i, &value) in sorted.iter().enumerate() {
        let theoretical = cdf(value);
        let empirical_before = i as f64 / n as f64;
        let empirical_after = (i + 1) as f64 / n as f64;
        max_diff = max_diff
            .max((empirical_before - theoretical).abs())
            .max((empirical_after - theoretical).abs());
    }
    max_diff
}

/// Critical value of the KS statistic at significance `alpha`.
///
/// Uses the asymptotic approximation, valid for large `n`.
pub fn ks_critical_value(n: usize, alpha: f64) -> f64 {
    let c_alpha = match alpha {
        a if (a - 0.10).abs() < 1e-6 => 1.22,
        a if (a - 0.05).abs() < 1e-6 => 1.36,
        a if (a - 0.01).abs() < 1e-6 => 1.63,
        a if (a - 0.001).abs() < 1e-6 => 1.95,
        _ => 1.36, // Default to 5% significance
    };

    c_alpha / (n.max(1) as f64).sqrt()
}

/// Mean and root-mean-square deviation of a sample, `None` when empty.
pub fn mean_and_rms(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}
