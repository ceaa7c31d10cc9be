//! Cosmic-ray muon flux model.
//!
//! Directions follow a flux per unit solid angle proportional to
//! `cos(theta)^n` up to a zenith cutoff `theta_max`, with uniform azimuth.
//! Arrival times follow a Poisson process of constant rate.
//!
//! # Sampling method
//!
//! Zenith angles are drawn by exact inverse-CDF sampling in `c = cos(theta)`.
//! Since `dOmega = dc dphi`, a `cos^n` flux gives `c` a density proportional
//! to `c^n` on `[c_min, 1]` with `c_min = cos(theta_max)`, whose CDF inverts in
//! closed form:
//!
//! ```text
//! F(c)      = (c^(n+1) - c_min^(n+1)) / (1 - c_min^(n+1))
//! F^-1(u)   = (c_min^(n+1) + u * (1 - c_min^(n+1)))^(1 / (n+1))
//! ```
//!
//! For the default `n = 2` this reproduces the familiar `cos^2` zenith law.

use std::f64::consts::TAU;

use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Default exponent of the `cos(theta)^n` zenith weighting.
pub const DEFAULT_THETA_EXPONENT: f64 = 2.0;

/// Default mean arrival rate of triggered muons [Hz].
pub const DEFAULT_RATE_HZ: f64 = 35.0;

/// Default zenith cutoff [degrees].
pub const DEFAULT_THETA_MAX_DEG: f64 = 80.0;

/// Parameters of the angular and temporal muon flux.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxModel {
    theta_exponent: f64,
    rate_hz: f64,
    theta_max: f64,
}

impl Default for FluxModel {
    fn default() -> Self {
        Self {
            theta_exponent: DEFAULT_THETA_EXPONENT,
            rate_hz: DEFAULT_RATE_HZ,
            theta_max: DEFAULT_THETA_MAX_DEG.to_radians(),
        }
    }
}

impl FluxModel {
    /// Build a validated flux model; `theta_max` is in radians.
    pub fn new(theta_exponent: f64, rate_hz: f64, theta_max: f64) -> SimResult<Self> {
        let model = Self {
            theta_exponent,
            rate_hz,
            theta_max,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> SimResult<()> {
        validate_exponent(self.theta_exponent)?;
        if !self.rate_hz.is_finite() || self.rate_hz <= 0.0 {
            return Err(SimError::invalid(
                "rate",
                format!("rate must be positive, got {} Hz", self.rate_hz),
            ));
        }
        if !(self.theta_max > 0.0 && self.theta_max < std::f64::consts::FRAC_PI_2) {
            return Err(SimError::invalid(
                "theta_max",
                format!(
                    "zenith cutoff must lie in (0, pi/2), got {} rad",
                    self.theta_max
                ),
            ));
        }
        Ok(())
    }

    pub fn theta_exponent(&self) -> f64 {
        self.theta_exponent
    }

    pub fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    pub fn theta_max(&self) -> f64 {
        self.theta_max
    }

    pub fn cos_theta_min(&self) -> f64 {
        self.theta_max.cos()
    }
}

fn validate_exponent(n: f64) -> SimResult<()> {
    if !n.is_finite() || n < 0.0 {
        return Err(SimError::invalid(
            "theta_exponent",
            format!("cos(theta) exponent must be >= 0, got {n}"),
        ));
    }
    Ok(())
}

/// Random sampler of muon directions and inter-arrival times.
///
/// The service holds no random state of its own; every sampling call draws
/// from the generator passed in by the caller.
#[derive(Debug, Clone)]
pub struct MuonFluxService {
    model: FluxModel,
    /// `c_min^(n+1)`, the CDF offset of the `cos(theta)` distribution.
    cdf_floor: f64,
    arrival: Exp<f64>,
}

impl MuonFluxService {
    pub fn new(model: FluxModel) -> SimResult<Self> {
        model.validate()?;
        let arrival = Exp::new(model.rate_hz)
            .map_err(|e| SimError::invalid("rate", format!("{e:?}")))?;
        Ok(Self {
            cdf_floor: Self::cdf_floor_for(&model),
            model,
            arrival,
        })
    }

    fn cdf_floor_for(model: &FluxModel) -> f64 {
        model.cos_theta_min().powf(model.theta_exponent + 1.0)
    }

    pub fn model(&self) -> &FluxModel {
        &self.model
    }

    /// Set a parameter of the zenith-angle distribution.
    ///
    /// Index 0 is the `cos(theta)` exponent; other indices are reserved and
    /// rejected. Must be called before sampling starts.
    pub fn set_theta_dist_parameter(&mut self, index: usize, value: f64) -> SimResult<()> {
        match index {
            0 => {
                validate_exponent(value)?;
                self.model.theta_exponent = value;
                self.cdf_floor = Self::cdf_floor_for(&self.model);
                Ok(())
            }
            _ => Err(SimError::invalid(
                "theta_dist_parameter",
                format!("index {index} is reserved, only index 0 (exponent) is defined"),
            )),
        }
    }

    /// Draw `cos(theta)` from the `c^n` density on `[cos(theta_max), 1]`.
    pub fn sample_cos_theta<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        let exponent = self.model.theta_exponent + 1.0;
        (self.cdf_floor + u * (1.0 - self.cdf_floor))
            .powf(exponent.recip())
            .min(1.0)
    }

    /// Unit direction of travel of a downgoing muon (`vz < 0`).
    pub fn random_direction<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector3<f64> {
        let cos_theta = self.sample_cos_theta(rng);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = rng.gen::<f64>() * TAU;
        // (theta, phi) give the arrival direction; the muon travels opposite.
        Vector3::new(-sin_theta * phi.cos(), -sin_theta * phi.sin(), -cos_theta)
    }

    /// Waiting time to the next arrival of the Poisson process [s].
    pub fn random_inter_arrival_time<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.arrival.sample(rng)
    }

    /// Analytic CDF of `cos(theta)` under the configured model.
    pub fn cos_theta_cdf(&self, cos_theta: f64) -> f64 {
        let exponent = self.model.theta_exponent + 1.0;
        let c = cos_theta.clamp(0.0, 1.0);
        ((c.powf(exponent) - self.cdf_floor) / (1.0 - self.cdf_floor)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::stats::{ks_critical_value, ks_statistic};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn service(n: f64) -> MuonFluxService {
        let model = FluxModel::new(n, DEFAULT_RATE_HZ, DEFAULT_THETA_MAX_DEG.to_radians()).unwrap();
        MuonFluxService::new(model).unwrap()
    }

    #[test]
    fn test_invalid_models_rejected() {
        assert!(FluxModel::new(-0.5, 10.0, 1.0).is_err());
        assert!(FluxModel::new(2.0, 0.0, 1.0).is_err());
        assert!(FluxModel::new(2.0, -3.0, 1.0).is_err());
        assert!(FluxModel::new(2.0, 10.0, 0.0).is_err());
        assert!(FluxModel::new(2.0, 10.0, 2.0).is_err());
        assert!(FluxModel::new(f64::NAN, 10.0, 1.0).is_err());
    }

    #[test]
    fn test_directions_are_downgoing_unit_vectors() {
        let flux = service(2.0);
        let mut rng = StdRng::seed_from_u64(7);
        let cos_min = flux.model().cos_theta_min();
        for _ in 0..10_000 {
            let v = flux.random_direction(&mut rng);
            assert!(v.z < 0.0);
            assert!(-v.z >= cos_min - 1e-12);
            assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cos_theta_follows_power_law() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in [0.0, 1.0, 2.0, 3.5] {
            let flux = service(n);
            let samples: Vec<f64> = (0..20_000).map(|_| flux.sample_cos_theta(&mut rng)).collect();
            let d = ks_statistic(&samples, |c| flux.cos_theta_cdf(c));
            let critical = 1.5 * ks_critical_value(samples.len(), 0.01);
            assert!(d < critical, "n = {n}: KS distance {d} exceeds {critical}");
        }
    }

    #[test]
    fn test_uniform_theta_is_rejected_by_the_cos_squared_law() {
        // A uniform-in-theta sample must not pass as cos^2 distributed.
        let flux = service(2.0);
        let mut rng = StdRng::seed_from_u64(3);
        let theta_max = flux.model().theta_max();
        let samples: Vec<f64> = (0..20_000)
            .map(|_| (rng.gen::<f64>() * theta_max).cos())
            .collect();
        let d = ks_statistic(&samples, |c| flux.cos_theta_cdf(c));
        assert!(d > ks_critical_value(samples.len(), 0.01));
    }

    #[test]
    fn test_mean_cos_theta_for_cos_squared() {
        // With c_min -> 0, E[c] = (n+1)/(n+2) = 3/4 for n = 2.
        let model = FluxModel::new(2.0, 1.0, 89.9_f64.to_radians()).unwrap();
        let flux = MuonFluxService::new(model).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let n = 100_000;
        let mean = (0..n).map(|_| flux.sample_cos_theta(&mut rng)).sum::<f64>() / n as f64;
        assert_relative_eq!(mean, 0.75, epsilon = 0.005);
    }

    #[test]
    fn test_azimuth_is_uniform() {
        let flux = service(2.0);
        let mut rng = StdRng::seed_from_u64(5);
        let mut quadrants = [0usize; 4];
        let n = 40_000;
        for _ in 0..n {
            let v = flux.random_direction(&mut rng);
            let q = match (v.x >= 0.0, v.y >= 0.0) {
                (true, true) => 0,
                (false, true) => 1,
                (false, false) => 2,
                (true, false) => 3,
            };
            quadrants[q] += 1;
        }
        for count in quadrants {
            assert_relative_eq!(count as f64 / n as f64, 0.25, epsilon = 0.015);
        }
    }

    #[test]
    fn test_inter_arrival_times_exponential() {
        let model = FluxModel::new(2.0, 50.0, 1.0).unwrap();
        let flux = MuonFluxService::new(model).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let n = 50_000;
        let samples: Vec<f64> = (0..n).map(|_| flux.random_inter_arrival_time(&mut rng)).collect();
        assert!(samples.iter().all(|&dt| dt >= 0.0));
        let mean = samples.iter().sum::<f64>() / n as f64;
        assert_relative_eq!(mean, 1.0 / 50.0, max_relative = 0.02);
        let d = ks_statistic(&samples, |t| 1.0 - (-50.0 * t).exp());
        assert!(d < 1.5 * ks_critical_value(n, 0.01));
    }

    #[test]
    fn test_set_theta_dist_parameter() {
        let mut flux = service(2.0);
        flux.set_theta_dist_parameter(0, 0.0).unwrap();
        assert_eq!(flux.model().theta_exponent(), 0.0);
        // n = 0: c uniform on [c_min, 1], so the CDF is linear.
        let c_min = flux.model().cos_theta_min();
        let mid = 0.5 * (c_min + 1.0);
        assert_relative_eq!(flux.cos_theta_cdf(mid), 0.5, epsilon = 1e-12);

        assert!(flux.set_theta_dist_parameter(0, -1.0).is_err());
        assert_eq!(flux.model().theta_exponent(), 0.0);
        assert!(matches!(
            flux.set_theta_dist_parameter(1, 1.0),
            Err(SimError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_cdf_endpoints() {
        let flux = service(2.0);
        assert_eq!(flux.cos_theta_cdf(1.0), 1.0);
        assert_eq!(flux.cos_theta_cdf(flux.model().cos_theta_min()), 0.0);
        assert_eq!(flux.cos_theta_cdf(0.0), 0.0);
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let flux = service(2.0);
        let mut a = StdRng::seed_from_u64(1234);
        let mut b = StdRng::seed_from_u64(1234);
        for _ in 0..100 {
            assert_eq!(flux.random_direction(&mut a), flux.random_direction(&mut b));
        }
    }
}
