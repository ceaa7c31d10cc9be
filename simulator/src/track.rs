//! Straight-line muon trajectories.

use nalgebra::{Point3, Vector3};

use crate::error::{SimError, SimResult};

/// A straight track through a point along a direction.
///
/// The direction is normalized on construction; a zero-length direction is
/// kept as-is and reported as degenerate on extrapolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    origin: Point3<f64>,
    direction: Vector3<f64>,
}

impl Track {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        let direction = direction.try_normalize(0.0).unwrap_or(direction);
        Self { origin, direction }
    }

    pub fn origin(&self) -> &Point3<f64> {
        &self.origin
    }

    pub fn direction(&self) -> &Vector3<f64> {
        &self.direction
    }

    /// Crossing point `(x, y)` of the track with the plane `z = z_target`.
    pub fn extrapolate(&self, z_target: f64) -> SimResult<(f64, f64)> {
        let point = self.point_at_z(z_target)?;
        Ok((point.x, point.y))
    }

    /// Full crossing point with the plane `z = z_target`.
    pub fn point_at_z(&self, z_target: f64) -> SimResult<Point3<f64>> {
        let vz = self.direction.z;
        if vz == 0.0 || !vz.is_finite() {
            return Err(SimError::DegenerateTrajectory { vz });
        }
        let t = (z_target - self.origin.z) / vz;
        let mut point = self.origin + self.direction * t;
        point.z = z_target;
        Ok(point)
    }

    /// Zenith angle in radians, measured from the downward vertical for
    /// downgoing tracks and from the upward vertical otherwise.
    pub fn theta(&self) -> f64 {
        self.direction.z.abs().clamp(0.0, 1.0).acos()
    }

    /// Azimuth in `[0, 2*pi)` of the incoming direction.
    ///
    /// For a downgoing muon this is the azimuth the particle arrives from,
    /// i.e. of `-direction`, matching the convention of the flux sampler.
    pub fn phi(&self) -> f64 {
        let phi = (-self.direction.y).atan2(-self.direction.x);
        if phi < 0.0 {
            phi + std::f64::consts::TAU
        } else {
            phi
        }
    }

    /// Path length between two z-planes.
    pub fn length_between(&self, z_a: f64, z_b: f64) -> SimResult<f64> {
        let a = self.point_at_z(z_a)?;
        let b = self.point_at_z(z_b)?;
        Ok((b - a).norm())
    }
}
