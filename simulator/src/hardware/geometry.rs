//! Detector geometry of a single telescope station.
//!
//! A station is modelled as a stack of parallel horizontal planes sharing the
//! same rectangular active area. Only the top and bottom planes matter for the
//! trigger: a muon fires the telescope when its straight track crosses the
//! active area on both of them. All lengths are in centimetres.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Rectangular active area in detector-plane coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveArea {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ActiveArea {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> SimResult<Self> {
        let area = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        area.validate()?;
        Ok(area)
    }

    /// Area centred on the origin with the given side lengths.
    pub fn centered(width: f64, height: f64) -> SimResult<Self> {
        Self::new(-0.5 * width, 0.5 * width, -0.5 * height, 0.5 * height)
    }

    fn validate(&self) -> SimResult<()> {
        let values = [self.x_min, self.x_max, self.y_min, self.y_max];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SimError::invalid(
                "active_area",
                format!("bounds must be finite, got {self:?}"),
            ));
        }
        if self.x_min >= self.x_max || self.y_min >= self.y_max {
            return Err(SimError::invalid(
                "active_area",
                format!("bounds describe a degenerate rectangle: {self:?}"),
            ));
        }
        Ok(())
    }

    /// Closed-interval containment: points on the boundary are inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x_min <= x && x <= self.x_max && self.y_min <= y && y <= self.y_max
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// Immutable geometry of one telescope station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    active_area: ActiveArea,
    z_bottom: f64,
    z_top: f64,
}

impl GeometryConfig {
    /// Build a validated geometry.
    ///
    /// Fails with [`SimError::InvalidParameter`] unless `z_bottom < z_top` and
    /// the active area is a proper rectangle.
    pub fn new(active_area: ActiveArea, z_bottom: f64, z_top: f64) -> SimResult<Self> {
        let geometry = Self {
            active_area,
            z_bottom,
            z_top,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Re-check the invariants, used after deserialization.
    pub fn validate(&self) -> SimResult<()> {
        self.active_area.validate()?;
        if !self.z_bottom.is_finite() || !self.z_top.is_finite() {
            return Err(SimError::invalid("z_planes", "plane heights must be finite"));
        }
        if self.z_bottom >= self.z_top {
            return Err(SimError::invalid(
                "z_planes",
                format!(
                    "z_bottom ({}) must lie below z_top ({})",
                    self.z_bottom, self.z_top
                ),
            ));
        }
        Ok(())
    }

    pub fn active_area(&self) -> &ActiveArea {
        &self.active_area
    }

    pub fn z_bottom(&self) -> f64 {
        self.z_bottom
    }

    pub fn z_top(&self) -> f64 {
        self.z_top
    }

    /// Vertical distance between the outer planes.
    pub fn plane_separation(&self) -> f64 {
        self.z_top - self.z_bottom
    }
}
