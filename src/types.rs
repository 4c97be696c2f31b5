//! Core domain types for trajectory queries.
//!
//! # Newtype Strategy
//!
//! **Outputs use newtypes**: [`MeasuredDepth`] and [`VerticalDepth`] wrap
//! return values so a caller cannot hand a TVD to something expecting an MD.
//!
//! **Inputs use bare `f64`**: `tvd_at(md: f64)` reads clearly at the call site,
//! and wrapping every argument adds ceremony without catching anything.
//!
//! # Axes
//! [`Position`] is a right-handed east/north/down frame: `z` is the true
//! vertical depth and grows downward.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Measured depth: distance along the hole path from the surface reference.
///
/// # Examples
/// ```
/// use wellpath::types::MeasuredDepth;
/// let md = MeasuredDepth(443.0);
/// assert_eq!(md.0, 443.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct MeasuredDepth(pub f64);

/// True vertical depth below the survey datum.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct VerticalDepth(pub f64);

/// Cartesian station coordinates: east and north offsets plus TVD (`z`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub east: f64,
    pub north: f64,
    /// True vertical depth, positive downward.
    pub z: f64,
}

impl Position {
    pub fn new(east: f64, north: f64, z: f64) -> Self {
        Self { east, north, z }
    }

    pub(crate) fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.east, self.north, self.z)
    }

    pub(crate) fn from_vector(v: &Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// Straight-line distance to another position.
    pub fn distance(&self, other: &Position) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }
}
