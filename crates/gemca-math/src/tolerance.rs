//! Tolerance constants for surface classification and ray stepping.

use serde::{Deserialize, Serialize};

/// Tolerances used by surface tests and the zone-exit walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Implicit surface values with a smaller magnitude count as on the
    /// surface.
    ///
    /// The value is compared as the surface defines it, not as a length.
    /// Planes give a signed distance. Spheres, cylinders and cones give a
    /// difference of squared lengths, about `2 r` times the distance near a
    /// radius `r`. Ellipsoids and elliptic cylinders give a dimensionless
    /// value, about `2 / r` times the distance along a semi-axis `r`.
    pub surface: f64,
    /// Leading coefficients below this make a quadratic linear, and plane
    /// normals this close to perpendicular to a ray make it parallel.
    pub parallel: f64,
    /// Smallest step taken while walking a ray out of a zone.
    pub min_step: f64,
}

impl Tolerance {
    /// Default kernel tolerances.
    pub const DEFAULT: Self = Self {
        surface: 1e-10,
        parallel: 1e-10,
        min_step: 1e-8,
    };

    /// Check if an implicit surface value is effectively zero; see
    /// [`Tolerance::surface`] for what the value measures.
    pub fn on_surface(&self, value: f64) -> bool {
        value.abs() <= self.surface
    }

    /// Check if a leading coefficient is effectively zero.
    pub fn is_degenerate(&self, coefficient: f64) -> bool {
        coefficient.abs() < self.parallel
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
