//! Spheres and ellipsoids centered at the local origin.

use gemca_math::{Point3, Vec3};

pub(crate) fn sphere_value(r2: f64, p: &Point3) -> f64 {
    p.coords.norm_squared() - r2
}

pub(crate) fn sphere_slope(p: &Point3, d: &Vec3) -> f64 {
    p.coords.dot(d)
}

pub(crate) fn ellipsoid_value(a2: f64, b2: f64, c2: f64, p: &Point3) -> f64 {
    p.x * p.x / a2 + p.y * p.y / b2 + p.z * p.z / c2 - 1.0
}

pub(crate) fn ellipsoid_slope(a2: f64, b2: f64, c2: f64, p: &Point3, d: &Vec3) -> f64 {
    p.x * d.x / a2 + p.y * d.y / b2 + p.z * d.z / c2
}
