//! Circular and elliptic cylinders along local Z.

use gemca_math::{Point3, Vec3};

pub(crate) fn cylinder_value(r2: f64, p: &Point3) -> f64 {
    p.x * p.x + p.y * p.y - r2
}

pub(crate) fn cylinder_slope(p: &Point3, d: &Vec3) -> f64 {
    p.x * d.x + p.y * d.y
}

pub(crate) fn elliptic_value(a2: f64, b2: f64, p: &Point3) -> f64 {
    p.x * p.x / a2 + p.y * p.y / b2 - 1.0
}

pub(crate) fn elliptic_slope(a2: f64, b2: f64, p: &Point3, d: &Vec3) -> f64 {
    p.x * d.x / a2 + p.y * d.y / b2
}
