//! Double cone around local Z.
//!
//! The radius at height `z` is `sqrt(k) * |z - apex|`; a truncated cone
//! uses end caps that keep only one nappe.

use gemca_math::{Point3, Vec3};

pub(crate) fn value(apex: f64, k: f64, p: &Point3) -> f64 {
    let dz = p.z - apex;
    p.x * p.x + p.y * p.y - k * dz * dz
}

pub(crate) fn slope(apex: f64, k: f64, p: &Point3, d: &Vec3) -> f64 {
    p.x * d.x + p.y * d.y - k * (p.z - apex) * d.z
}
