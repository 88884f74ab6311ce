//! Planes: axis-aligned and general.

use gemca_math::{Point3, Tolerance, Vec3};

use crate::Axis;

pub(crate) fn axis_value(axis: Axis, a: f64, d: f64, p: &Point3) -> f64 {
    a * p[axis.index()] + d
}

pub(crate) fn value(normal: &Vec3, d: f64, p: &Point3) -> f64 {
    normal.dot(&p.coords) + d
}

/// Crossing distance for a plane with value `value` at the ray origin and
/// rate of change `slope` along the ray.
///
/// A ray parallel to the plane never crosses it; if it lies in the plane
/// the distance is 0.
pub(crate) fn distance(value: f64, slope: f64, tol: &Tolerance) -> f64 {
    if tol.is_degenerate(slope) {
        return if tol.on_surface(value) { 0.0 } else { f64::INFINITY };
    }
    let t = -value / slope;
    if t > 0.0 {
        t
    } else {
        f64::INFINITY
    }
}
