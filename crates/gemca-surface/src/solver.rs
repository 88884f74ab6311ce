//! Root selection for ray/surface crossings.

use gemca_math::Tolerance;

/// Smallest positive root of `a t² + b t + c = 0`, or infinity.
///
/// A negligible `a` falls back to the linear equation. A negative
/// discriminant, or roots that are all non-positive, give infinity.
pub fn solve_quadratic(a: f64, b: f64, c: f64, tol: &Tolerance) -> f64 {
    if tol.is_degenerate(a) {
        if tol.is_degenerate(b) {
            return f64::INFINITY;
        }
        let t = -c / b;
        return if t > 0.0 { t } else { f64::INFINITY };
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return f64::INFINITY;
    }

    // q shares the sign of -b, so neither root subtracts nearly equal terms
    // when c is close to zero.
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    if q == 0.0 {
        return f64::INFINITY;
    }
    let t1 = q / a;
    let t2 = c / q;

    match min_positive(t1, t2) {
        t if t > 0.0 => t,
        _ => f64::INFINITY,
    }
}

/// The smaller of two values counting only positive ones; 0 if neither is.
pub fn min_positive(a: f64, b: f64) -> f64 {
    match (a > 0.0, b > 0.0) {
        (true, true) => a.min(b),
        (true, false) => a,
        (false, true) => b,
        (false, false) => 0.0,
    }
}
