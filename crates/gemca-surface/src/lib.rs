#![warn(missing_docs)]

//! Implicit surfaces bounding gemca bodies.
//!
//! Every surface is written as `f(p) = 0` with `f > 0` on the side that is
//! geometrically outside the body it bounds. Two queries are answered per
//! surface: which side a ray starts on, and how far it travels before it
//! crosses the surface.
//!
//! Quadrics are expressed in the body-local frame: cylinders and cones run
//! along local Z, spheres and ellipsoids are centered at the local origin.

mod cone;
mod cylinder;
mod plane;
mod solver;
mod sphere;

pub use solver::{min_positive, solve_quadratic};

use gemca_math::{Point3, Ray, Tolerance, Vec3};

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// Component index of this axis.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// An implicit surface with its outside on the positive side.
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// `a * p[axis] + d = 0`.
    AxisPlane {
        /// Axis the plane is perpendicular to.
        axis: Axis,
        /// Coefficient of the axis coordinate, `+1` or `-1` in practice.
        a: f64,
        /// Constant term.
        d: f64,
    },
    /// `normal · p + d = 0` with a unit normal pointing outside.
    Plane {
        /// Unit outward normal.
        normal: Vec3,
        /// Constant term.
        d: f64,
    },
    /// `|p|² - r2 = 0`.
    Sphere {
        /// Squared radius.
        r2: f64,
    },
    /// `x²/a2 + y²/b2 + z²/c2 - 1 = 0`.
    Ellipsoid {
        /// Squared semi-axis along local X.
        a2: f64,
        /// Squared semi-axis along local Y.
        b2: f64,
        /// Squared semi-axis along local Z.
        c2: f64,
    },
    /// `x² + y² - r2 = 0`, infinite along local Z.
    Cylinder {
        /// Squared radius.
        r2: f64,
    },
    /// `x²/a2 + y²/b2 - 1 = 0`, infinite along local Z.
    EllipticCylinder {
        /// Squared semi-axis along local X.
        a2: f64,
        /// Squared semi-axis along local Y.
        b2: f64,
    },
    /// `x² + y² - k (z - apex)² = 0`: a double cone around local Z.
    Cone {
        /// Local Z of the apex.
        apex: f64,
        /// Squared slope, radius change per unit of Z squared.
        k: f64,
    },
}

impl Surface {
    /// Plane through `point` whose outside lies along `normal`.
    ///
    /// Returns `None` for a zero normal.
    pub fn plane_through(point: &Point3, normal: &Vec3) -> Option<Self> {
        let normal = normal.try_normalize(0.0)?;
        let d = -normal.dot(&point.coords);
        Some(Surface::Plane { normal, d })
    }

    /// Short lowercase name of the surface kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Surface::AxisPlane { .. } => "axis-plane",
            Surface::Plane { .. } => "plane",
            Surface::Sphere { .. } => "sphere",
            Surface::Ellipsoid { .. } => "ellipsoid",
            Surface::Cylinder { .. } => "cylinder",
            Surface::EllipticCylinder { .. } => "elliptic-cylinder",
            Surface::Cone { .. } => "cone",
        }
    }

    /// Signed implicit value at `p`; negative inside, positive outside.
    pub fn value(&self, p: &Point3) -> f64 {
        match *self {
            Surface::AxisPlane { axis, a, d } => plane::axis_value(axis, a, d, p),
            Surface::Plane { ref normal, d } => plane::value(normal, d, p),
            Surface::Sphere { r2 } => sphere::sphere_value(r2, p),
            Surface::Ellipsoid { a2, b2, c2 } => sphere::ellipsoid_value(a2, b2, c2, p),
            Surface::Cylinder { r2 } => cylinder::cylinder_value(r2, p),
            Surface::EllipticCylinder { a2, b2 } => cylinder::elliptic_value(a2, b2, p),
            Surface::Cone { apex, k } => cone::value(apex, k, p),
        }
    }

    /// Rate of change of [`Surface::value`] along the ray direction at the
    /// ray origin, up to a positive factor.
    pub fn slope(&self, ray: &Ray) -> f64 {
        let (p, d) = (&ray.origin, &ray.direction);
        match *self {
            Surface::AxisPlane { axis, a, .. } => a * d[axis.index()],
            Surface::Plane { ref normal, .. } => normal.dot(d),
            Surface::Sphere { .. } => sphere::sphere_slope(p, d),
            Surface::Ellipsoid { a2, b2, c2 } => sphere::ellipsoid_slope(a2, b2, c2, p, d),
            Surface::Cylinder { .. } => cylinder::cylinder_slope(p, d),
            Surface::EllipticCylinder { a2, b2 } => cylinder::elliptic_slope(a2, b2, p, d),
            Surface::Cone { apex, k } => cone::slope(apex, k, p, d),
        }
    }

    /// Whether the ray starts on the inside of this surface.
    ///
    /// Points within `tol.surface` of the surface are decided by the ray
    /// direction: heading inward counts as inside. A ray lying in a plane
    /// counts as inside; a ray tangent to a quadric counts as outside.
    pub fn is_inside(&self, ray: &Ray, tol: &Tolerance) -> bool {
        let v = self.value(&ray.origin);
        if !tol.on_surface(v) {
            return v < 0.0;
        }
        let slope = self.slope(ray);
        match self {
            Surface::AxisPlane { .. } | Surface::Plane { .. } => slope <= 0.0,
            _ => slope < 0.0,
        }
    }

    /// Distance along the ray to the surface.
    ///
    /// Returns the smallest strictly positive crossing, or infinity when
    /// there is none. A ray lying in a plane reports 0.
    pub fn distance(&self, ray: &Ray, tol: &Tolerance) -> f64 {
        let d = &ray.direction;
        let leading = match *self {
            Surface::AxisPlane { .. } | Surface::Plane { .. } => {
                return plane::distance(self.value(&ray.origin), self.slope(ray), tol);
            }
            Surface::Sphere { .. } => d.norm_squared(),
            Surface::Ellipsoid { a2, b2, c2 } => {
                d.x * d.x / a2 + d.y * d.y / b2 + d.z * d.z / c2
            }
            Surface::Cylinder { .. } => d.x * d.x + d.y * d.y,
            Surface::EllipticCylinder { a2, b2 } => d.x * d.x / a2 + d.y * d.y / b2,
            Surface::Cone { k, .. } => d.x * d.x + d.y * d.y - k * d.z * d.z,
        };
        solve_quadratic(leading, 2.0 * self.slope(ray), self.value(&ray.origin), tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ray(p: [f64; 3], d: [f64; 3]) -> Ray {
        Ray::new(Point3::new(p[0], p[1], p[2]), Vec3::new(d[0], d[1], d[2]))
    }

    #[test]
    fn test_plane_through_orients_outside() {
        let s = Surface::plane_through(&Point3::new(0.0, 0.0, 2.0), &Vec3::new(0.0, 0.0, 5.0))
            .unwrap();
        let tol = Tolerance::DEFAULT;
        assert!(s.is_inside(&ray([0.0, 0.0, 1.0], [1.0, 0.0, 0.0]), &tol));
        assert!(!s.is_inside(&ray([0.0, 0.0, 3.0], [1.0, 0.0, 0.0]), &tol));
        assert_relative_eq!(s.distance(&ray([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]), &tol), 2.0);
        assert!(Surface::plane_through(&Point3::origin(), &Vec3::zeros()).is_none());
    }

    #[test]
    fn test_on_surface_tie_break_planes_vs_quadrics() {
        let tol = Tolerance::DEFAULT;
        let plane = Surface::AxisPlane { axis: Axis::X, a: 1.0, d: -1.0 };
        // On the plane x = 1.
        assert!(plane.is_inside(&ray([1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]), &tol));
        assert!(!plane.is_inside(&ray([1.0, 0.0, 0.0], [1.0, 0.0, 0.0]), &tol));
        assert!(plane.is_inside(&ray([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), &tol));

        let sphere = Surface::Sphere { r2: 1.0 };
        assert!(sphere.is_inside(&ray([1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]), &tol));
        assert!(!sphere.is_inside(&ray([1.0, 0.0, 0.0], [1.0, 0.0, 0.0]), &tol));
        assert!(!sphere.is_inside(&ray([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), &tol));
    }

    #[test]
    fn test_surface_tolerance_scales_with_surface_kind() {
        let tol = Tolerance::DEFAULT;
        let r = 1000.0;
        let plane = Surface::AxisPlane { axis: Axis::X, a: 1.0, d: -r };
        let sphere = Surface::Sphere { r2: r * r };
        let ellipsoid = Surface::Ellipsoid { a2: r * r, b2: r * r, c2: r * r };

        // 1e-12 off: within reach of the plane, not of the sphere.
        let p = Point3::new(r + 1e-12, 0.0, 0.0);
        assert!(tol.on_surface(plane.value(&p)));
        assert!(!tol.on_surface(sphere.value(&p)));
        assert!(sphere.value(&p) > 0.0);

        // 1e-8 off: only the normalised ellipsoid still counts it.
        let p = Point3::new(r + 1e-8, 0.0, 0.0);
        assert!(tol.on_surface(ellipsoid.value(&p)));
        assert!(!tol.on_surface(plane.value(&p)));
        assert!(!tol.on_surface(sphere.value(&p)));
    }

    #[test]
    fn test_distance_from_inside_every_quadric() {
        let tol = Tolerance::DEFAULT;
        let along_x = ray([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let cases = [
            (Surface::Sphere { r2: 4.0 }, 2.0),
            (Surface::Ellipsoid { a2: 9.0, b2: 1.0, c2: 1.0 }, 3.0),
            (Surface::Cylinder { r2: 25.0 }, 5.0),
            (Surface::EllipticCylinder { a2: 16.0, b2: 1.0 }, 4.0),
            (Surface::Cone { apex: 10.0, k: 0.25 }, 5.0),
        ];
        for (surface, expected) in cases {
            assert!(surface.is_inside(&along_x, &tol), "{}", surface.kind());
            assert_relative_eq!(surface.distance(&along_x, &tol), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cylinder_ignores_axial_direction() {
        let tol = Tolerance::DEFAULT;
        let s = Surface::Cylinder { r2: 1.0 };
        let up = ray([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert!(s.distance(&up, &tol).is_infinite());
    }
}
