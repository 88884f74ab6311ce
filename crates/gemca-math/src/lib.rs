#![warn(missing_docs)]

//! Math types for the gemca geometry kernel.
//!
//! Thin wrappers around nalgebra providing the types the rest of the
//! kernel speaks in: points, vectors, affine transforms into body-local
//! frames, rays, and tolerance constants.

mod ray;
mod tolerance;

pub use ray::{Frame, Ray};
pub use tolerance::Tolerance;

use nalgebra::{Matrix4, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// World-to-local transform for a frame with origin `base` and the
    /// orthonormal axes `x`, `y`, `z` as matrix rows.
    ///
    /// A point `p` maps to `(x·(p - base), y·(p - base), z·(p - base))`.
    pub fn from_rows(base: &Point3, x: &Vec3, y: &Vec3, z: &Vec3) -> Self {
        let mut m = Matrix4::identity();
        for (row, axis) in [x, y, z].into_iter().enumerate() {
            m[(row, 0)] = axis.x;
            m[(row, 1)] = axis.y;
            m[(row, 2)] = axis.z;
            m[(row, 3)] = -axis.dot(&base.coords);
        }
        Self { matrix: m }
    }

    /// Build the frame whose local Z runs along `axis` and whose origin is
    /// `base`.
    ///
    /// The two remaining axes are seeded from the coordinate axis least
    /// aligned with `axis`, so the basis stays well conditioned for any
    /// orientation. The basis is right-handed. Returns `None` if `axis`
    /// has zero length.
    pub fn axis_align(base: &Point3, axis: &Vec3) -> Option<Self> {
        let r = axis.try_normalize(0.0)?;
        let seed = least_aligned_axis(&r);
        let s = seed.cross(&r).normalize();
        let t = r.cross(&s);
        Some(Self::from_rows(base, &s, &t, &r))
    }

    /// Like [`Transform::axis_align`], but local X follows `x_hint` with its
    /// component along `axis` removed.
    ///
    /// Returns `None` if `axis` is zero or `x_hint` is parallel to it.
    pub fn from_basis(base: &Point3, axis: &Vec3, x_hint: &Vec3) -> Option<Self> {
        let z = axis.try_normalize(0.0)?;
        let x = (x_hint - z * x_hint.dot(&z)).try_normalize(1e-12)?;
        let y = z.cross(&x);
        Some(Self::from_rows(base, &x, &y, &z))
    }

    /// Compose: `self` then `other` (self * other).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// The translation column.
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(
            self.matrix[(0, 3)],
            self.matrix[(1, 3)],
            self.matrix[(2, 3)],
        )
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// The unit coordinate axis with the smallest absolute dot product with `r`.
fn least_aligned_axis(r: &Vec3) -> Vec3 {
    let (ax, ay, az) = (r.x.abs(), r.y.abs(), r.z.abs());
    if ax <= ay && ax <= az {
        Vec3::x()
    } else if ay <= az {
        Vec3::y()
    } else {
        Vec3::z()
    }
}
