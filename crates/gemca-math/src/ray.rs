//! Rays tagged with the coordinate frame they are expressed in.

use crate::{Point3, Transform, Vec3};

/// Kind of coordinate frame a ray is expressed in.
///
/// Bodies carry one of these to pick the cheapest way of moving a ray
/// into their local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frame {
    /// Universe coordinates; the body transform is the identity.
    #[default]
    Universe,
    /// Universe coordinates shifted so the body center is the origin.
    Centered,
    /// Shifted and rotated so the body axis is local Z.
    Aligned,
}

/// A ray with origin, unit direction and frame tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point.
    pub origin: Point3,
    /// Unit direction, or zero for a pure point query.
    pub direction: Vec3,
    /// The frame `origin` and `direction` are expressed in.
    pub frame: Frame,
}

impl Ray {
    /// Create a ray in universe coordinates. The direction is normalized;
    /// a zero direction stays zero.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        let direction = direction.try_normalize(0.0).unwrap_or_else(Vec3::zeros);
        Self {
            origin,
            direction,
            frame: Frame::Universe,
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// The same ray moved forward by `t`.
    pub fn advanced(&self, t: f64) -> Self {
        Self {
            origin: self.at(t),
            ..*self
        }
    }

    /// Express this ray in a body frame described by `transform`.
    pub fn to_local(&self, transform: &Transform, frame: Frame) -> Self {
        match frame {
            Frame::Universe => *self,
            Frame::Centered => Self {
                origin: self.origin + transform.translation_part(),
                direction: self.direction,
                frame,
            },
            Frame::Aligned => Self {
                origin: transform.apply_point(&self.origin),
                direction: transform.apply_vec(&self.direction),
                frame,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_normalizes_direction() {
        let ray = Ray::new(Point3::origin(), Vec3::new(3.0, 0.0, 4.0));
        assert_relative_eq!(ray.direction.norm(), 1.0);
        assert_relative_eq!(ray.at(5.0), Point3::new(3.0, 0.0, 4.0), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_direction_is_kept() {
        let ray = Ray::new(Point3::new(1.0, 1.0, 1.0), Vec3::zeros());
        assert_eq!(ray.direction, Vec3::zeros());
        assert_eq!(ray.advanced(10.0).origin, ray.origin);
    }

    #[test]
    fn test_centered_frame_only_shifts() {
        let t = Transform::translation(-1.0, -2.0, -3.0);
        let ray = Ray::new(Point3::new(1.0, 2.0, 3.0), Vec3::x());
        let local = ray.to_local(&t, Frame::Centered);
        assert_relative_eq!(local.origin, Point3::origin());
        assert_eq!(local.direction, Vec3::x());
        assert_eq!(local.frame, Frame::Centered);
    }

    #[test]
    fn test_aligned_frame_rotates_direction() {
        let t = Transform::axis_align(&Point3::new(0.0, 0.0, 1.0), &Vec3::x()).unwrap();
        let ray = Ray::new(Point3::new(2.0, 0.0, 1.0), Vec3::x());
        let local = ray.to_local(&t, Frame::Aligned);
        assert_relative_eq!(local.origin, Point3::new(0.0, 0.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(local.direction, Vec3::z(), epsilon = 1e-12);
    }
}
