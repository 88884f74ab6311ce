//! Body types and their validated parameters.

use std::fmt;

use gemca_math::{Point3, Vec3};

use crate::BodyError;

/// Body type keyword as written in a geometry file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyType {
    /// `SPH` sphere.
    Sph,
    /// `WED` right-angle wedge.
    Wed,
    /// `ARB` arbitrary convex polyhedron.
    Arb,
    /// `BOX` general parallelepiped.
    Box,
    /// `VOX` CT voxel volume.
    Vox,
    /// `RPP` axis-aligned box.
    Rpp,
    /// `RCC` right circular cylinder.
    Rcc,
    /// `REC` right elliptical cylinder.
    Rec,
    /// `TRC` truncated right cone.
    Trc,
    /// `ELL` ellipsoid.
    Ell,
    /// `YZP` plane perpendicular to X.
    Yzp,
    /// `XZP` plane perpendicular to Y.
    Xzp,
    /// `XYP` plane perpendicular to Z.
    Xyp,
    /// `PLA` arbitrary plane.
    Pla,
    /// `ROT` rotation of another body.
    Rot,
    /// `CPY` copy of another body.
    Cpy,
    /// `MOV` translation of another body.
    Mov,
}

impl BodyType {
    /// Every body type, in keyword order.
    pub const ALL: [BodyType; 17] = [
        BodyType::Sph,
        BodyType::Wed,
        BodyType::Arb,
        BodyType::Box,
        BodyType::Vox,
        BodyType::Rpp,
        BodyType::Rcc,
        BodyType::Rec,
        BodyType::Trc,
        BodyType::Ell,
        BodyType::Yzp,
        BodyType::Xzp,
        BodyType::Xyp,
        BodyType::Pla,
        BodyType::Rot,
        BodyType::Cpy,
        BodyType::Mov,
    ];

    /// Look up a keyword, ignoring case.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Upper-case keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            BodyType::Sph => "SPH",
            BodyType::Wed => "WED",
            BodyType::Arb => "ARB",
            BodyType::Box => "BOX",
            BodyType::Vox => "VOX",
            BodyType::Rpp => "RPP",
            BodyType::Rcc => "RCC",
            BodyType::Rec => "REC",
            BodyType::Trc => "TRC",
            BodyType::Ell => "ELL",
            BodyType::Yzp => "YZP",
            BodyType::Xzp => "XZP",
            BodyType::Xyp => "XYP",
            BodyType::Pla => "PLA",
            BodyType::Rot => "ROT",
            BodyType::Cpy => "CPY",
            BodyType::Mov => "MOV",
        }
    }

    /// Accepted parameter counts as (min, max, description).
    fn arg_counts(self) -> (usize, usize, &'static str) {
        match self {
            BodyType::Sph => (4, 4, "4"),
            BodyType::Wed | BodyType::Box | BodyType::Rec | BodyType::Ell => (12, 12, "12"),
            BodyType::Arb => (24, MAX_PARAMS, ARB_COUNTS),
            BodyType::Vox | BodyType::Rpp | BodyType::Pla => (6, 6, "6"),
            BodyType::Rcc => (7, 7, "7"),
            BodyType::Trc => (8, 8, "8"),
            BodyType::Yzp | BodyType::Xzp | BodyType::Xyp => (1, 1, "1"),
            BodyType::Rot | BodyType::Cpy | BodyType::Mov => (0, MAX_PARAMS, "any"),
        }
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Largest parameter list any body accepts (ARB with six face descriptors).
pub const MAX_PARAMS: usize = 30;

const ARB_COUNTS: &str = "24, 25 or 30";

/// Face descriptors of a hexahedron in FLUKA vertex order, used by the
/// 25-value ARB card.
pub const ARB_STANDARD_DESCRIPTORS: [u32; 6] = [4321, 5678, 1265, 2376, 1485, 3487];

/// Face definitions of an ARB body.
#[derive(Debug, Clone, PartialEq)]
pub enum ArbFaces {
    /// Fixed vertex triples: vertices 0-3 form the bottom loop, 4-7 the top.
    Fixed,
    /// Face descriptors, one per face: up to four 1-based vertex digits,
    /// e.g. `1243`. A zero descriptor marks an absent face. A 25-value card
    /// carries [`ARB_STANDARD_DESCRIPTORS`].
    Descriptors(Vec<u32>),
}

/// Bounding box of a voxel volume in its local frame (isocenter at the
/// origin, before couch and gantry rotations).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelExtent {
    /// Lower corner.
    pub min: Point3,
    /// Upper corner.
    pub max: Point3,
}

/// A body type together with its validated parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyKind {
    /// Sphere around `center`.
    Sphere {
        /// Center.
        center: Point3,
        /// Radius.
        radius: f64,
    },
    /// Right-angle wedge: a triangular prism.
    ///
    /// The triangle is spanned by `side_a` and `side_b` at `origin` and
    /// extruded along `height`.
    Wedge {
        /// Corner of the right angle.
        origin: Point3,
        /// Extrusion vector.
        height: Vec3,
        /// First triangle leg.
        side_a: Vec3,
        /// Second triangle leg.
        side_b: Vec3,
    },
    /// Convex polyhedron with eight vertices.
    Polyhedron {
        /// Vertices.
        vertices: [Point3; 8],
        /// Which vertices form each face.
        faces: ArbFaces,
    },
    /// Parallelepiped spanned by three edge vectors from `origin`.
    Cuboid {
        /// Corner vertex.
        origin: Point3,
        /// Edge vectors.
        edges: [Vec3; 3],
    },
    /// CT voxel volume rotated about its isocenter.
    Voxels {
        /// Isocenter in universe coordinates.
        isocenter: Point3,
        /// Couch angle in degrees (rotation about Y).
        couch: f64,
        /// Gantry angle in degrees (rotation about Z).
        gantry: f64,
        /// Dose prescribed to the target.
        target_dose: f64,
        /// Extent of the voxel grid.
        extent: VoxelExtent,
    },
    /// Box with faces perpendicular to the coordinate axes.
    AxisBox {
        /// Lower corner.
        min: Point3,
        /// Upper corner.
        max: Point3,
    },
    /// Right circular cylinder.
    Cylinder {
        /// Center of the base cap.
        base: Point3,
        /// Axis from base cap to top cap.
        axis: Vec3,
        /// Radius.
        radius: f64,
    },
    /// Right elliptical cylinder.
    EllipticCylinder {
        /// Center of the base cap.
        base: Point3,
        /// Axis from base cap to top cap.
        axis: Vec3,
        /// Minor semi-axis vector.
        minor: Vec3,
        /// Major semi-axis vector.
        major: Vec3,
    },
    /// Truncated right circular cone.
    TruncatedCone {
        /// Center of the base cap.
        base: Point3,
        /// Axis from base cap to top cap.
        axis: Vec3,
        /// Radius at the base cap.
        base_radius: f64,
        /// Radius at the top cap.
        top_radius: f64,
    },
    /// Ellipsoid with three semi-axis vectors.
    Ellipsoid {
        /// Center.
        center: Point3,
        /// Semi-axis vectors; the first fixes local Z, the second local X.
        axes: [Vec3; 3],
    },
    /// Half-space `x < x0`.
    YzPlane(f64),
    /// Half-space `y < y0`.
    XzPlane(f64),
    /// Half-space `z < z0`.
    XyPlane(f64),
    /// Half-space behind a plane.
    Plane {
        /// Normal pointing away from the body.
        normal: Vec3,
        /// Any point on the plane.
        point: Point3,
    },
}

fn point(p: &[f64]) -> Point3 {
    Point3::new(p[0], p[1], p[2])
}

fn vector(p: &[f64]) -> Vec3 {
    Vec3::new(p[0], p[1], p[2])
}

fn check_count(ty: BodyType, params: &[f64]) -> Result<(), BodyError> {
    let (min, max, expected) = ty.arg_counts();
    if params.len() < min || params.len() > max {
        return Err(BodyError::ArgCount {
            keyword: ty.keyword(),
            expected,
            found: params.len(),
        });
    }
    Ok(())
}

fn nonzero(ty: BodyType, v: Vec3, what: &str) -> Result<Vec3, BodyError> {
    if v.norm_squared() > 0.0 {
        Ok(v)
    } else {
        Err(BodyError::degenerate(ty.keyword(), format!("{what} has zero length")))
    }
}

fn positive(ty: BodyType, v: f64, what: &str) -> Result<f64, BodyError> {
    if v > 0.0 {
        Ok(v)
    } else {
        Err(BodyError::degenerate(ty.keyword(), format!("{what} must be positive, got {v}")))
    }
}

impl BodyKind {
    /// Validate a raw parameter list for `ty`.
    ///
    /// `VOX` needs the extent from its header and is built with
    /// [`BodyKind::voxels`] instead; `ROT`, `CPY` and `MOV` are rejected.
    pub fn from_params(ty: BodyType, params: &[f64]) -> Result<Self, BodyError> {
        check_count(ty, params)?;
        let p = params;
        let kind = match ty {
            BodyType::Sph => BodyKind::Sphere {
                center: point(p),
                radius: positive(ty, p[3], "radius")?,
            },
            BodyType::Wed => BodyKind::Wedge {
                origin: point(p),
                height: nonzero(ty, vector(&p[3..]), "height")?,
                side_a: nonzero(ty, vector(&p[6..]), "first side")?,
                side_b: nonzero(ty, vector(&p[9..]), "second side")?,
            },
            BodyType::Arb => {
                let vertices = std::array::from_fn(|i| point(&p[3 * i..]));
                let faces = match p.len() {
                    24 => ArbFaces::Fixed,
                    25 => {
                        face_descriptor(p[24])?;
                        ArbFaces::Descriptors(ARB_STANDARD_DESCRIPTORS.to_vec())
                    }
                    MAX_PARAMS => {
                        let codes = p[24..]
                            .iter()
                            .map(|&d| face_descriptor(d))
                            .collect::<Result<Vec<_>, _>>()?;
                        if codes.iter().filter(|&&c| c != 0).count() < 4 {
                            return Err(BodyError::degenerate(
                                ty.keyword(),
                                "at least four faces are needed to close the body",
                            ));
                        }
                        ArbFaces::Descriptors(codes)
                    }
                    found => {
                        return Err(BodyError::ArgCount {
                            keyword: ty.keyword(),
                            expected: ARB_COUNTS,
                            found,
                        })
                    }
                };
                BodyKind::Polyhedron { vertices, faces }
            }
            BodyType::Box => BodyKind::Cuboid {
                origin: point(p),
                edges: [
                    nonzero(ty, vector(&p[3..]), "first edge")?,
                    nonzero(ty, vector(&p[6..]), "second edge")?,
                    nonzero(ty, vector(&p[9..]), "third edge")?,
                ],
            },
            BodyType::Vox => return Err(BodyError::MissingVoxelHeader),
            BodyType::Rpp => {
                let min = Point3::new(p[0], p[2], p[4]);
                let max = Point3::new(p[1], p[3], p[5]);
                if (0..3).any(|i| min[i] >= max[i]) {
                    return Err(BodyError::degenerate(
                        ty.keyword(),
                        "each minimum must be below its maximum",
                    ));
                }
                BodyKind::AxisBox { min, max }
            }
            BodyType::Rcc => BodyKind::Cylinder {
                base: point(p),
                axis: nonzero(ty, vector(&p[3..]), "axis")?,
                radius: positive(ty, p[6], "radius")?,
            },
            BodyType::Rec => BodyKind::EllipticCylinder {
                base: point(p),
                axis: nonzero(ty, vector(&p[3..]), "axis")?,
                minor: nonzero(ty, vector(&p[6..]), "minor axis")?,
                major: nonzero(ty, vector(&p[9..]), "major axis")?,
            },
            BodyType::Trc => {
                let (base_radius, top_radius) = (p[6], p[7]);
                if base_radius < 0.0 || top_radius < 0.0 || base_radius + top_radius == 0.0 {
                    return Err(BodyError::degenerate(
                        ty.keyword(),
                        "radii must be non-negative and not both zero",
                    ));
                }
                BodyKind::TruncatedCone {
                    base: point(p),
                    axis: nonzero(ty, vector(&p[3..]), "axis")?,
                    base_radius,
                    top_radius,
                }
            }
            BodyType::Ell => BodyKind::Ellipsoid {
                center: point(p),
                axes: [
                    nonzero(ty, vector(&p[3..]), "first semi-axis")?,
                    nonzero(ty, vector(&p[6..]), "second semi-axis")?,
                    nonzero(ty, vector(&p[9..]), "third semi-axis")?,
                ],
            },
            BodyType::Yzp => BodyKind::YzPlane(p[0]),
            BodyType::Xzp => BodyKind::XzPlane(p[0]),
            BodyType::Xyp => BodyKind::XyPlane(p[0]),
            BodyType::Pla => BodyKind::Plane {
                normal: nonzero(ty, vector(p), "normal")?,
                point: point(&p[3..]),
            },
            BodyType::Rot | BodyType::Cpy | BodyType::Mov => {
                return Err(BodyError::Unsupported(ty.keyword()))
            }
        };
        Ok(kind)
    }

    /// Build a `VOX` body from its six parameters (isocenter, couch and
    /// gantry angles in degrees, target dose) and the grid extent.
    pub fn voxels(params: &[f64], extent: VoxelExtent) -> Result<Self, BodyError> {
        check_count(BodyType::Vox, params)?;
        if (0..3).any(|i| extent.min[i] >= extent.max[i]) {
            return Err(BodyError::degenerate("VOX", "empty voxel extent"));
        }
        Ok(BodyKind::Voxels {
            isocenter: point(params),
            couch: params[3],
            gantry: params[4],
            target_dose: params[5],
            extent,
        })
    }

    /// The type keyword this body was declared with.
    pub fn body_type(&self) -> BodyType {
        match self {
            BodyKind::Sphere { .. } => BodyType::Sph,
            BodyKind::Wedge { .. } => BodyType::Wed,
            BodyKind::Polyhedron { .. } => BodyType::Arb,
            BodyKind::Cuboid { .. } => BodyType::Box,
            BodyKind::Voxels { .. } => BodyType::Vox,
            BodyKind::AxisBox { .. } => BodyType::Rpp,
            BodyKind::Cylinder { .. } => BodyType::Rcc,
            BodyKind::EllipticCylinder { .. } => BodyType::Rec,
            BodyKind::TruncatedCone { .. } => BodyType::Trc,
            BodyKind::Ellipsoid { .. } => BodyType::Ell,
            BodyKind::YzPlane(_) => BodyType::Yzp,
            BodyKind::XzPlane(_) => BodyType::Xzp,
            BodyKind::XyPlane(_) => BodyType::Xyp,
            BodyKind::Plane { .. } => BodyType::Pla,
        }
    }
}

/// Decode a face descriptor like `1243.0`; 0 means no face.
fn face_descriptor(value: f64) -> Result<u32, BodyError> {
    if value.fract() != 0.0 || !(0.0..=9999.0).contains(&value) {
        return Err(BodyError::FaceDescriptor(value));
    }
    let code = value as u32;
    if code == 0 {
        return Ok(0);
    }
    let digits = [code / 1000, code / 100 % 10, code / 10 % 10];
    if digits.iter().any(|&d| d == 0 || d > 8) {
        return Err(BodyError::FaceDescriptor(value));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_ignores_case() {
        assert_eq!(BodyType::from_keyword("rcc"), Some(BodyType::Rcc));
        assert_eq!(BodyType::from_keyword("Sph"), Some(BodyType::Sph));
        assert_eq!(BodyType::from_keyword("zone"), None);
    }

    #[test]
    fn test_arg_count_checked() {
        let err = BodyKind::from_params(BodyType::Sph, &[0.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(
            err,
            BodyError::ArgCount { keyword: "SPH", expected: "4", found: 3 }
        );
        assert!(BodyKind::from_params(BodyType::Arb, &[0.0; 23]).is_err());
        assert!(BodyKind::from_params(BodyType::Arb, &[0.0; 31]).is_err());
    }

    #[test]
    fn test_rpp_fields_are_ranges() {
        let kind =
            BodyKind::from_params(BodyType::Rpp, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(
            kind,
            BodyKind::AxisBox {
                min: Point3::new(0.0, 2.0, 4.0),
                max: Point3::new(1.0, 3.0, 5.0),
            }
        );
        assert!(BodyKind::from_params(BodyType::Rpp, &[1.0, 0.0, 0.0, 1.0, 0.0, 1.0]).is_err());
    }

    #[test]
    fn test_degenerate_parameters_rejected() {
        assert!(BodyKind::from_params(BodyType::Sph, &[0.0, 0.0, 0.0, 0.0]).is_err());
        assert!(BodyKind::from_params(BodyType::Rcc, &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]).is_err());
        assert!(BodyKind::from_params(
            BodyType::Trc,
            &[0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]
        )
        .is_err());
    }

    #[test]
    fn test_arb_convention_selected_by_count() {
        let mut params = vec![0.0; 24];
        let kind = BodyKind::from_params(BodyType::Arb, &params).unwrap();
        assert!(matches!(kind, BodyKind::Polyhedron { faces: ArbFaces::Fixed, .. }));

        params.push(1243.0);
        let kind = BodyKind::from_params(BodyType::Arb, &params).unwrap();
        assert!(matches!(
            kind,
            BodyKind::Polyhedron { faces: ArbFaces::Descriptors(ref d), .. }
                if d == &ARB_STANDARD_DESCRIPTORS.to_vec()
        ));

        params.extend([0.0; 5]);
        params[24..].copy_from_slice(&[4321.0, 5678.0, 1265.0, 2376.0, 1485.0, 0.0]);
        let kind = BodyKind::from_params(BodyType::Arb, &params).unwrap();
        assert!(matches!(
            kind,
            BodyKind::Polyhedron { faces: ArbFaces::Descriptors(ref d), .. } if d.len() == 6
        ));
    }

    #[test]
    fn test_arb_partial_descriptor_cards_rejected() {
        let mut params = vec![0.0; 24];
        params.extend([4321.0, 5678.0]);
        assert_eq!(
            BodyKind::from_params(BodyType::Arb, &params),
            Err(BodyError::ArgCount { keyword: "ARB", expected: "24, 25 or 30", found: 26 })
        );

        let mut params = vec![0.0; 24];
        params.push(1290.0);
        assert_eq!(
            BodyKind::from_params(BodyType::Arb, &params),
            Err(BodyError::FaceDescriptor(1290.0))
        );

        let mut params = vec![0.0; 24];
        params.extend([4321.0, 5678.0, 1265.0, 0.0, 0.0, 0.0]);
        assert!(matches!(
            BodyKind::from_params(BodyType::Arb, &params),
            Err(BodyError::Degenerate { keyword: "ARB", .. })
        ));
    }

    #[test]
    fn test_face_descriptor_validation() {
        assert_eq!(face_descriptor(0.0), Ok(0));
        assert_eq!(face_descriptor(5670.0), Ok(5670));
        assert!(face_descriptor(1290.0).is_err());
        assert!(face_descriptor(12.5).is_err());
        assert!(face_descriptor(-1234.0).is_err());
    }

    #[test]
    fn test_editing_operators_rejected() {
        for ty in [BodyType::Rot, BodyType::Cpy, BodyType::Mov] {
            assert_eq!(
                BodyKind::from_params(ty, &[1.0]),
                Err(BodyError::Unsupported(ty.keyword()))
            );
        }
    }

    #[test]
    fn test_vox_needs_extent() {
        let params = [0.0, 0.0, 0.0, 90.0, 0.0, 2.0];
        assert_eq!(
            BodyKind::from_params(BodyType::Vox, &params),
            Err(BodyError::MissingVoxelHeader)
        );
        let extent = VoxelExtent {
            min: Point3::new(-1.0, -1.0, -1.0),
            max: Point3::new(1.0, 1.0, 1.0),
        };
        let kind = BodyKind::voxels(&params, extent).unwrap();
        assert_eq!(kind.body_type(), BodyType::Vox);
    }
}
