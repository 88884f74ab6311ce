//! Per-type construction of body frames and surfaces.

use gemca_math::{Frame, Point3, Transform, Vec3};
use gemca_surface::{Axis, Surface};

use crate::{ArbFaces, BodyError, BodyKind, VoxelExtent};

type Setup = (Frame, Transform, Vec<Surface>);

/// Vertex triples of the fixed ARB convention. Vertices 0-3 are the bottom
/// loop and 4-7 the top loop directly above them.
const ARB_FIXED_FACES: [[usize; 3]; 6] = [
    [0, 1, 2],
    [1, 2, 5],
    [2, 3, 6],
    [0, 3, 4],
    [0, 4, 1],
    [4, 7, 5],
];

/// Build the frame, transform and surfaces for a body.
pub(crate) fn build(kind: &BodyKind) -> Result<Setup, BodyError> {
    let keyword = kind.body_type().keyword();
    match kind {
        BodyKind::Sphere { center, radius } => Ok((
            Frame::Centered,
            Transform::translation(-center.x, -center.y, -center.z),
            vec![Surface::Sphere { r2: radius * radius }],
        )),

        BodyKind::Wedge { origin, height, side_a, side_b } => {
            let interior = origin + 0.25 * (height + side_a + side_b);
            let faces = [
                (*origin, -height),
                (origin + height, *height),
                (*origin, height.cross(side_a)),
                (*origin, side_b.cross(height)),
                (origin + side_a, (side_b - side_a).cross(height)),
            ];
            let surfaces = faces
                .iter()
                .map(|(p, n)| outward_plane(keyword, p, n, &interior))
                .collect::<Result<_, _>>()?;
            Ok((Frame::Universe, Transform::identity(), surfaces))
        }

        BodyKind::Polyhedron { vertices, faces } => {
            let triples: Vec<[usize; 3]> = match faces {
                ArbFaces::Fixed => ARB_FIXED_FACES.to_vec(),
                ArbFaces::Descriptors(codes) => codes
                    .iter()
                    .filter(|&&code| code != 0)
                    .map(|&code| {
                        let digit = |scale: u32| (code / scale % 10) as usize - 1;
                        [digit(1000), digit(100), digit(10)]
                    })
                    .collect(),
            };
            let mut used = [false; 8];
            triples.iter().flatten().for_each(|&i| used[i] = true);
            let corners: Vec<Vec3> =
                (0..8).filter(|&i| used[i]).map(|i| vertices[i].coords).collect();
            let centroid =
                Point3::from(corners.iter().copied().sum::<Vec3>() / corners.len() as f64);
            let faces: Vec<(Point3, Vec3)> = triples
                .iter()
                .map(|&[i, j, k]| {
                    let normal = (vertices[j] - vertices[i]).cross(&(vertices[k] - vertices[i]));
                    (vertices[i], outward(&vertices[i], normal, &centroid))
                })
                .collect();
            let normals: Vec<Vec3> = faces.iter().map(|(_, n)| *n).collect();
            if !encloses(&normals) {
                return Err(BodyError::degenerate(keyword, "faces do not enclose a bounded volume"));
            }
            let surfaces = faces
                .iter()
                .map(|(p, n)| plane(keyword, p, n))
                .collect::<Result<_, _>>()?;
            Ok((Frame::Universe, Transform::identity(), surfaces))
        }

        BodyKind::Cuboid { origin, edges } => {
            let opposite = origin + edges[0] + edges[1] + edges[2];
            let mut surfaces = Vec::with_capacity(6);
            for edge in edges {
                surfaces.push(plane(keyword, origin, &-edge)?);
            }
            for edge in edges {
                surfaces.push(plane(keyword, &opposite, edge)?);
            }
            Ok((Frame::Universe, Transform::identity(), surfaces))
        }

        BodyKind::Voxels { isocenter, couch, gantry, extent, .. } => {
            let transform = Transform::rotation_y(-couch.to_radians())
                .then(&Transform::rotation_z(-gantry.to_radians()))
                .then(&Transform::translation(-isocenter.x, -isocenter.y, -isocenter.z));
            Ok((Frame::Aligned, transform, box_planes(extent)))
        }

        BodyKind::AxisBox { min, max } => Ok((
            Frame::Universe,
            Transform::identity(),
            box_planes(&VoxelExtent { min: *min, max: *max }),
        )),

        BodyKind::Cylinder { base, axis, radius } => {
            let transform = aligned(keyword, Transform::axis_align(base, axis))?;
            let mut surfaces = caps(axis.norm());
            surfaces.push(Surface::Cylinder { r2: radius * radius });
            Ok((Frame::Aligned, transform, surfaces))
        }

        BodyKind::EllipticCylinder { base, axis, minor, major } => {
            let transform = aligned(keyword, Transform::from_basis(base, axis, minor))?;
            let mut surfaces = caps(axis.norm());
            surfaces.push(Surface::EllipticCylinder {
                a2: minor.norm_squared(),
                b2: major.norm_squared(),
            });
            Ok((Frame::Aligned, transform, surfaces))
        }

        BodyKind::TruncatedCone { base, axis, base_radius, top_radius } => {
            let transform = aligned(keyword, Transform::axis_align(base, axis))?;
            let height = axis.norm();
            let mut surfaces = caps(height);
            let taper = base_radius - top_radius;
            if taper == 0.0 {
                surfaces.push(Surface::Cylinder { r2: base_radius * base_radius });
            } else {
                surfaces.push(Surface::Cone {
                    apex: height * base_radius / taper,
                    k: (taper / height).powi(2),
                });
            }
            Ok((Frame::Aligned, transform, surfaces))
        }

        BodyKind::Ellipsoid { center, axes } => {
            let transform = aligned(keyword, Transform::from_basis(center, &axes[0], &axes[1]))?;
            Ok((
                Frame::Aligned,
                transform,
                vec![Surface::Ellipsoid {
                    a2: axes[1].norm_squared(),
                    b2: axes[2].norm_squared(),
                    c2: axes[0].norm_squared(),
                }],
            ))
        }

        BodyKind::YzPlane(x) => Ok(half_space(Axis::X, *x)),
        BodyKind::XzPlane(y) => Ok(half_space(Axis::Y, *y)),
        BodyKind::XyPlane(z) => Ok(half_space(Axis::Z, *z)),

        BodyKind::Plane { normal, point } => Ok((
            Frame::Universe,
            Transform::identity(),
            vec![plane(keyword, point, normal)?],
        )),
    }
}

fn plane(keyword: &'static str, point: &Point3, normal: &Vec3) -> Result<Surface, BodyError> {
    Surface::plane_through(point, normal)
        .ok_or_else(|| BodyError::degenerate(keyword, "face normal has zero length"))
}

/// Plane through `point` with `normal` flipped if needed so that
/// `interior` lies on its inside.
fn outward_plane(
    keyword: &'static str,
    point: &Point3,
    normal: &Vec3,
    interior: &Point3,
) -> Result<Surface, BodyError> {
    plane(keyword, point, &outward(point, *normal, interior))
}

fn outward(point: &Point3, normal: Vec3, interior: &Point3) -> Vec3 {
    if normal.dot(&(interior - point)) > 0.0 {
        -normal
    } else {
        normal
    }
}

/// Whether half-spaces with these outward normals bound a finite volume.
///
/// The intersection is unbounded exactly when some direction `v` has
/// `n · v <= 0` for every normal. Such a cone, if not trivial, has an edge
/// along the cross product of two normals, or all normals are parallel.
fn encloses(normals: &[Vec3]) -> bool {
    let recedes = |v: Vec3| normals.iter().all(|n| n.dot(&v) <= 1e-12 * n.norm() * v.norm());
    let mut spanned = false;
    for (i, a) in normals.iter().enumerate() {
        for b in &normals[i + 1..] {
            let edge = a.cross(b);
            if edge.norm_squared() == 0.0 {
                continue;
            }
            spanned = true;
            if recedes(edge) || recedes(-edge) {
                return false;
            }
        }
    }
    spanned
}

fn aligned(keyword: &'static str, transform: Option<Transform>) -> Result<Transform, BodyError> {
    transform.ok_or_else(|| BodyError::degenerate(keyword, "spanning vectors are parallel"))
}

/// End caps `z >= 0` and `z <= height` of an axis-aligned body.
fn caps(height: f64) -> Vec<Surface> {
    vec![
        Surface::AxisPlane { axis: Axis::Z, a: -1.0, d: 0.0 },
        Surface::AxisPlane { axis: Axis::Z, a: 1.0, d: -height },
    ]
}

fn box_planes(extent: &VoxelExtent) -> Vec<Surface> {
    [Axis::X, Axis::Y, Axis::Z]
        .into_iter()
        .flat_map(|axis| {
            let i = axis.index();
            [
                Surface::AxisPlane { axis, a: -1.0, d: extent.min[i] },
                Surface::AxisPlane { axis, a: 1.0, d: -extent.max[i] },
            ]
        })
        .collect()
}

fn half_space(axis: Axis, at: f64) -> (Frame, Transform, Vec<Surface>) {
    (
        Frame::Universe,
        Transform::identity(),
        vec![Surface::AxisPlane { axis, a: 1.0, d: -at }],
    )
}
