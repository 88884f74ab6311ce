#![warn(missing_docs)]

//! CSG geometry kernel for Monte-Carlo particle transport.
//!
//! Loads a geometry file of primitive bodies and zones built from them,
//! then answers the questions a transport loop asks for every step: which
//! zone holds a particle, and how far it can fly before leaving that zone.
//!
//! # Example
//!
//! ```
//! use gemca::{Point3, Ray, Vec3, ZoneId};
//!
//! let ws = gemca::load_from_str(
//!     "RPP world -50 50 -50 50 -50 50\n\
//!      SPH ball 0 0 0 10\n\
//!      END\n\
//!      target +ball\n\
//!      air    +world -ball\n\
//!      END\n\
//!      1 0\n\
//!      END\n",
//! )
//! .unwrap();
//!
//! let ray = Ray::new(Point3::new(-30.0, 0.0, 0.0), Vec3::x());
//! let zone = gemca::zone_of(&ws, &ray).unwrap();
//! assert_eq!(zone, ZoneId(2));
//! let d = gemca::distance_to_boundary(&ws, zone, &ray);
//! assert!((d - 20.0).abs() < 1e-9);
//! ```

pub use gemca_body;
pub use gemca_csg;
pub use gemca_geo;
pub use gemca_math;
pub use gemca_surface;
pub use gemca_zone;

pub use gemca_body::{Body, BodyError, BodyId, BodyKind, BodyType};
pub use gemca_csg::{compile, CsgError, CsgOp, CsgTree};
pub use gemca_geo::{load_from_str, GeoError, Loader, NoVoxelHeaders, VoxelHeaderSource};
pub use gemca_math::{Frame, Point3, Ray, Tolerance, Transform, Vec3};
pub use gemca_zone::{EvalConfig, Segment, Workspace, Zone, ZoneId};

use std::path::Path;

/// Load a geometry file.
pub fn load(path: impl AsRef<Path>) -> Result<Workspace, GeoError> {
    gemca_geo::load(path)
}

/// First zone, in file order, that contains the ray's origin.
pub fn zone_of(workspace: &Workspace, ray: &Ray) -> Option<ZoneId> {
    workspace.zone_of(ray)
}

/// 0-based index of the zone containing the ray's origin.
pub fn zone_index(workspace: &Workspace, ray: &Ray) -> Option<usize> {
    workspace.zone_index(ray)
}

/// Distance along the ray until it leaves `zone`.
///
/// Zero if the ray does not start inside the zone, infinite if nothing
/// bounds the zone ahead of it.
pub fn distance_to_boundary(workspace: &Workspace, zone: ZoneId, ray: &Ray) -> f64 {
    workspace.distance_to_boundary(zone, ray)
}
