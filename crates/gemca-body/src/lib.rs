#![warn(missing_docs)]

//! Primitive bodies for the gemca geometry kernel.
//!
//! A body is the intersection of the inside half-spaces of its surfaces,
//! evaluated in a local frame chosen per body type. Parameters arrive as
//! raw numbers from a geometry file, are validated into a [`BodyKind`],
//! and turned into a transform plus surface list by [`Body::new`].

mod error;
mod kind;
mod setup;

pub use error::BodyError;
pub use kind::{ArbFaces, BodyKind, BodyType, VoxelExtent, ARB_STANDARD_DESCRIPTORS, MAX_PARAMS};

use gemca_math::{Frame, Ray, Tolerance, Transform};
use gemca_surface::Surface;

/// Index of a body within a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

/// A named primitive solid, ready for ray queries.
#[derive(Debug, Clone)]
pub struct Body {
    /// User-given name.
    pub name: String,
    /// Type and parameters.
    pub kind: BodyKind,
    /// Source line the body was declared on, 0 if not from a file.
    pub line: usize,
    frame: Frame,
    transform: Transform,
    surfaces: Vec<Surface>,
}

impl Body {
    /// Set up the local frame and bounding surfaces for `kind`.
    pub fn new(name: impl Into<String>, kind: BodyKind) -> Result<Self, BodyError> {
        let (frame, transform, surfaces) = setup::build(&kind)?;
        Ok(Self {
            name: name.into(),
            kind,
            line: 0,
            frame,
            transform,
            surfaces,
        })
    }

    /// Record the source line of this body.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Kind of local frame the body is evaluated in.
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Universe-to-local transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Bounding surfaces in the local frame.
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// Express a universe ray in this body's local frame.
    pub fn to_local(&self, ray: &Ray) -> Ray {
        ray.to_local(&self.transform, self.frame)
    }

    /// Whether the ray starts inside every surface of the body.
    pub fn contains(&self, ray: &Ray, tol: &Tolerance) -> bool {
        let local = self.to_local(ray);
        self.surfaces.iter().all(|s| s.is_inside(&local, tol))
    }

    /// Smallest strictly positive distance to any of the body's surfaces,
    /// or infinity.
    pub fn distance(&self, ray: &Ray, tol: &Tolerance) -> f64 {
        let local = self.to_local(ray);
        self.surfaces
            .iter()
            .map(|s| s.distance(&local, tol))
            .filter(|&d| d > 0.0)
            .fold(f64::INFINITY, f64::min)
    }
}
