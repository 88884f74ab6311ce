//! The loaded geometry: bodies, zones and the queries over them.

use std::fmt;
use std::path::{Path, PathBuf};

use gemca_body::Body;
use gemca_math::{Point3, Ray};
use log::debug;

use crate::{EvalConfig, Evaluator, WorkspaceError, Zone, ZoneId};

/// One leg of a ray traced through consecutive zones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Zone the leg lies in.
    pub zone: ZoneId,
    /// Where the leg starts.
    pub start: Point3,
    /// Track length inside the zone; infinite for the last leg of a ray
    /// that never leaves its zone.
    pub length: f64,
}

/// Bodies and zones of one geometry, queried many times after loading.
#[derive(Debug, Clone)]
pub struct Workspace {
    bodies: Vec<Body>,
    zones: Vec<Zone>,
    source: Option<PathBuf>,
    config: EvalConfig,
}

impl Workspace {
    /// Assemble a workspace, checking that zone ids run from 1 and that
    /// every zone tree refers to existing bodies.
    pub fn new(bodies: Vec<Body>, zones: Vec<Zone>) -> Result<Self, WorkspaceError> {
        for (i, zone) in zones.iter().enumerate() {
            let expected = ZoneId(i + 1);
            if zone.id != expected {
                return Err(WorkspaceError::ZoneIdGap {
                    expected,
                    found: zone.id,
                });
            }
            if let Some(body) = zone.tree.bodies().find(|b| b.0 >= bodies.len()) {
                return Err(WorkspaceError::MissingBody {
                    zone: zone.id,
                    body: body.0,
                    count: bodies.len(),
                });
            }
        }
        Ok(Self {
            bodies,
            zones,
            source: None,
            config: EvalConfig::default(),
        })
    }

    /// Record the file the workspace was loaded from.
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// Replace the evaluator configuration.
    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// All bodies.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// All zones, in id order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Look up a zone by id.
    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        id.index().and_then(|i| self.zones.get(i))
    }

    /// Look up a zone by name.
    pub fn zone_named(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }

    /// Medium filling a zone.
    pub fn medium_of(&self, id: ZoneId) -> Option<u32> {
        self.zone(id).map(|z| z.medium)
    }

    /// File the workspace was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Evaluator configuration.
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.bodies, self.config.tolerance)
    }

    /// Whether the ray starts inside the zone. Unknown zones contain nothing.
    pub fn is_inside(&self, id: ZoneId, ray: &Ray) -> bool {
        self.zone(id)
            .is_some_and(|z| self.evaluator().contains(&z.tree, ray))
    }

    /// First zone, in id order, that contains the ray start.
    ///
    /// `None` means the point lies in no zone, which a well-formed geometry
    /// tiling all of space never produces.
    pub fn zone_of(&self, ray: &Ray) -> Option<ZoneId> {
        self.zone_index(ray).map(|i| self.zones[i].id)
    }

    /// 0-based position of the zone [`Workspace::zone_of`] finds.
    pub fn zone_index(&self, ray: &Ray) -> Option<usize> {
        let eval = self.evaluator();
        self.zones.iter().position(|z| eval.contains(&z.tree, ray))
    }

    /// Distance the ray travels inside zone `id` before leaving it.
    ///
    /// Returns 0 if the ray does not start in the zone or the zone is
    /// unknown, and infinity if the zone is unbounded along the ray.
    pub fn distance_to_boundary(&self, id: ZoneId, ray: &Ray) -> f64 {
        match self.zone(id) {
            Some(zone) => self
                .evaluator()
                .exit_distance(&zone.tree, ray, self.config.max_steps),
            None => 0.0,
        }
    }

    /// Follow a ray through up to `max_zones` consecutive zones.
    ///
    /// Stops early when the ray reaches a point in no zone or a zone it
    /// never leaves. The segment lengths add up to the distance between the
    /// ray origin and the final exit point.
    pub fn trace(&self, ray: &Ray, max_zones: usize) -> Vec<Segment> {
        let mut ray = Ray::new(ray.origin, ray.direction);
        let mut segments = Vec::new();
        while segments.len() < max_zones {
            let Some(zone) = self.zone_of(&ray) else {
                debug!("trace left all zones at {:?}", ray.origin);
                break;
            };
            let length = self.distance_to_boundary(zone, &ray);
            segments.push(Segment {
                zone,
                start: ray.origin,
                length,
            });
            if !length.is_finite() {
                break;
            }
            ray = ray.advanced(length);
        }
        segments
    }

    /// A zone's compiled expression with body names at the leaves.
    pub fn render_zone(&self, zone: &Zone) -> String {
        zone.tree.render(&|id| {
            self.bodies
                .get(id.0)
                .map_or_else(|| format!("#{}", id.0), |b| b.name.clone())
        })
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(path) => writeln!(f, "geometry: {}", path.display())?,
            None => writeln!(f, "geometry: <memory>")?,
        }
        writeln!(f, "  bodies: {}", self.bodies.len())?;
        for body in &self.bodies {
            writeln!(
                f,
                "    {} {} ({} surfaces)",
                body.kind.body_type(),
                body.name,
                body.surfaces().len()
            )?;
        }
        writeln!(f, "  zones: {}", self.zones.len())?;
        for zone in &self.zones {
            writeln!(
                f,
                "    {:>4} {} medium {}: {}",
                zone.id,
                zone.name,
                zone.medium,
                self.render_zone(zone)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gemca_body::{BodyId, BodyKind, BodyType};
    use gemca_csg::compile;
    use gemca_math::Vec3;

    fn body(name: &str, ty: BodyType, params: &[f64]) -> Body {
        Body::new(name, BodyKind::from_params(ty, params).unwrap()).unwrap()
    }

    /// A slab of three cubes along X inside a large world box.
    fn slabs() -> Workspace {
        let bodies = vec![
            body("world", BodyType::Rpp, &[-100.0, 100.0, -100.0, 100.0, -100.0, 100.0]),
            body("left", BodyType::Rpp, &[0.0, 10.0, 0.0, 10.0, 0.0, 10.0]),
            body("mid", BodyType::Rpp, &[10.0, 20.0, 0.0, 10.0, 0.0, 10.0]),
            body("right", BodyType::Sph, &[26.0, 5.0, 5.0, 4.0]),
        ];
        let resolve = |name: &str| bodies.iter().position(|b| b.name == name).map(BodyId);
        let exprs = [
            ("left", "+left"),
            ("mid", "+mid"),
            ("right", "+right"),
            ("air", "+world -left -mid -right"),
        ];
        let zones = exprs
            .iter()
            .enumerate()
            .map(|(i, (name, expr))| {
                let mut zone = Zone::new(ZoneId(i + 1), *name, *expr, compile(expr, resolve).unwrap());
                zone.medium = i as u32;
                zone
            })
            .collect();
        Workspace::new(bodies, zones).unwrap()
    }

    #[test]
    fn test_zone_of_and_index() {
        let ws = slabs();
        let at = |x: f64| Ray::new(Point3::new(x, 5.0, 5.0), Vec3::x());
        assert_eq!(ws.zone_of(&at(5.0)), Some(ZoneId(1)));
        assert_eq!(ws.zone_index(&at(15.0)), Some(1));
        assert_eq!(ws.zone_of(&at(25.0)), Some(ZoneId(3)));
        assert_eq!(ws.zone_of(&at(-5.0)), Some(ZoneId(4)));
        assert_eq!(ws.zone_of(&at(500.0)), None);
        assert_eq!(ws.medium_of(ZoneId(3)), Some(2));
    }

    #[test]
    fn test_boundary_on_shared_face() {
        let ws = slabs();
        // On the face x = 10 shared by left and mid.
        let forward = Ray::new(Point3::new(10.0, 5.0, 5.0), Vec3::x());
        let backward = Ray::new(Point3::new(10.0, 5.0, 5.0), -Vec3::x());
        assert_eq!(ws.zone_of(&forward), Some(ZoneId(2)));
        assert_eq!(ws.zone_of(&backward), Some(ZoneId(1)));
    }

    #[test]
    fn test_reentry_after_exit_changes_zone() {
        let ws = slabs();
        let ray = Ray::new(Point3::new(2.0, 5.0, 5.0), Vec3::x());
        let zone = ws.zone_of(&ray).unwrap();
        let d = ws.distance_to_boundary(zone, &ray);
        assert_relative_eq!(d, 8.0, epsilon = 1e-9);
        let next = ws.zone_of(&ray.advanced(d)).unwrap();
        assert_ne!(next, zone);
        assert_eq!(next, ZoneId(2));
    }

    #[test]
    fn test_trace_sums_to_path_length() {
        let ws = slabs();
        let ray = Ray::new(Point3::new(-50.0, 5.0, 5.0), Vec3::x());
        let segments = ws.trace(&ray, 100);
        let zones: Vec<usize> = segments.iter().map(|s| s.zone.0).collect();
        assert_eq!(zones, vec![4, 1, 2, 4, 3, 4]);
        let total: f64 = segments.iter().map(|s| s.length).sum();
        assert_relative_eq!(total, 150.0, epsilon = 1e-9);
        let last = segments.last().unwrap();
        let exit = last.start + Vec3::x() * last.length;
        assert_relative_eq!((exit - ray.origin).norm(), total, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_zone_queries() {
        let ws = slabs();
        let ray = Ray::new(Point3::new(5.0, 5.0, 5.0), Vec3::x());
        assert!(ws.zone(ZoneId(0)).is_none());
        assert!(!ws.is_inside(ZoneId(0), &ray));
        assert_eq!(ws.distance_to_boundary(ZoneId(0), &ray), 0.0);
        assert!(!ws.is_inside(ZoneId(9), &ray));
        assert_eq!(ws.distance_to_boundary(ZoneId(9), &ray), 0.0);
    }

    #[test]
    fn test_new_validates_ids_and_bodies() {
        let bodies = vec![body("a", BodyType::Sph, &[0.0, 0.0, 0.0, 1.0])];
        let tree = compile("+a", |_| Some(BodyId(0))).unwrap();
        let gap = vec![Zone::new(ZoneId(2), "z", "+a", tree.clone())];
        assert_eq!(
            Workspace::new(bodies.clone(), gap).unwrap_err(),
            WorkspaceError::ZoneIdGap { expected: ZoneId(1), found: ZoneId(2) }
        );

        let dangling = compile("+b", |_| Some(BodyId(3))).unwrap();
        let zones = vec![Zone::new(ZoneId(1), "z", "+b", dangling)];
        assert!(matches!(
            Workspace::new(bodies, zones),
            Err(WorkspaceError::MissingBody { body: 3, .. })
        ));
    }

    #[test]
    fn test_display_names_bodies() {
        let text = slabs().to_string();
        assert!(text.contains("geometry: <memory>"));
        assert!(text.contains("RPP left"));
        assert!(text.contains("air medium 3: (((world - left) - mid) - right)"));
    }

    #[test]
    fn test_workspace_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Workspace>();
    }
}
