//! Recursive evaluation of zone trees against rays.

use gemca_body::Body;
use gemca_csg::{CsgTree, Node, NodeId};
use gemca_math::{Ray, Tolerance};
use gemca_surface::min_positive;
use log::{trace, warn};

/// Evaluates CSG trees over a fixed body list.
///
/// Results are returned by value from each node, so one evaluator (or
/// many, on many threads) can query the same trees concurrently.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    bodies: &'a [Body],
    tol: Tolerance,
}

impl<'a> Evaluator<'a> {
    /// Evaluator over `bodies`, the list tree leaves index into.
    pub fn new(bodies: &'a [Body], tol: Tolerance) -> Self {
        Self { bodies, tol }
    }

    /// Whether the ray starts inside the region described by `tree`.
    pub fn contains(&self, tree: &CsgTree, ray: &Ray) -> bool {
        self.contains_node(tree, tree.root(), ray)
    }

    fn contains_node(&self, tree: &CsgTree, id: NodeId, ray: &Ray) -> bool {
        match *tree.node(id) {
            Node::Leaf(body) => self.bodies[body.0].contains(ray, &self.tol),
            Node::Composite { op, left, right } => op.apply(
                self.contains_node(tree, left, ray),
                self.contains_node(tree, right, ray),
            ),
        }
    }

    /// Distance to the nearest surface of any body in `tree`, together with
    /// whether the ray starts inside the tree's region.
    pub fn nearest(&self, tree: &CsgTree, ray: &Ray) -> (f64, bool) {
        self.nearest_node(tree, tree.root(), ray)
    }

    fn nearest_node(&self, tree: &CsgTree, id: NodeId, ray: &Ray) -> (f64, bool) {
        match *tree.node(id) {
            Node::Leaf(body) => {
                let body = &self.bodies[body.0];
                (body.distance(ray, &self.tol), body.contains(ray, &self.tol))
            }
            Node::Composite { op, left, right } => {
                let (dl, il) = self.nearest_node(tree, left, ray);
                let (dr, ir) = self.nearest_node(tree, right, ray);
                (min_positive(dl, dr), op.apply(il, ir))
            }
        }
    }

    /// Distance the ray travels before it leaves the region of `tree`.
    ///
    /// Walks from surface to surface until the membership test fails, taking
    /// steps of at least `min_step`. Returns 0 if the ray starts outside and
    /// infinity if no boundary lies ahead. Stops after `max_steps` steps
    /// with the distance covered so far.
    ///
    /// # Panics
    ///
    /// Panics if a step comes out negative or NaN, which means a body was
    /// set up with inconsistent surfaces.
    pub fn exit_distance(&self, tree: &CsgTree, ray: &Ray, max_steps: usize) -> f64 {
        let mut ray = Ray::new(ray.origin, ray.direction);
        let mut total = 0.0;

        for step in 0..max_steps {
            let (d, inside) = self.nearest(tree, &ray);
            if !inside {
                return total;
            }
            assert!(d >= 0.0, "negative zone-exit step {d} at {:?}", ray.origin);
            if d.is_infinite() {
                return f64::INFINITY;
            }
            let d = d.max(self.tol.min_step);
            trace!("exit step {step}: {d} from {:?}", ray.origin);
            total += d;
            ray = ray.advanced(d);
        }

        warn!(
            "zone exit did not converge after {max_steps} steps, stopping at {total}"
        );
        total
    }
}
