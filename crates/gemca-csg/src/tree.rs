//! Arena-backed CSG tree.

use std::fmt;

use gemca_body::BodyId;

/// Boolean operator of a composite node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsgOp {
    /// Inside either operand (`|` or `OR`).
    Union,
    /// Inside both operands (`+`).
    Intersection,
    /// Inside the left operand but not the right (`-`).
    Difference,
}

impl CsgOp {
    /// Operator character as written in zone expressions.
    pub fn symbol(self) -> char {
        match self {
            CsgOp::Union => '|',
            CsgOp::Intersection => '+',
            CsgOp::Difference => '-',
        }
    }

    /// Combine the membership of two operands.
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            CsgOp::Union => left || right,
            CsgOp::Intersection => left && right,
            CsgOp::Difference => left && !right,
        }
    }
}

/// Index of a node in a [`CsgTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A tree node: a body reference or an operator over two subtrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// A single body.
    Leaf(BodyId),
    /// `left op right`.
    Composite {
        /// Operator.
        op: CsgOp,
        /// Left operand.
        left: NodeId,
        /// Right operand.
        right: NodeId,
    },
}

/// A compiled zone expression.
///
/// Nodes live in one vector; children always precede their parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsgTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl CsgTree {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: NodeId(0),
        }
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    /// Build a tree from nodes in child-before-parent order; the last node
    /// is the root.
    ///
    /// Returns `None` if the list is empty or a node refers forward.
    pub fn from_nodes(nodes: Vec<Node>) -> Option<Self> {
        if nodes.is_empty() {
            return None;
        }
        let ordered = nodes.iter().enumerate().all(|(i, node)| match node {
            Node::Leaf(_) => true,
            Node::Composite { left, right, .. } => left.0 < i && right.0 < i,
        });
        let root = NodeId(nodes.len() - 1);
        ordered.then_some(Self { nodes, root })
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// All nodes, children before parents.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Bodies referenced by the tree, in node order, with repeats.
    pub fn bodies(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            Node::Leaf(id) => Some(*id),
            Node::Composite { .. } => None,
        })
    }

    /// Fully parenthesised infix form, naming leaves with `name`.
    pub fn render(&self, name: &dyn Fn(BodyId) -> String) -> String {
        let mut out = String::new();
        self.render_node(self.root(), name, &mut out);
        out
    }

    fn render_node(&self, id: NodeId, name: &dyn Fn(BodyId) -> String, out: &mut String) {
        match *self.node(id) {
            Node::Leaf(body) => out.push_str(&name(body)),
            Node::Composite { op, left, right } => {
                out.push('(');
                self.render_node(left, name, out);
                out.push(' ');
                out.push(op.symbol());
                out.push(' ');
                self.render_node(right, name, out);
                out.push(')');
            }
        }
    }
}

impl fmt::Display for CsgTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&|id| format!("#{}", id.0)))
    }
}
