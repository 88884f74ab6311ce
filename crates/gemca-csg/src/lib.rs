#![warn(missing_docs)]

//! Zone expression compiler for the gemca geometry kernel.
//!
//! Zone expressions combine body names with `+` (intersection), `-`
//! (difference), `|` or `OR` (union) and parentheses:
//!
//! ```
//! use gemca_body::BodyId;
//! use gemca_csg::{compile, CsgOp, Node};
//!
//! let names = ["target", "hole", "shield"];
//! let tree = compile("+target -hole | +shield", |name| {
//!     names.iter().position(|n| *n == name).map(BodyId)
//! })
//! .unwrap();
//! assert!(matches!(tree.node(tree.root()), Node::Composite { op: CsgOp::Union, .. }));
//! assert_eq!(tree.to_string(), "((#0 - #1) | #2)");
//! ```
//!
//! `+` and `-` share one precedence level and group left to right; union
//! binds weakest. A group may not start with `-`.

mod builder;
mod error;
mod token;
mod tree;

pub use builder::build;
pub use error::CsgError;
pub use token::{reformat, reverse, tokenize, Token};
pub use tree::{CsgOp, CsgTree, Node, NodeId};

use gemca_body::BodyId;

/// Compile a zone expression, resolving body names with `resolve`.
pub fn compile<F>(expr: &str, resolve: F) -> Result<CsgTree, CsgError>
where
    F: FnMut(&str) -> Option<BodyId>,
{
    let formatted = reformat(expr)?;
    let tokens = reverse(tokenize(&formatted));
    build(&tokens, resolve)
}
