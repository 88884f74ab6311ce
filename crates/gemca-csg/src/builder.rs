//! Stack machine turning a reversed token stream into a [`CsgTree`].

use gemca_body::BodyId;

use crate::token::Token;
use crate::tree::{CsgOp, CsgTree, Node, NodeId};
use crate::CsgError;

/// Operator stack entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Op(CsgOp),
    Group,
}

/// Build a tree from tokens produced by [`crate::token::reverse`].
///
/// Operators and opening parentheses go on an operator stack. A closing
/// parenthesis folds operators into composite nodes until its group opener
/// is reached. Names are resolved through `resolve` and pushed as leaves.
pub fn build<F>(tokens: &[Token], mut resolve: F) -> Result<CsgTree, CsgError>
where
    F: FnMut(&str) -> Option<BodyId>,
{
    let mut tree = CsgTree::with_capacity(tokens.len());
    let mut ops: Vec<Pending> = Vec::new();
    let mut operands: Vec<NodeId> = Vec::new();

    for token in tokens {
        match token {
            Token::Intersect => ops.push(Pending::Op(CsgOp::Intersection)),
            Token::Subtract => ops.push(Pending::Op(CsgOp::Difference)),
            Token::Union => ops.push(Pending::Op(CsgOp::Union)),
            Token::Open => ops.push(Pending::Group),
            Token::Close => loop {
                match ops.pop() {
                    Some(Pending::Op(op)) => fold(&mut tree, &mut operands, op)?,
                    Some(Pending::Group) => break,
                    None => return Err(CsgError::UnbalancedParentheses),
                }
            },
            Token::Name(name) => {
                let body =
                    resolve(name).ok_or_else(|| CsgError::UnknownBody(name.clone()))?;
                operands.push(tree.push(Node::Leaf(body)));
            }
        }
    }

    while let Some(pending) = ops.pop() {
        match pending {
            Pending::Op(op) => fold(&mut tree, &mut operands, op)?,
            Pending::Group => return Err(CsgError::UnbalancedParentheses),
        }
    }

    match operands.as_slice() {
        [] => Err(CsgError::Empty),
        [root] => {
            tree.set_root(*root);
            Ok(tree)
        }
        _ => Err(CsgError::DanglingOperand),
    }
}

/// Pop two operands and push `first op second`.
fn fold(tree: &mut CsgTree, operands: &mut Vec<NodeId>, op: CsgOp) -> Result<(), CsgError> {
    let missing = || CsgError::MissingOperand(op.symbol());
    let left = operands.pop().ok_or_else(missing)?;
    let right = operands.pop().ok_or_else(missing)?;
    operands.push(tree.push(Node::Composite { op, left, right }));
    Ok(())
}
