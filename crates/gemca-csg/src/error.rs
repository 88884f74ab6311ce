//! Error types for zone expression compilation.

use thiserror::Error;

/// Errors that can occur while compiling a zone expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsgError {
    /// A group starts with `-`: a zone cannot start with an exclusion.
    #[error("leading body cannot be subtracted")]
    LeadingDifference,

    /// Parentheses do not pair up.
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    /// Expression names a body that does not exist.
    #[error("unknown body '{0}'")]
    UnknownBody(String),

    /// An operator lacks one of its operands.
    #[error("operator '{0}' is missing an operand")]
    MissingOperand(char),

    /// Two operands follow each other without an operator.
    #[error("operands without an operator between them")]
    DanglingOperand,

    /// Nothing to compile.
    #[error("empty expression")]
    Empty,
}
