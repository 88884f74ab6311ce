//! Error types for body construction.

use thiserror::Error;

/// Errors raised while validating body parameters or building surfaces.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BodyError {
    /// Wrong number of numeric parameters for the body type.
    #[error("{keyword} expects {expected} parameters, got {found}")]
    ArgCount {
        /// Body keyword.
        keyword: &'static str,
        /// Accepted parameter counts, human readable.
        expected: &'static str,
        /// Number of parameters given.
        found: usize,
    },

    /// Parameters describe an empty or degenerate solid.
    #[error("degenerate {keyword}: {message}")]
    Degenerate {
        /// Body keyword.
        keyword: &'static str,
        /// What is wrong.
        message: String,
    },

    /// A face descriptor of an ARB body is malformed.
    #[error("invalid ARB face descriptor {0}")]
    FaceDescriptor(f64),

    /// A voxel body was given without the extent from its CT header.
    #[error("VOX body needs a voxel header")]
    MissingVoxelHeader,

    /// Recognised body type that the kernel refuses to build.
    #[error("{0} bodies are not supported")]
    Unsupported(&'static str),
}

impl BodyError {
    /// Create a degenerate-geometry error.
    pub fn degenerate(keyword: &'static str, message: impl Into<String>) -> Self {
        Self::Degenerate {
            keyword,
            message: message.into(),
        }
    }
}
