//! Error types for geometry file loading.

use std::path::PathBuf;

use gemca_body::BodyError;
use gemca_csg::CsgError;
use gemca_zone::WorkspaceError;
use thiserror::Error;

/// Errors that can occur while loading a geometry file.
///
/// Everything found in the text carries its 1-based line number.
#[derive(Error, Debug)]
pub enum GeoError {
    /// The geometry file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed field or misplaced line.
    #[error("line {line}: {message} ('{token}')")]
    Syntax {
        /// Line number (1-indexed).
        line: usize,
        /// Offending token or line.
        token: String,
        /// Error message.
        message: String,
    },

    /// A line in the body block starts with an unknown keyword.
    #[error("line {line}: unknown body keyword '{keyword}'")]
    UnknownKeyword {
        /// Line number (1-indexed).
        line: usize,
        /// The keyword.
        keyword: String,
    },

    /// Two bodies share a name.
    #[error("line {line}: duplicate body name '{name}', first defined on line {first}")]
    DuplicateBody {
        /// Line of the second definition.
        line: usize,
        /// Body name.
        name: String,
        /// Line of the first definition.
        first: usize,
    },

    /// Body parameters were rejected.
    #[error("line {line}: body '{name}': {source}")]
    Body {
        /// Line the body starts on.
        line: usize,
        /// Body name.
        name: String,
        /// Why it was rejected.
        #[source]
        source: BodyError,
    },

    /// A zone expression did not compile.
    #[error("line {line}: zone '{zone}': {source} in '{token}'")]
    Zone {
        /// Line the zone starts on.
        line: usize,
        /// Zone name.
        zone: String,
        /// Offending body name, or the whole expression.
        token: String,
        /// Why it did not compile.
        #[source]
        source: CsgError,
    },

    /// A media directive names a zone that does not exist.
    #[error("line {line}: unknown zone '{name}'")]
    UnknownZone {
        /// Line number (1-indexed).
        line: usize,
        /// Zone name or number as written.
        name: String,
    },

    /// A VOX body's header could not be read.
    #[error("line {line}: voxel header {path}: {source}")]
    VoxelHeader {
        /// Line of the header reference.
        line: usize,
        /// Header path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Parsed a different number of items than the pre-scan counted.
    #[error("{what} count mismatch: expected {expected}, found {found}")]
    CountMismatch {
        /// What was counted.
        what: &'static str,
        /// Expected count.
        expected: usize,
        /// Count found.
        found: usize,
    },

    /// A block ran to the end of the file without `END`.
    #[error("{0} block is not terminated by END")]
    MissingEnd(&'static str),

    /// The file defines no bodies or no zones.
    #[error("no {0} defined")]
    Empty(&'static str),

    /// The parsed parts do not form a consistent workspace.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}

impl GeoError {
    /// Create a syntax error.
    pub fn syntax(line: usize, token: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            token: token.into(),
            message: message.into(),
        }
    }

    /// Line number the error refers to, if it refers to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            GeoError::Syntax { line, .. }
            | GeoError::UnknownKeyword { line, .. }
            | GeoError::DuplicateBody { line, .. }
            | GeoError::Body { line, .. }
            | GeoError::Zone { line, .. }
            | GeoError::UnknownZone { line, .. }
            | GeoError::VoxelHeader { line, .. } => Some(*line),
            _ => None,
        }
    }
}
