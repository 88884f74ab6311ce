//! Error types for workspace assembly and configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::ZoneId;

/// Errors raised when assembling a [`crate::Workspace`] from parts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    /// Zone ids must run 1, 2, 3, ... in order.
    #[error("zone ids must be contiguous from 1: expected {expected}, found {found}")]
    ZoneIdGap {
        /// Id the zone at this position should have.
        expected: ZoneId,
        /// Id it has.
        found: ZoneId,
    },

    /// A zone tree refers to a body that is not in the workspace.
    #[error("zone {zone} refers to body #{body}, but only {count} bodies exist")]
    MissingBody {
        /// Offending zone.
        zone: ZoneId,
        /// Body index referenced.
        body: usize,
        /// Number of bodies.
        count: usize,
    },
}

/// Errors reading an evaluator configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid TOML for [`crate::EvalConfig`].
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
