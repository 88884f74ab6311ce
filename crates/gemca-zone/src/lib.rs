#![warn(missing_docs)]

//! Zone evaluation for the gemca geometry kernel.
//!
//! A [`Workspace`] holds the bodies and zones of one geometry and answers
//! the two questions particle transport keeps asking: which zone contains
//! this point, and how far can this ray travel before it leaves its zone.

mod config;
mod error;
mod eval;
mod workspace;
mod zone;

pub use config::EvalConfig;
pub use error::{ConfigError, WorkspaceError};
pub use eval::Evaluator;
pub use workspace::{Segment, Workspace};
pub use zone::{Zone, ZoneId};
