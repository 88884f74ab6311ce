//! Evaluator configuration.

use std::path::Path;

use gemca_math::Tolerance;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Settings for ray queries against a workspace.
///
/// Every field has a default, so a TOML file only needs the values it
/// changes:
///
/// ```
/// use gemca_zone::EvalConfig;
///
/// let config = EvalConfig::from_toml_str("max_steps = 500\n[tolerance]\nmin_step = 1e-6").unwrap();
/// assert_eq!(config.max_steps, 500);
/// assert_eq!(config.tolerance.min_step, 1e-6);
/// assert_eq!(config.tolerance.surface, 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Surface and step tolerances.
    pub tolerance: Tolerance,
    /// Iteration cap of the zone-exit walk.
    pub max_steps: usize,
}

impl EvalConfig {
    /// Default iteration cap of the zone-exit walk.
    pub const DEFAULT_MAX_STEPS: usize = 100_000;

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::DEFAULT,
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }
}
