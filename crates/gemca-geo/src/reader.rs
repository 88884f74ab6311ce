//! Entry points for loading geometry files.

use std::fs;
use std::path::Path;

use gemca_zone::{EvalConfig, Workspace};
use log::info;

use crate::lexer::cards;
use crate::parser::Parser;
use crate::{GeoError, NoVoxelHeaders, VoxelHeaderSource};

/// Load a geometry file with default settings.
///
/// `VOX` bodies are rejected; use a [`Loader`] with a header source to
/// accept them.
pub fn load(path: impl AsRef<Path>) -> Result<Workspace, GeoError> {
    Loader::new().load(path)
}

/// Load geometry from a string with default settings.
pub fn load_from_str(text: &str) -> Result<Workspace, GeoError> {
    Loader::new().load_str(text)
}

/// Configurable geometry loader.
pub struct Loader {
    voxel_headers: Box<dyn VoxelHeaderSource>,
    config: EvalConfig,
}

impl Loader {
    /// A loader without voxel header support and with default tolerances.
    pub fn new() -> Self {
        Self {
            voxel_headers: Box::new(NoVoxelHeaders),
            config: EvalConfig::default(),
        }
    }

    /// Read `VOX` header files through `source`.
    pub fn voxel_headers(mut self, source: impl VoxelHeaderSource + 'static) -> Self {
        self.voxel_headers = Box::new(source);
        self
    }

    /// Evaluation settings given to loaded workspaces.
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Load a geometry file. Relative voxel header paths are resolved
    /// against the file's directory.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Workspace, GeoError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GeoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let workspace = self.parse(&text, path.parent())?.with_source(path);
        info!(
            "loaded {}: {} bodies, {} zones",
            path.display(),
            workspace.bodies().len(),
            workspace.zones().len()
        );
        Ok(workspace)
    }

    /// Load geometry text. Relative voxel header paths are used as given.
    pub fn load_str(&self, text: &str) -> Result<Workspace, GeoError> {
        let workspace = self.parse(text, None)?;
        info!(
            "loaded geometry: {} bodies, {} zones",
            workspace.bodies().len(),
            workspace.zones().len()
        );
        Ok(workspace)
    }

    fn parse(&self, text: &str, base_dir: Option<&Path>) -> Result<Workspace, GeoError> {
        let cards = cards(text);
        let workspace = Parser::new(&cards, self.voxel_headers.as_ref(), base_dir).parse()?;
        Ok(workspace.with_config(self.config))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
