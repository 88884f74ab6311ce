//! Access to CT voxel headers for `VOX` bodies.

use std::io;
use std::path::Path;

use gemca_body::VoxelExtent;

/// Supplies the grid extent stored in a CT header file.
///
/// Implemented for closures, so a caller can plug in its own header
/// reader:
///
/// ```
/// use gemca_body::VoxelExtent;
/// use gemca_geo::Loader;
///
/// let loader = Loader::new().voxel_headers(|_path: &std::path::Path| -> std::io::Result<VoxelExtent> {
///     Ok(VoxelExtent {
///         min: [-10.0, -10.0, -5.0].into(),
///         max: [10.0, 10.0, 5.0].into(),
///     })
/// });
/// # let _ = loader;
/// ```
pub trait VoxelHeaderSource: Send + Sync {
    /// Read the extent of the voxel grid described by `header`.
    fn extent(&self, header: &Path) -> io::Result<VoxelExtent>;
}

impl<F> VoxelHeaderSource for F
where
    F: Fn(&Path) -> io::Result<VoxelExtent> + Send + Sync,
{
    fn extent(&self, header: &Path) -> io::Result<VoxelExtent> {
        self(header)
    }
}

/// Header source that rejects every `VOX` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVoxelHeaders;

impl VoxelHeaderSource for NoVoxelHeaders {
    fn extent(&self, _header: &Path) -> io::Result<VoxelExtent> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "no voxel header reader configured",
        ))
    }
}
