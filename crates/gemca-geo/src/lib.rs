#![warn(missing_docs)]

//! Geometry file loader for the gemca kernel.
//!
//! A geometry file has three blocks, each closed by `END`:
//!
//! ```text
//! * bodies: keyword, name, parameters (continuation lines allowed)
//! RPP world -100 100 -100 100 -100 100
//! SPH ball  0 0 0 10
//! END
//! * zones: name and expression (continuation lines start with + - | ( ))
//! inside  +ball
//! outside +world -ball
//! END
//! * media: one per zone, or ASSIGNMAT medium zone [last] [stride]
//! 1 0
//! END
//! ```
//!
//! ```
//! let ws = gemca_geo::load_from_str(
//!     "RPP world -100 100 -100 100 -100 100\nSPH ball 0 0 0 10\nEND\n\
//!      inside +ball\noutside +world -ball\nEND\n1 0\nEND\n",
//! ).unwrap();
//! assert_eq!(ws.zones().len(), 2);
//! assert_eq!(ws.zones()[0].medium, 1);
//! ```

mod error;
mod lexer;
mod parser;
mod reader;
mod voxel;

pub use error::GeoError;
pub use lexer::{cards, number, Card};
pub use reader::{load, load_from_str, Loader};
pub use voxel::{NoVoxelHeaders, VoxelHeaderSource};
