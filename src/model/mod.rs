//! The fiducial data model and its file formats.
//!
//! Every fiducial that reaches a [`FiducialSet`] has been checked against
//! the [protocol](crate::protocol): labels are 1..=32 and descriptions match
//! the protocol description or acronym. Sets are always complete and stored
//! in ascending label order, so positional pairing between two sets is the
//! same as pairing by label.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use afids::model::{load, CoordinateSystem};
//! use afids::transform::xfm_coord_system;
//!
//! let set = load(Path::new("sub-01_afids.fcsv"))?;
//! let ras = xfm_coord_system(&set, CoordinateSystem::Ras);
//! println!("AC at {:?}", ras.get(1)?.coords());
//! # Ok::<(), afids::AfidsError>(())
//! ```

mod coord_system;
pub mod io;
pub mod io_fcsv;
pub mod io_markup_json;
mod parsed;
mod position;
mod set;

// Re-export core types for convenient access
pub use coord_system::CoordinateSystem;
pub use io::{load, save, FileFormat};
pub use parsed::{FiducialRecord, ParsedFiducials};
pub use position::{FiducialPosition, FiducialVoxel};
pub use set::{FiducialSet, LabelMismatch, UNKNOWN_VERSION};
