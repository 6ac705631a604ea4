//! Loading and saving fiducial sets by file extension.

use std::path::Path;

use tracing::debug;

use super::io_fcsv::{read_fcsv, write_fcsv};
use super::io_markup_json::{read_markup_json, write_markup_json};
use super::set::FiducialSet;
use crate::error::AfidsError;

/// On-disk fiducial formats, selected by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    /// Slicer markups fiducial CSV (`.fcsv`).
    Fcsv,
    /// Slicer markups JSON (`.json`).
    MarkupJson,
}

impl FileFormat {
    /// Picks the format from the path's extension.
    ///
    /// # Errors
    /// Returns [`AfidsError::UnsupportedExtension`] for anything other than
    /// `fcsv` or `json`.
    pub fn from_path(path: &Path) -> Result<Self, AfidsError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("fcsv") => Ok(FileFormat::Fcsv),
            Some("json") => Ok(FileFormat::MarkupJson),
            other => Err(AfidsError::UnsupportedExtension {
                path: path.to_path_buf(),
                extension: other.unwrap_or_default().to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileFormat::Fcsv => "fcsv",
            FileFormat::MarkupJson => "markup-json",
        }
    }
}

/// Loads a validated fiducial set from an `.fcsv` or `.json` file.
///
/// # Errors
/// - [`AfidsError::FileNotFound`] if `path` does not exist.
/// - [`AfidsError::UnsupportedExtension`] for unknown extensions.
/// - Any codec error, then [`AfidsError::UnexpectedFiducialCount`],
///   [`AfidsError::FiducialDescriptionMismatch`] or a set invariant error.
pub fn load(path: &Path) -> Result<FiducialSet, AfidsError> {
    if !path.exists() {
        return Err(AfidsError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = FileFormat::from_path(path)?;
    debug!(path = %path.display(), format = format.name(), "loading fiducials");

    let parsed = match format {
        FileFormat::Fcsv => read_fcsv(path)?,
        FileFormat::MarkupJson => read_markup_json(path)?,
    };

    let set = parsed.into_fiducial_set(path)?;
    debug!(
        path = %path.display(),
        coord_system = %set.coord_system(),
        version = set.format_version(),
        "loaded fiducial set"
    );
    Ok(set)
}

/// Saves a fiducial set, choosing the codec from the extension of `path`.
///
/// # Errors
/// Returns [`AfidsError::UnsupportedExtension`] for unknown extensions, or
/// any codec or I/O error.
pub fn save(set: &FiducialSet, path: &Path) -> Result<(), AfidsError> {
    let format = FileFormat::from_path(path)?;
    debug!(
        path = %path.display(),
        format = format.name(),
        coord_system = %set.coord_system(),
        "saving fiducials"
    );

    match format {
        FileFormat::Fcsv => write_fcsv(path, set),
        FileFormat::MarkupJson => write_markup_json(path, set),
    }
}
