//! Raw codec output, before protocol validation.

use std::path::Path;

use super::coord_system::CoordinateSystem;
use super::position::FiducialPosition;
use super::set::FiducialSet;
use crate::error::AfidsError;
use crate::protocol::ProtocolMap;

/// One fiducial as read from a file: label and description not yet checked.
#[derive(Clone, Debug, PartialEq)]
pub struct FiducialRecord {
    pub label: i64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub desc: String,
}

/// Everything a codec extracts from one file.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedFiducials {
    pub format_version: String,
    pub coord_system: CoordinateSystem,
    pub records: Vec<FiducialRecord>,
}

impl ParsedFiducials {
    /// Validates the records against the protocol and builds a set.
    ///
    /// The count is checked first, then each description, so a bad file
    /// reports the most specific problem (which label failed) before the
    /// set-level invariants run.
    ///
    /// # Errors
    /// - [`AfidsError::UnexpectedFiducialCount`] unless there are 32 records.
    /// - [`AfidsError::InvalidLabel`] / [`AfidsError::FiducialDescriptionMismatch`]
    ///   for the first record that does not match the protocol.
    /// - Set construction errors, e.g. [`AfidsError::IncorrectFiducialLabels`].
    pub fn into_fiducial_set(self, path: &Path) -> Result<FiducialSet, AfidsError> {
        let protocol = ProtocolMap::load()?;
        if self.records.len() != protocol.len() {
            return Err(AfidsError::UnexpectedFiducialCount {
                path: path.to_path_buf(),
                expected: protocol.len(),
                found: self.records.len(),
            });
        }

        let positions = self
            .records
            .into_iter()
            .map(|r| FiducialPosition::new(r.label, r.x, r.y, r.z, r.desc))
            .collect::<Result<Vec<_>, _>>()?;

        FiducialSet::new(self.format_version, self.coord_system, positions)
    }
}
