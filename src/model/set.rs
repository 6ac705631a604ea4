//! Complete, ordered sets of fiducials.

use serde::Serialize;
use std::fmt;

use super::coord_system::CoordinateSystem;
use super::position::FiducialPosition;
use crate::error::AfidsError;
use crate::protocol::NUM_FIDUCIALS;

/// Sentinel format version for sources that do not record one.
pub const UNKNOWN_VERSION: &str = "Unknown";

/// A fiducial found at a sorted position where a different label was expected.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelMismatch {
    pub label: u32,
    pub desc: String,
    pub expected_label: u32,
}

impl fmt::Display for LabelMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "label {} ('{}') where {} was expected",
            self.label, self.desc, self.expected_label
        )
    }
}

/// A full set of 32 protocol fiducials with file metadata.
///
/// A `FiducialSet` can only be obtained through a validating constructor, so
/// holding one guarantees exactly one fiducial per label 1..=32 stored in
/// ascending label order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FiducialSet {
    format_version: String,
    coord_system: CoordinateSystem,
    fiducials: Vec<FiducialPosition>,
}

impl FiducialSet {
    /// Validates and builds a set. `fiducials` may be given in any order; the
    /// stored order is ascending by label.
    ///
    /// # Errors
    /// - [`AfidsError::IncorrectFiducialCount`] unless exactly 32 are given.
    /// - [`AfidsError::IncorrectFiducialLabels`] if any label is repeated or
    ///   missing, listing every offending fiducial.
    pub fn new(
        format_version: impl Into<String>,
        coord_system: CoordinateSystem,
        fiducials: Vec<FiducialPosition>,
    ) -> Result<Self, AfidsError> {
        let fiducials = validate_fiducials(fiducials)?;
        Ok(Self {
            format_version: format_version.into(),
            coord_system,
            fiducials,
        })
    }

    /// Builds a set from fiducials that already satisfy the invariants.
    pub(crate) fn from_validated(
        format_version: String,
        coord_system: CoordinateSystem,
        fiducials: Vec<FiducialPosition>,
    ) -> Self {
        debug_assert_eq!(fiducials.len(), NUM_FIDUCIALS);
        Self {
            format_version,
            coord_system,
            fiducials,
        }
    }

    pub fn format_version(&self) -> &str {
        &self.format_version
    }

    #[inline]
    pub fn coord_system(&self) -> CoordinateSystem {
        self.coord_system
    }

    /// Retags the set without touching coordinates.
    ///
    /// Use [`crate::transform::xfm_coord_system`] to actually convert.
    pub fn set_coord_system(&mut self, coord_system: CoordinateSystem) {
        self.coord_system = coord_system;
    }

    /// Fiducials in ascending label order.
    pub fn fiducials(&self) -> &[FiducialPosition] {
        &self.fiducials
    }

    /// Replaces every fiducial, re-checking the set invariants.
    ///
    /// On error the set is left unchanged.
    pub fn replace_fiducials(&mut self, fiducials: Vec<FiducialPosition>) -> Result<(), AfidsError> {
        self.fiducials = validate_fiducials(fiducials)?;
        Ok(())
    }

    /// Returns the fiducial with the given label.
    ///
    /// # Errors
    /// Returns [`AfidsError::InvalidLabel`] if `label` is outside 1..=32.
    pub fn get(&self, label: i64) -> Result<&FiducialPosition, AfidsError> {
        if label < 1 || label as usize > self.fiducials.len() {
            return Err(AfidsError::InvalidLabel { label });
        }
        Ok(&self.fiducials[(label - 1) as usize])
    }

    /// All coordinates as `[x, y, z]` rows in label order.
    pub fn coords(&self) -> Vec<[f64; 3]> {
        self.fiducials.iter().map(FiducialPosition::coords).collect()
    }

    pub fn len(&self) -> usize {
        self.fiducials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fiducials.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FiducialPosition> {
        self.fiducials.iter()
    }
}

impl<'a> IntoIterator for &'a FiducialSet {
    type Item = &'a FiducialPosition;
    type IntoIter = std::slice::Iter<'a, FiducialPosition>;

    fn into_iter(self) -> Self::IntoIter {
        self.fiducials.iter()
    }
}

fn validate_fiducials(
    mut fiducials: Vec<FiducialPosition>,
) -> Result<Vec<FiducialPosition>, AfidsError> {
    if fiducials.len() != NUM_FIDUCIALS {
        return Err(AfidsError::IncorrectFiducialCount {
            expected: NUM_FIDUCIALS,
            found: fiducials.len(),
        });
    }

    // Stable sort keeps duplicates in input order for error reporting
    fiducials.sort_by_key(FiducialPosition::label);

    let mismatches: Vec<LabelMismatch> = fiducials
        .iter()
        .enumerate()
        .filter_map(|(idx, fid)| {
            let expected_label = (idx + 1) as u32;
            (fid.label() != expected_label).then(|| LabelMismatch {
                label: fid.label(),
                desc: fid.desc().to_string(),
                expected_label,
            })
        })
        .collect();

    if !mismatches.is_empty() {
        return Err(AfidsError::IncorrectFiducialLabels { mismatches });
    }

    Ok(fiducials)
}
