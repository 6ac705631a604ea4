//! Single fiducial points in world and voxel space.

use serde::Serialize;

use crate::error::AfidsError;
use crate::protocol::ProtocolMap;

/// A labeled world-space point, validated against the protocol.
///
/// Coordinates are unrestricted; only the label and description are checked.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FiducialPosition {
    label: u32,
    x: f64,
    y: f64,
    z: f64,
    desc: String,
}

impl FiducialPosition {
    /// Creates a position after validating `label` and `desc`.
    ///
    /// # Errors
    /// - [`AfidsError::InvalidLabel`] if `label` is outside 1..=32.
    /// - [`AfidsError::FiducialDescriptionMismatch`] if `desc` is neither the
    ///   protocol description nor the acronym for `label`.
    pub fn new(
        label: i64,
        x: f64,
        y: f64,
        z: f64,
        desc: impl Into<String>,
    ) -> Result<Self, AfidsError> {
        let desc = desc.into();
        let protocol = ProtocolMap::load()?;
        let entry = protocol.lookup(label)?;

        if entry.desc != desc && entry.acronym != desc {
            return Err(AfidsError::FiducialDescriptionMismatch {
                label: entry.label,
                desc,
                expected_desc: entry.desc.clone(),
                expected_acronym: entry.acronym.clone(),
            });
        }

        Ok(Self {
            label: entry.label,
            x,
            y,
            z,
            desc,
        })
    }

    #[inline]
    pub fn label(&self) -> u32 {
        self.label
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// Returns `[x, y, z]`.
    #[inline]
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns a copy moved to new coordinates, keeping label and description.
    pub fn with_coords(&self, x: f64, y: f64, z: f64) -> Self {
        Self {
            label: self.label,
            x,
            y,
            z,
            desc: self.desc.clone(),
        }
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A labeled voxel-space point.
///
/// Voxels are derived data and are not checked against the protocol; indices
/// may be negative or fall outside any particular volume.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FiducialVoxel {
    pub label: u32,
    pub i: i64,
    pub j: i64,
    pub k: i64,
    pub desc: String,
}

impl FiducialVoxel {
    pub fn new(label: u32, i: i64, j: i64, k: i64, desc: impl Into<String>) -> Self {
        Self {
            label,
            i,
            j,
            k,
            desc: desc.into(),
        }
    }

    /// Returns `[i, j, k]`.
    #[inline]
    pub fn indices(&self) -> [i64; 3] {
        [self.i, self.j, self.k]
    }
}
