//! World coordinate sign conventions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AfidsError;

/// The sign convention of world-space coordinates.
///
/// RAS and LPS differ by a sign flip on the first two axes. File codecs
/// additionally accept legacy numeric codes, but the mapping of those codes
/// is format-specific and lives with each codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSystem {
    #[serde(rename = "RAS")]
    Ras,
    #[serde(rename = "LPS")]
    Lps,
}

impl CoordinateSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateSystem::Ras => "RAS",
            CoordinateSystem::Lps => "LPS",
        }
    }

    /// The other convention.
    pub fn flipped(&self) -> Self {
        match self {
            CoordinateSystem::Ras => CoordinateSystem::Lps,
            CoordinateSystem::Lps => CoordinateSystem::Ras,
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordinateSystem {
    type Err = AfidsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RAS" => Ok(CoordinateSystem::Ras),
            "LPS" => Ok(CoordinateSystem::Lps),
            other => Err(AfidsError::InvalidCoordinateSystem {
                value: other.to_string(),
            }),
        }
    }
}
