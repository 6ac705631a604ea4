//! Distance result types.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::AfidsError;
use crate::model::FiducialSet;

/// Non-fatal signal that two compared fiducials are different landmarks.
///
/// Some workflows compare different landmarks on purpose, so this never
/// aborts a computation; it is logged and carried alongside the result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NonCorrespondingFiducials {
    pub left_label: u32,
    pub left_desc: String,
    pub right_label: u32,
    pub right_desc: String,
}

impl fmt::Display for NonCorrespondingFiducials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "comparing non-corresponding fiducials {} ('{}') and {} ('{}')",
            self.left_label, self.left_desc, self.right_label, self.right_desc
        )
    }
}

/// A selectable quantity of a [`DistancePair`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    X,
    Y,
    Z,
    /// Euclidean distance.
    Distance,
}

impl FromStr for Component {
    type Err = AfidsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Component::X),
            "y" => Ok(Component::Y),
            "z" => Ok(Component::Z),
            "distance" => Ok(Component::Distance),
            other => Err(AfidsError::InvalidComponent {
                component: other.to_string(),
            }),
        }
    }
}

/// Per-axis signed differences and Euclidean distance between two fiducials.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistancePair {
    /// Label of the left-hand fiducial.
    pub label: u32,
    /// Description of the left-hand fiducial.
    pub desc: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Always non-negative.
    pub euclidean: f64,
    /// Set when the two fiducials were not the same landmark.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<NonCorrespondingFiducials>,
}

impl DistancePair {
    pub fn component(&self, component: Component) -> f64 {
        match component {
            Component::X => self.x,
            Component::Y => self.y,
            Component::Z => self.z,
            Component::Distance => self.euclidean,
        }
    }

    /// Looks up a component by name: `x`, `y`, `z` or `distance`.
    ///
    /// # Errors
    /// Returns [`AfidsError::InvalidComponent`] for any other name.
    pub fn get(&self, component: &str) -> Result<f64, AfidsError> {
        Ok(self.component(component.parse()?))
    }
}

/// Index-aligned distances between two complete fiducial sets.
#[derive(Clone, Debug, PartialEq)]
pub struct FiducialSetDistance {
    pub(super) left: FiducialSet,
    pub(super) right: FiducialSet,
    pub(super) distances: Vec<DistancePair>,
}

impl FiducialSetDistance {
    pub fn left(&self) -> &FiducialSet {
        &self.left
    }

    pub fn right(&self) -> &FiducialSet {
        &self.right
    }

    /// One pair per label, in ascending label order.
    pub fn distances(&self) -> &[DistancePair] {
        &self.distances
    }

    /// Returns true if `set` is either side of this comparison.
    pub fn references(&self, set: &FiducialSet) -> bool {
        &self.left == set || &self.right == set
    }

    /// One component for every pair, in label order.
    pub fn component(&self, component: Component) -> Vec<f64> {
        self.distances
            .iter()
            .map(|d| d.component(component))
            .collect()
    }

    /// Mean of a component over all pairs.
    pub fn mean(&self, component: Component) -> f64 {
        let values = self.component(component);
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Warnings raised while pairing, if any.
    pub fn warnings(&self) -> impl Iterator<Item = &NonCorrespondingFiducials> {
        self.distances.iter().filter_map(|d| d.warning.as_ref())
    }
}
