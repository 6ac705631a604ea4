//! Distances between fiducials and aggregates across fiducial sets.

mod report;

pub use report::{Component, DistancePair, FiducialSetDistance, NonCorrespondingFiducials};

use tracing::warn;

use crate::error::AfidsError;
use crate::model::{FiducialPosition, FiducialSet, UNKNOWN_VERSION};

/// Computes `a - b` per axis and the Euclidean distance.
///
/// If `a` and `b` are different landmarks (label or description differ) the
/// result still holds the numeric distance, with
/// [`DistancePair::warning`] set and a warning logged.
pub fn distance(a: &FiducialPosition, b: &FiducialPosition) -> DistancePair {
    let x = a.x() - b.x();
    let y = a.y() - b.y();
    let z = a.z() - b.z();

    let warning = if a.label() != b.label() || a.desc() != b.desc() {
        let w = NonCorrespondingFiducials {
            left_label: a.label(),
            left_desc: a.desc().to_string(),
            right_label: b.label(),
            right_desc: b.desc().to_string(),
        };
        warn!(
            left_label = w.left_label,
            right_label = w.right_label,
            "{}",
            w
        );
        Some(w)
    } else {
        None
    };

    DistancePair {
        label: a.label(),
        desc: a.desc().to_string(),
        x,
        y,
        z,
        euclidean: (x * x + y * y + z * z).sqrt(),
        warning,
    }
}

fn check_coord_systems<'a>(
    sets: impl IntoIterator<Item = &'a FiducialSet>,
) -> Result<(), AfidsError> {
    let mut sets = sets.into_iter();
    let Some(first) = sets.next() else {
        return Ok(());
    };
    for set in sets {
        if set.coord_system() != first.coord_system() {
            return Err(AfidsError::MismatchedCoordinateSystem {
                expected: first.coord_system(),
                found: set.coord_system(),
            });
        }
    }
    Ok(())
}

/// Pairs two sets fiducial by fiducial.
///
/// Both sets are label-ordered, so pairing by index is pairing by label.
///
/// # Errors
/// Returns [`AfidsError::MismatchedCoordinateSystem`] if the sets use
/// different coordinate systems.
pub fn set_distance(
    left: &FiducialSet,
    right: &FiducialSet,
) -> Result<FiducialSetDistance, AfidsError> {
    check_coord_systems([left, right])?;

    let distances = left
        .iter()
        .zip(right.iter())
        .map(|(a, b)| distance(a, b))
        .collect();

    Ok(FiducialSetDistance {
        left: left.clone(),
        right: right.clone(),
        distances,
    })
}

/// Averages each fiducial's coordinates across several sets.
///
/// Labels and descriptions come from the first set. The result's format
/// version is [`UNKNOWN_VERSION`].
///
/// # Errors
/// - [`AfidsError::EmptyInput`] if `sets` is empty.
/// - [`AfidsError::MismatchedCoordinateSystem`] if the sets disagree.
pub fn mean_fiducial_sets(sets: &[FiducialSet]) -> Result<FiducialSet, AfidsError> {
    let first = sets.first().ok_or(AfidsError::EmptyInput {
        what: "fiducial set",
    })?;
    check_coord_systems(sets)?;

    let n = sets.len() as f64;
    let fiducials = first
        .iter()
        .enumerate()
        .map(|(idx, fid)| {
            let mut sum = [0.0; 3];
            for set in sets {
                let c = set.fiducials()[idx].coords();
                sum[0] += c[0];
                sum[1] += c[1];
                sum[2] += c[2];
            }
            fid.with_coords(sum[0] / n, sum[1] / n, sum[2] / n)
        })
        .collect();

    Ok(FiducialSet::from_validated(
        UNKNOWN_VERSION.to_string(),
        first.coord_system(),
        fiducials,
    ))
}

/// Per-fiducial mean of one component across several set distances.
///
/// Every distance set must share one common fiducial set (for example, all
/// subjects compared against the same template).
///
/// # Errors
/// - [`AfidsError::EmptyInput`] if `distance_sets` is empty.
/// - [`AfidsError::NoCommonReferenceSet`] if no set appears in every pair.
pub fn mean_distances(
    distance_sets: &[FiducialSetDistance],
    component: Component,
) -> Result<Vec<f64>, AfidsError> {
    let first = distance_sets.first().ok_or(AfidsError::EmptyInput {
        what: "fiducial set distance",
    })?;

    let has_common = [first.left(), first.right()]
        .into_iter()
        .any(|candidate| distance_sets.iter().all(|ds| ds.references(candidate)));
    if !has_common {
        return Err(AfidsError::NoCommonReferenceSet);
    }

    let n = distance_sets.len() as f64;
    let mut means = vec![0.0; first.distances().len()];
    for ds in distance_sets {
        for (mean, pair) in means.iter_mut().zip(ds.distances()) {
            *mean += pair.component(component);
        }
    }
    for mean in &mut means {
        *mean /= n;
    }

    Ok(means)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CoordinateSystem;
    use crate::protocol::ProtocolMap;

    fn make_set(offset: f64, coord_system: CoordinateSystem) -> FiducialSet {
        let fiducials = ProtocolMap::load()
            .unwrap()
            .entries()
            .iter()
            .map(|e| {
                let l = e.label as f64;
                FiducialPosition::new(e.label as i64, l + offset, l, -l, e.desc.clone()).unwrap()
            })
            .collect();
        FiducialSet::new("4.13", coord_system, fiducials).unwrap()
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let a = FiducialPosition::new(1, 1.5, -2.0, 7.25, "AC").unwrap();
        let d = distance(&a, &a);
        assert_eq!((d.x, d.y, d.z, d.euclidean), (0.0, 0.0, 0.0, 0.0));
        assert!(d.warning.is_none());
    }

    #[test]
    fn test_distance_components() {
        let a = FiducialPosition::new(1, 3.0, 4.0, 12.0, "AC").unwrap();
        let b = FiducialPosition::new(1, 0.0, 0.0, 0.0, "AC").unwrap();
        let d = distance(&a, &b);
        assert_eq!((d.x, d.y, d.z), (3.0, 4.0, 12.0));
        assert_eq!(d.euclidean, 13.0);
    }

    #[test]
    fn test_non_corresponding_still_computes() {
        let a = FiducialPosition::new(1, 1.0, 0.0, 0.0, "AC").unwrap();
        let b = FiducialPosition::new(2, 0.0, 0.0, 0.0, "PC").unwrap();
        let d = distance(&a, &b);
        assert_eq!(d.euclidean, 1.0);
        let w = d.warning.expect("warning expected");
        assert_eq!((w.left_label, w.right_label), (1, 2));
    }

    #[test]
    fn test_desc_only_difference_warns() {
        let a = FiducialPosition::new(3, 0.0, 0.0, 0.0, "ICS").unwrap();
        let b = FiducialPosition::new(3, 0.0, 0.0, 0.0, "Infracollicular sulcus").unwrap();
        assert!(distance(&a, &b).warning.is_some());
    }

    #[test]
    fn test_set_distance() {
        let a = make_set(1.0, CoordinateSystem::Ras);
        let b = make_set(0.0, CoordinateSystem::Ras);
        let sd = set_distance(&a, &b).unwrap();

        assert_eq!(sd.distances().len(), 32);
        assert!(sd.distances().iter().all(|d| d.x == 1.0 && d.euclidean == 1.0));
        assert_eq!(sd.warnings().count(), 0);
        assert_eq!(sd.mean(Component::Distance), 1.0);
        assert!(sd.references(&a) && sd.references(&b));
    }

    #[test]
    fn test_set_distance_mismatched_coords() {
        let a = make_set(0.0, CoordinateSystem::Ras);
        let b = make_set(0.0, CoordinateSystem::Lps);
        assert!(matches!(
            set_distance(&a, &b),
            Err(AfidsError::MismatchedCoordinateSystem { .. })
        ));
    }

    #[test]
    fn test_mean_of_identical_sets_is_the_set() {
        let s = make_set(0.3, CoordinateSystem::Lps);
        let mean = mean_fiducial_sets(&[s.clone(), s.clone()]).unwrap();
        assert_eq!(mean.format_version(), "Unknown");
        assert_eq!(mean.coord_system(), CoordinateSystem::Lps);
        assert_eq!(mean.coords(), s.coords());
    }

    #[test]
    fn test_mean_of_offset_sets() {
        let mean = mean_fiducial_sets(&[
            make_set(0.0, CoordinateSystem::Ras),
            make_set(2.0, CoordinateSystem::Ras),
        ])
        .unwrap();
        assert_eq!(mean.get(1).unwrap().x(), 2.0);
    }

    #[test]
    fn test_mean_sets_errors() {
        assert!(matches!(
            mean_fiducial_sets(&[]),
            Err(AfidsError::EmptyInput { .. })
        ));

        let a = make_set(0.0, CoordinateSystem::Ras);
        let mut b = a.clone();
        b.set_coord_system(CoordinateSystem::Lps);
        assert!(matches!(
            mean_fiducial_sets(&[a, b]),
            Err(AfidsError::MismatchedCoordinateSystem { .. })
        ));
    }

    #[test]
    fn test_mean_distances_against_common_template() {
        let template = make_set(0.0, CoordinateSystem::Ras);
        let sub1 = make_set(1.0, CoordinateSystem::Ras);
        let sub2 = make_set(3.0, CoordinateSystem::Ras);

        let sets = vec![
            set_distance(&sub1, &template).unwrap(),
            set_distance(&template, &sub2).unwrap(),
        ];
        let means = mean_distances(&sets, Component::Distance).unwrap();
        assert_eq!(means.len(), 32);
        assert!(means.iter().all(|m| *m == 2.0));

        // Signed x differences cancel: +1 and -3
        let x_means = mean_distances(&sets, Component::X).unwrap();
        assert!(x_means.iter().all(|m| *m == -1.0));
    }

    #[test]
    fn test_mean_distances_without_common_set() {
        let s1 = make_set(0.0, CoordinateSystem::Ras);
        let s2 = make_set(1.0, CoordinateSystem::Ras);

        let short = vec![
            set_distance(&s1, &s1).unwrap(),
            set_distance(&s2, &s2).unwrap(),
        ];
        assert!(matches!(
            mean_distances(&short, Component::Distance),
            Err(AfidsError::NoCommonReferenceSet)
        ));

        let long = vec![
            set_distance(&s1, &s1).unwrap(),
            set_distance(&s1, &s2).unwrap(),
            set_distance(&s2, &s2).unwrap(),
        ];
        assert!(matches!(
            mean_distances(&long, Component::Distance),
            Err(AfidsError::NoCommonReferenceSet)
        ));

        assert!(matches!(
            mean_distances(&[], Component::Distance),
            Err(AfidsError::EmptyInput { .. })
        ));
    }
}
