//! Numeric volume utilities for downstream feature extraction.
//!
//! These are plain array helpers: an integral (summed-area) volume for O(1)
//! box sums, and the grid of voxel coordinates sampled around a fiducial.

use std::ops::{Add, Sub};

use ndarray::{s, Array3, Axis};

use crate::error::AfidsError;

/// Computes the zero-padded integral volume of `volume`.
///
/// The result has shape `(d0 + 1, d1 + 1, d2 + 1)`. Its first plane along
/// every axis is zero and `iv[[i, j, k]]` is the sum of
/// `volume[..i, ..j, ..k]`.
pub fn integral_volume<T>(volume: &Array3<T>) -> Array3<T>
where
    T: Copy + Default + Add<Output = T>,
{
    let (d0, d1, d2) = volume.dim();
    let mut iv = Array3::from_elem((d0 + 1, d1 + 1, d2 + 1), T::default());
    iv.slice_mut(s![1.., 1.., 1..]).assign(volume);

    for axis in 0..3 {
        iv.accumulate_axis_inplace(Axis(axis), |&prev, curr| *curr = *curr + prev);
    }
    iv
}

/// Sums `volume[lo[0]..hi[0], lo[1]..hi[1], lo[2]..hi[2]]` using an integral
/// volume from [`integral_volume`].
///
/// # Errors
/// Returns [`AfidsError::InvalidSampling`] if the box is inverted or extends
/// past the integral volume.
pub fn region_sum<T>(iv: &Array3<T>, lo: [usize; 3], hi: [usize; 3]) -> Result<T, AfidsError>
where
    T: Copy + Add<Output = T> + Sub<Output = T>,
{
    let dims = [iv.dim().0, iv.dim().1, iv.dim().2];
    for axis in 0..3 {
        if lo[axis] > hi[axis] || hi[axis] >= dims[axis] {
            return Err(AfidsError::InvalidSampling {
                message: format!(
                    "box {:?}..{:?} is outside integral volume of shape {:?}",
                    lo, hi, dims
                ),
            });
        }
    }

    let at = |i: usize, j: usize, k: usize| iv[[i, j, k]];
    let [x0, y0, z0] = lo;
    let [x1, y1, z1] = hi;

    // Inclusion-exclusion over the 8 corners. Positive corners are summed
    // first so unsigned volumes never go below zero.
    let positive = at(x1, y1, z1) + at(x0, y0, z1) + at(x0, y1, z0) + at(x1, y0, z0);
    let negative = at(x0, y1, z1) + at(x1, y0, z1) + at(x1, y1, z0) + at(x0, y0, z0);
    Ok(positive - negative)
}

/// Lists the voxel coordinates on a cubic grid around `center`.
///
/// Along each axis the grid runs from `center - radius * step` to
/// `center + radius * step` inclusive, in increments of `step`, giving
/// `(2 * radius + 1)^3` coordinates. Ordering is lexicographic with the
/// first axis varying slowest.
///
/// # Errors
/// Returns [`AfidsError::InvalidSampling`] if `radius` is negative or
/// `step` is not positive.
pub fn sample_region(
    center: [i64; 3],
    radius: i64,
    step: i64,
) -> Result<Vec<[i64; 3]>, AfidsError> {
    if radius < 0 {
        return Err(AfidsError::InvalidSampling {
            message: format!("radius must be non-negative, got {}", radius),
        });
    }
    if step <= 0 {
        return Err(AfidsError::InvalidSampling {
            message: format!("step must be positive, got {}", step),
        });
    }

    let axis = |c: i64| -> Vec<i64> { (-radius..=radius).map(|n| c + n * step).collect() };
    let (xs, ys, zs) = (axis(center[0]), axis(center[1]), axis(center[2]));

    let mut coords = Vec::with_capacity(xs.len() * ys.len() * zs.len());
    for &x in &xs {
        for &y in &ys {
            for &z in &zs {
                coords.push([x, y, z]);
            }
        }
    }
    Ok(coords)
}
