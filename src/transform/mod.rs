//! World/voxel transforms and RAS/LPS conversion.

use nalgebra::{Matrix3, Matrix4, Vector3};
use tracing::debug;

use crate::error::AfidsError;
use crate::model::{CoordinateSystem, FiducialPosition, FiducialSet, FiducialVoxel};

/// A 4×4 voxel-to-world affine, as stored in a NIfTI header.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    matrix: Matrix4<f64>,
}

impl Affine {
    pub fn new(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Builds an affine from row-major values.
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self::new(Matrix4::from_fn(|r, c| rows[r][c]))
    }

    pub fn identity() -> Self {
        Self::new(Matrix4::identity())
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// The upper-left 3×3 (rotation, scaling and shear) block.
    pub fn linear(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// The translation column.
    pub fn translation(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }
}

impl From<Matrix4<f64>> for Affine {
    fn from(matrix: Matrix4<f64>) -> Self {
        Self::new(matrix)
    }
}

/// Maps a world-space fiducial to the nearest voxel.
///
/// Computes `round(inv(A[:3,:3]) · (world - A[:3,3]))`, rounding each axis
/// half-to-even.
///
/// # Errors
/// - [`AfidsError::SingularAffine`] if the 3×3 block is not invertible.
/// - [`AfidsError::VoxelOutOfRange`] if the position is not finite or lands
///   outside the `i64` index range.
pub fn world_to_voxel(
    position: &FiducialPosition,
    affine: &Affine,
) -> Result<FiducialVoxel, AfidsError> {
    let inverse = affine
        .linear()
        .try_inverse()
        .ok_or(AfidsError::SingularAffine)?;

    let world = Vector3::new(position.x(), position.y(), position.z());
    let voxel = inverse * (world - affine.translation());

    // `as i64` maps NaN to 0 and saturates, so reject those up front
    if !voxel
        .iter()
        .all(|v| v.is_finite() && v.round_ties_even().abs() < i64::MAX as f64)
    {
        return Err(AfidsError::VoxelOutOfRange {
            label: position.label(),
            voxel: [voxel.x, voxel.y, voxel.z],
        });
    }

    Ok(FiducialVoxel::new(
        position.label(),
        voxel.x.round_ties_even() as i64,
        voxel.y.round_ties_even() as i64,
        voxel.z.round_ties_even() as i64,
        position.desc(),
    ))
}

/// Maps a voxel back to world space: `A[:3,:3] · voxel + A[:3,3]`.
///
/// Sub-voxel precision lost by [`world_to_voxel`] is not recovered.
///
/// # Errors
/// Fails if the voxel's label or description do not match the protocol,
/// since the result is a validated [`FiducialPosition`].
pub fn voxel_to_world(
    voxel: &FiducialVoxel,
    affine: &Affine,
) -> Result<FiducialPosition, AfidsError> {
    let index = Vector3::new(voxel.i as f64, voxel.j as f64, voxel.k as f64);
    let world = affine.linear() * index + affine.translation();

    FiducialPosition::new(
        voxel.label as i64,
        world.x,
        world.y,
        world.z,
        voxel.desc.clone(),
    )
}

/// Converts a set between RAS and LPS by negating x and y.
///
/// The input is not modified. Converting to the system the set is already in
/// returns an unchanged copy.
pub fn xfm_coord_system(set: &FiducialSet, target: CoordinateSystem) -> FiducialSet {
    if set.coord_system() == target {
        debug!(coord_system = %target, "fiducial set already in target coordinate system");
        return set.clone();
    }

    debug!(from = %set.coord_system(), to = %target, "converting fiducial set");
    let fiducials = set
        .iter()
        .map(|f| f.with_coords(-f.x(), -f.y(), f.z()))
        .collect();

    FiducialSet::from_validated(set.format_version().to_string(), target, fiducials)
}
