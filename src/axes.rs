//! Axis planning: collapse an N-dimensional transform request into the
//! `(nx, ny, nz, nbatch)` layout accepted by VkFFT.
//!
//! Untransformed neighbouring axes are merged into a single batch-like axis,
//! which is how arrays of rank > 3 can still be handed to an engine that only
//! knows three transform axes and one batch dimension. Examples:
//!
//! - any 3D array with `ndim` 1, 2 or 3, or any set of axes
//! - an n-D array with `ndim` 1, 2 or 3: dimensions above `ndim` collapse into the batch
//! - `shape = (4, 5, 6, 7)`, `axes = (2, 3)`: axes 0 and 1 collapse into one axis of 20
//!
//! A request fails when, after collapsing, a transformed axis would still sit
//! beyond the third position, e.g. `shape = (4, 5, 6, 7)` with `ndim = 4`.
//!
//! no_std + alloc compatible

use alloc::vec;
use alloc::vec::Vec;

use crate::error::PlanError;

/// Number of axes the engine can transform.
pub const MAX_TRANSFORM_AXES: usize = 3;

/// Length of the canonical `(nx, ny, nz, nbatch)` shape.
pub const CANONICAL_RANK: usize = 4;

/// Canonical layout handed to the transform engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisLayout {
    /// `(nx, ny, nz, nbatch)`, fastest axis first, padded with 1.
    pub shape: [usize; CANONICAL_RANK],
    /// `true` when the corresponding x/y/z axis is not transformed.
    pub skip: [bool; MAX_TRANSFORM_AXES],
    /// Number of leading axes up to and including the last transformed one.
    pub ndim: usize,
}

impl AxisLayout {
    /// Product of the extents actually transformed, and how many axes that is.
    ///
    /// The product saturates at `usize::MAX`; layouts from [`plan_axes`]
    /// never reach it.
    pub fn transformed_axes(&self) -> (usize, usize) {
        self.transformed_extents()
            .fold((1usize, 0), |(n, k), extent| (n.saturating_mul(extent), k + 1))
    }

    /// Extents of the transformed x/y/z axes, fastest first.
    pub fn transformed_extents(&self) -> impl Iterator<Item = usize> + '_ {
        self.shape
            .iter()
            .zip(self.skip.iter())
            .take(self.ndim)
            .filter(|(_, skip)| !**skip)
            .map(|(&extent, _)| extent)
    }
}

/// Resolve the transformed axes into non-negative indices of `shape`.
///
/// With neither `axes` nor `ndim`, every axis is transformed. With only
/// `ndim`, the last `ndim` axes are used.
fn resolve_axes(
    rank: usize,
    axes: Option<&[isize]>,
    ndim: Option<usize>,
) -> Result<Vec<usize>, PlanError> {
    let requested: Vec<isize> = match (axes, ndim) {
        (Some(axes), Some(ndim)) if axes.len() != ndim => {
            return Err(PlanError::AxisRankMismatch {
                axes: axes.len(),
                ndim,
            })
        }
        (Some(axes), _) => axes.to_vec(),
        (None, Some(ndim)) if ndim > rank => {
            return Err(PlanError::AxisOutOfRange {
                axis: -(rank as isize) - 1,
                rank,
            })
        }
        (None, Some(ndim)) => (1..=ndim as isize).map(|i| -i).collect(),
        (None, None) => (0..rank as isize).collect(),
    };
    if requested.is_empty() {
        return Err(PlanError::NoTransformAxes);
    }
    requested
        .into_iter()
        .map(|axis| {
            let idx = if axis < 0 { axis + rank as isize } else { axis };
            if idx < 0 || idx as usize >= rank {
                Err(PlanError::AxisOutOfRange { axis, rank })
            } else {
                Ok(idx as usize)
            }
        })
        .collect()
}

/// Compute the canonical layout for `shape` (slowest axis first).
///
/// `axes` holds signed indices into `shape`, negative values counting from
/// the end. `ndim` asks for the last `ndim` axes. When both are given their
/// lengths must agree.
///
/// The returned skip mask keeps one quirk of the reference engine bindings:
/// positions from `ndim` to 2 are reported as *not* skipped. Those positions
/// only ever hold padding or a single collapsed batch-like extent, so the
/// transformed element count seen by [`crate::scale`] is unaffected.
pub fn plan_axes(
    shape: &[usize],
    axes: Option<&[isize]>,
    ndim: Option<usize>,
) -> Result<AxisLayout, PlanError> {
    if shape.is_empty() {
        return Err(PlanError::EmptyShape);
    }
    if let Some(axis) = shape.iter().position(|&n| n == 0) {
        return Err(PlanError::ZeroExtent { axis });
    }
    // The whole array must be addressable, which also bounds every
    // collapsed and transformed extent product below.
    shape
        .iter()
        .try_fold(1usize, |n, &extent| n.checked_mul(extent))
        .ok_or(PlanError::ShapeOverflow)?;
    let rank = shape.len();
    let resolved = resolve_axes(rank, axes, ndim)?;

    // Fastest axis first, as VkFFT expects (nx, ny, nz, ...).
    let mut dims: Vec<usize> = shape.iter().rev().copied().collect();
    let mut skip = vec![true; rank];
    for &axis in &resolved {
        skip[rank - 1 - axis] = false;
    }

    let mut i = 0;
    while i + 1 < dims.len() {
        if skip[i] && skip[i + 1] {
            dims[i] = dims[i]
                .checked_mul(dims[i + 1])
                .ok_or(PlanError::ShapeOverflow)?;
            dims.remove(i + 1);
            skip.remove(i + 1);
        } else {
            i += 1;
        }
    }

    // resolve_axes guarantees at least one transformed axis.
    let last_transformed = skip.iter().rposition(|&s| !s).unwrap_or(0);
    if last_transformed >= MAX_TRANSFORM_AXES {
        return Err(PlanError::UnsupportedTransform {
            shape: shape.to_vec(),
            axes: resolved.iter().map(|&a| a as isize).collect(),
            collapsed: dims,
            skip,
        });
    }

    // Collapsing leaves at most one skipped axis after the last transformed one.
    let mut canonical = [1usize; CANONICAL_RANK];
    canonical[..dims.len()].copy_from_slice(&dims);
    let mut mask = [true; MAX_TRANSFORM_AXES];
    for (m, &s) in mask.iter_mut().zip(skip.iter()) {
        *m = s;
    }

    let effective = last_transformed + 1;
    for m in mask.iter_mut().skip(effective) {
        *m = false;
    }

    let layout = AxisLayout {
        shape: canonical,
        skip: mask,
        ndim: effective,
    };
    #[cfg(feature = "verbose-logging")]
    log::debug!(
        "plan_axes: shape={:?} axes={:?} ndim={:?} -> {:?}",
        shape,
        axes,
        ndim,
        layout
    );
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(shape: [usize; 4], skip: [bool; 3], ndim: usize) -> AxisLayout {
        AxisLayout { shape, skip, ndim }
    }

    #[test]
    fn full_transform_of_low_rank_arrays() {
        assert_eq!(
            plan_axes(&[16], None, None).unwrap(),
            layout([16, 1, 1, 1], [false; 3], 1)
        );
        assert_eq!(
            plan_axes(&[8, 16], None, None).unwrap(),
            layout([16, 8, 1, 1], [false; 3], 2)
        );
        assert_eq!(
            plan_axes(&[4, 8, 16], None, None).unwrap(),
            layout([16, 8, 4, 1], [false; 3], 3)
        );
    }

    #[test]
    fn ndim_batches_leading_axes() {
        let l = plan_axes(&[3, 4, 8, 16], None, Some(2)).unwrap();
        assert_eq!(l, layout([16, 8, 12, 1], [false; 3], 2));
        assert_eq!(l.transformed_axes(), (128, 2));
    }

    #[test]
    fn collapses_leading_skipped_axes() {
        // (4, 5) are untransformed and merge into one axis of 20.
        let l = plan_axes(&[4, 5, 6, 7], Some(&[2, 3]), None).unwrap();
        assert_eq!(l, layout([7, 6, 20, 1], [false; 3], 2));
    }

    #[test]
    fn collapses_both_sides_of_transformed_axes() {
        // (8, 9) are the fastest axes and merge into x; (4, 5) form the batch.
        let l = plan_axes(&[4, 5, 6, 7, 8, 9], Some(&[2, 3]), None).unwrap();
        assert_eq!(l, layout([72, 7, 6, 20], [true, false, false], 3));
        assert_eq!(l.transformed_axes(), (42, 2));
    }

    #[test]
    fn skipped_fastest_axis() {
        let l = plan_axes(&[4, 5, 6], Some(&[0]), None).unwrap();
        assert_eq!(l, layout([30, 4, 1, 1], [true, false, false], 2));
        assert_eq!(l.transformed_axes(), (4, 1));
    }

    #[test]
    fn negative_axes_count_from_end() {
        let a = plan_axes(&[4, 5, 6], Some(&[-1, -2]), None).unwrap();
        let b = plan_axes(&[4, 5, 6], None, Some(2)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_many_leading_axes() {
        let err = plan_axes(&[4, 5, 6, 7], None, Some(4)).unwrap_err();
        assert!(matches!(err, PlanError::UnsupportedTransform { .. }));
        let err = plan_axes(&[4, 5, 6, 7], None, None).unwrap_err();
        assert!(matches!(err, PlanError::UnsupportedTransform { .. }));
    }

    #[test]
    fn axis_rank_mismatch() {
        assert_eq!(
            plan_axes(&[4, 5, 6], Some(&[1, 2]), Some(3)),
            Err(PlanError::AxisRankMismatch { axes: 2, ndim: 3 })
        );
    }

    #[test]
    fn invalid_inputs() {
        assert_eq!(plan_axes(&[], None, None), Err(PlanError::EmptyShape));
        assert_eq!(
            plan_axes(&[4, 0], None, None),
            Err(PlanError::ZeroExtent { axis: 1 })
        );
        assert_eq!(
            plan_axes(&[4, 5], Some(&[2]), None),
            Err(PlanError::AxisOutOfRange { axis: 2, rank: 2 })
        );
        assert_eq!(
            plan_axes(&[4, 5], Some(&[-3]), None),
            Err(PlanError::AxisOutOfRange { axis: -3, rank: 2 })
        );
        assert_eq!(
            plan_axes(&[4, 5], None, Some(0)),
            Err(PlanError::NoTransformAxes)
        );
        assert_eq!(
            plan_axes(&[usize::MAX, 2, 3], Some(&[2]), None),
            Err(PlanError::ShapeOverflow)
        );
    }

    #[test]
    fn oversized_transform_is_rejected() {
        let half = 1usize << (usize::BITS / 2 + 1);
        assert_eq!(
            plan_axes(&[half, half], None, None),
            Err(PlanError::ShapeOverflow)
        );
    }

    #[test]
    fn ndim_larger_than_rank() {
        assert_eq!(
            plan_axes(&[4, 5], None, Some(1usize << 40)),
            Err(PlanError::AxisOutOfRange { axis: -3, rank: 2 })
        );
        assert_eq!(
            plan_axes(&[4, 5], None, Some(usize::MAX)),
            Err(PlanError::AxisOutOfRange { axis: -3, rank: 2 })
        );
    }

    #[test]
    fn transformed_product_saturates() {
        let l = layout([usize::MAX, 4, 1, 1], [false; 3], 2);
        assert_eq!(l.transformed_axes(), (usize::MAX, 2));
        assert_eq!(l.transformed_extents().collect::<Vec<_>>(), vec![usize::MAX, 4]);
    }
}
