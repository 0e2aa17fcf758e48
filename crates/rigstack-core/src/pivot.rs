//! Pivot pairing post-pass.
//!
//! After a successful scan a pivot may still sit without its inverse: the
//! stack ended before the inverse showed up, or the pivot landed in the
//! pivot-translate slot because no rotation followed it. Exactly two
//! repairs exist per pivot kind; anything else leaves a pivot that the
//! fixed pipeline cannot apply transparently, which forces sampling.

use crate::bucket::{BucketState, RotationGroup};
use crate::math::{vec3_is_negation, Axis};
use crate::ops::TransformOp;
use crate::reconcile::ReconcileError;
use crate::slots::Slot;

fn negation_pair(a: Option<&TransformOp>, b: Option<&TransformOp>, tolerance: f32) -> bool {
    match (
        a.and_then(TransformOp::translation),
        b.and_then(TransformOp::translation),
    ) {
        (Some(a), Some(b)) => vec3_is_negation(a, b, tolerance),
        _ => false,
    }
}

/// Resolve unpaired pivots and normalize the rotation slots.
pub fn reconcile_pivots(state: &mut BucketState, tolerance: f32) -> Result<(), ReconcileError> {
    resolve_rotate_pivot(state, tolerance)?;
    resolve_scale_pivot(state, tolerance)?;
    demote_joint_orient(state);
    Ok(())
}

fn resolve_rotate_pivot(state: &mut BucketState, tolerance: f32) -> Result<(), ReconcileError> {
    let (span_clear, pair_matches, pivot_animated, pivot_translate_used) = {
        let table = state.table();
        if !table.is_filled(Slot::RotatePivot) || table.is_filled(Slot::RotatePivotInverse) {
            return Ok(());
        }
        (
            !table.any_filled_in_depth_range(
                Slot::RotatePivot.depth(),
                Slot::ScalePivotTranslate.depth(),
            ),
            negation_pair(
                table.get(Slot::RotatePivotTranslate),
                table.get(Slot::RotatePivot),
                tolerance,
            ),
            table
                .get(Slot::RotatePivot)
                .map(|p| p.animated)
                .unwrap_or(false),
            table.is_filled(Slot::ScalePivotTranslate),
        )
    };

    // A no-rotation node can carry its pivot in the pivot-translate slot:
    // the translate value is the real pivot and the pivot value its inverse.
    if span_clear && pair_matches {
        let table = state.table_mut();
        table.relocate(Slot::RotatePivot, Slot::RotatePivotInverse);
        table.relocate(Slot::RotatePivotTranslate, Slot::RotatePivot);
        return Ok(());
    }

    // Otherwise a static lone pivot can move wholesale into the scale
    // pivot-translate slot, where no inverse is required.
    if pivot_animated || !span_clear || pivot_translate_used {
        return Err(ReconcileError::UnpairedPivot);
    }
    state
        .table_mut()
        .relocate(Slot::RotatePivot, Slot::ScalePivotTranslate);
    Ok(())
}

fn resolve_scale_pivot(state: &mut BucketState, tolerance: f32) -> Result<(), ReconcileError> {
    let table = state.table();
    if !table.is_filled(Slot::ScalePivot) || table.is_filled(Slot::ScalePivotInverse) {
        return Ok(());
    }

    // Only one shape is representable: no scale, and the pivot-translate
    // slot holds the exact inverse.
    if table.is_filled(Slot::Scale)
        || !negation_pair(
            table.get(Slot::ScalePivotTranslate),
            table.get(Slot::ScalePivot),
            tolerance,
        )
    {
        return Err(ReconcileError::UnpairedPivot);
    }
    let table = state.table_mut();
    table.relocate(Slot::ScalePivot, Slot::ScalePivotInverse);
    table.relocate(Slot::ScalePivotTranslate, Slot::ScalePivot);
    Ok(())
}

/// Joint orientation without any plain rotation moves into the rotate
/// slots, so the animatable channel carries the values.
fn demote_joint_orient(state: &mut BucketState) {
    let table = state.table();
    let has_rotation = table.is_filled(Slot::RotateAngleAxis)
        || [Axis::X, Axis::Y, Axis::Z]
            .iter()
            .any(|a| table.is_filled(Slot::rotate(*a)));
    if has_rotation {
        return;
    }
    for axis in [Axis::X, Axis::Y, Axis::Z] {
        if state.table().is_filled(Slot::joint_orient(axis)) {
            state
                .table_mut()
                .relocate(Slot::joint_orient(axis), Slot::rotate(axis));
        }
    }
    // The recorded axis order follows its rotations into the rotate group.
    state.move_axis_order(RotationGroup::JointOrient, RotationGroup::Rotate);
}
