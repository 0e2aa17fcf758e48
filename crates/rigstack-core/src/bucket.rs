//! Greedy slot assignment for a node's ordered transform ops.
//!
//! Placement is first-fit with a monotonically non-decreasing scan depth and
//! no backtracking: a stack produced by round-tripping the host pipeline
//! arrives already in pipeline order, so a first-fit miss means the node was
//! authored outside the pipeline and gets sampled instead of recovered.

use crate::math::{classify_axis, vec3_is_negation, Axis};
use crate::ops::{OpData, OpKind, TransformOp};
use crate::reconcile::ReconcileError;
use crate::slots::{Slot, SlotTable};

/// Rotation groups in preference order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RotationGroup {
    JointOrient = 0,
    Rotate = 1,
    RotateAxis = 2,
}

/// Ephemeral per-node bucketing state.
#[derive(Clone, Debug)]
pub struct BucketState {
    table: SlotTable,
    /// Axis tags in the order each rotation group consumed them.
    axis_order: [Vec<Axis>; 3],
    is_joint: bool,
    angle_axis_used: bool,
    tolerance: f32,
}

impl BucketState {
    pub fn new(is_joint: bool, tolerance: f32) -> Self {
        Self {
            table: SlotTable::new(),
            axis_order: Default::default(),
            is_joint,
            angle_axis_used: false,
            tolerance,
        }
    }

    pub fn table(&self) -> &SlotTable {
        &self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut SlotTable {
        &mut self.table
    }

    pub fn is_joint(&self) -> bool {
        self.is_joint
    }

    /// True once an angle-axis rotation claimed the node's rotation; such a
    /// node carries no fixed rotation order.
    pub fn angle_axis_used(&self) -> bool {
        self.angle_axis_used
    }

    pub fn axis_order(&self, group: RotationGroup) -> &[Axis] {
        &self.axis_order[group as usize]
    }

    pub(crate) fn axis_orders(&self) -> &[Vec<Axis>; 3] {
        &self.axis_order
    }

    pub(crate) fn move_axis_order(&mut self, from: RotationGroup, to: RotationGroup) {
        self.axis_order[to as usize] = std::mem::take(&mut self.axis_order[from as usize]);
    }

    /// Assign the next op in stack order. On error the caller must discard
    /// the whole state; partial assignments are not meaningful.
    pub fn assign(&mut self, op: &TransformOp) -> Result<(), ReconcileError> {
        match &op.data {
            OpData::Translation(_) => self.assign_translation(op),
            OpData::Rotation { axis, .. } => self.assign_rotation(op, *axis),
            OpData::Scale(_) => self.assign_scale(op),
            OpData::Skew {
                rotate_axis,
                around_axis,
                ..
            } => self.assign_skew(op, *rotate_axis, *around_axis),
            // No fixed slot can hold these; the node must be baked in full.
            OpData::Matrix(_) | OpData::LookAt { .. } => {
                Err(ReconcileError::UnsupportedOp(op.data.kind()))
            }
        }
    }

    fn is_negation_of(&self, slot: Slot, op: &TransformOp) -> bool {
        match (self.table.get(slot).and_then(TransformOp::translation), op.translation()) {
            (Some(a), Some(b)) => vec3_is_negation(a, b, self.tolerance),
            _ => false,
        }
    }

    fn assign_translation(&mut self, op: &TransformOp) -> Result<(), ReconcileError> {
        let depth = self.table.depth();
        if depth < Slot::Translate.depth() {
            self.table.place(Slot::Translate, op.clone());
        } else if depth < Slot::RotatePivotTranslate.depth() && !op.animated {
            self.table.place(Slot::RotatePivotTranslate, op.clone());
        } else if depth < Slot::RotatePivot.depth() {
            self.table.place(Slot::RotatePivot, op.clone());
        } else if depth < Slot::RotatePivotInverse.depth() {
            self.assign_pivot_inverse_region(op)?;
        } else if depth < Slot::ScalePivotTranslate.depth() && !op.animated {
            self.table.place(Slot::ScalePivotTranslate, op.clone());
        } else if depth < Slot::ScalePivot.depth() {
            self.table.place(Slot::ScalePivot, op.clone());
        } else if depth < Slot::ScalePivotInverse.depth() {
            self.assign_scale_pivot_inverse_region(op)?;
        } else {
            // No translation slot left at this depth.
            return Err(ReconcileError::SlotConflict(OpKind::Translation));
        }
        Ok(())
    }

    /// Translation arriving between the rotate pivot and its inverse slot.
    fn assign_pivot_inverse_region(&mut self, op: &TransformOp) -> Result<(), ReconcileError> {
        if self.table.is_filled(Slot::RotatePivot) {
            if self.is_negation_of(Slot::RotatePivot, op) {
                self.table.place(Slot::RotatePivotInverse, op.clone());
                return Ok(());
            }
            // A second, non-inverse translation right after a static rotate
            // pivot starts the scale-pivot pair instead.
            let pivot_static = self
                .table
                .get(Slot::RotatePivot)
                .map(|p| !p.animated)
                .unwrap_or(false);
            if self.table.depth() == Slot::RotatePivot.depth() && pivot_static {
                self.table
                    .relocate(Slot::RotatePivot, Slot::ScalePivotTranslate);
                self.table.place(Slot::ScalePivot, op.clone());
                return Ok(());
            }
            return Err(ReconcileError::UnpairedPivot);
        }
        if self.table.is_filled(Slot::RotatePivotTranslate)
            && self.is_negation_of(Slot::RotatePivotTranslate, op)
        {
            // The pivot went into the pivot-translate slot; rotate the pair.
            self.table
                .relocate(Slot::RotatePivotTranslate, Slot::RotatePivot);
            self.table.place(Slot::RotatePivotInverse, op.clone());
        } else if !op.animated {
            self.table.place(Slot::ScalePivotTranslate, op.clone());
        } else {
            self.table.place(Slot::ScalePivot, op.clone());
        }
        Ok(())
    }

    /// Translation arriving between the scale pivot and its inverse slot.
    fn assign_scale_pivot_inverse_region(
        &mut self,
        op: &TransformOp,
    ) -> Result<(), ReconcileError> {
        if self.table.is_filled(Slot::ScalePivot) {
            if self.is_negation_of(Slot::ScalePivot, op) {
                self.table.place(Slot::ScalePivotInverse, op.clone());
                return Ok(());
            }
            return Err(ReconcileError::UnpairedPivot);
        }
        if self.table.is_filled(Slot::ScalePivotTranslate)
            && self.is_negation_of(Slot::ScalePivotTranslate, op)
        {
            self.table
                .relocate(Slot::ScalePivotTranslate, Slot::ScalePivot);
            self.table.place(Slot::ScalePivotInverse, op.clone());
            return Ok(());
        }
        Err(ReconcileError::UnpairedPivot)
    }

    fn assign_rotation(&mut self, op: &TransformOp, axis_vec: [f32; 3]) -> Result<(), ReconcileError> {
        let Some(axis) = classify_axis(axis_vec, self.tolerance) else {
            // Angle-axis: legal only as the sole, static rotation on the node.
            let sole = !self.angle_axis_used && self.axis_order.iter().all(Vec::is_empty);
            if sole && !op.animated && self.table.depth() < Slot::RotateAngleAxis.depth() {
                self.angle_axis_used = true;
                self.table.place(Slot::RotateAngleAxis, op.clone());
                return Ok(());
            }
            return Err(ReconcileError::SlotConflict(OpKind::Rotation));
        };

        if self.angle_axis_used {
            return Err(ReconcileError::SlotConflict(OpKind::Rotation));
        }
        // An axis already consumed by the joint orientation never falls
        // through to the rotate group.
        if self.axis_order[RotationGroup::JointOrient as usize].contains(&axis) {
            return Err(ReconcileError::SlotConflict(OpKind::Rotation));
        }

        let depth = self.table.depth();
        let jo = Slot::joint_orient(axis);
        let rot = Slot::rotate(axis);
        let rax = Slot::rotate_axis(axis);
        if self.is_joint && depth <= jo.depth() && !self.table.is_filled(jo) {
            self.table.place(jo, op.clone());
            self.axis_order[RotationGroup::JointOrient as usize].push(axis);
        } else if depth <= rot.depth() && !self.table.is_filled(rot) {
            self.table.place(rot, op.clone());
            self.axis_order[RotationGroup::Rotate as usize].push(axis);
        } else if depth <= rax.depth() && !self.table.is_filled(rax) {
            self.table.place(rax, op.clone());
            self.axis_order[RotationGroup::RotateAxis as usize].push(axis);
        } else {
            return Err(ReconcileError::SlotConflict(OpKind::Rotation));
        }
        Ok(())
    }

    fn assign_scale(&mut self, op: &TransformOp) -> Result<(), ReconcileError> {
        // One scale per node.
        if self.table.depth() < Slot::Scale.depth() {
            self.table.place(Slot::Scale, op.clone());
            Ok(())
        } else {
            Err(ReconcileError::SlotConflict(OpKind::Scale))
        }
    }

    fn assign_skew(
        &mut self,
        op: &TransformOp,
        rotate_axis: [f32; 3],
        around_axis: [f32; 3],
    ) -> Result<(), ReconcileError> {
        let slot = match (
            classify_axis(rotate_axis, self.tolerance),
            classify_axis(around_axis, self.tolerance),
        ) {
            (Some(Axis::X), Some(Axis::Y)) => Slot::SkewXY,
            (Some(Axis::X), Some(Axis::Z)) => Slot::SkewXZ,
            (Some(Axis::Y), Some(Axis::Z)) => Slot::SkewYZ,
            _ => return Err(ReconcileError::SlotConflict(OpKind::Skew)),
        };
        if self.table.depth() < slot.depth() {
            self.table.place(slot, op.clone());
            Ok(())
        } else {
            Err(ReconcileError::SlotConflict(OpKind::Skew))
        }
    }
}

/// Run the scan over a whole op list.
pub fn assign_all(
    ops: &[TransformOp],
    is_joint: bool,
    tolerance: f32,
) -> Result<BucketState, ReconcileError> {
    let mut state = BucketState::new(is_joint, tolerance);
    for op in ops {
        state.assign(op)?;
    }
    Ok(state)
}
