//! The host pipeline's fixed, depth-ordered transform slots.
//!
//! The pipeline applies its channels in one hard-wired order; the only
//! freedom an importer has is which optional slots it populates. Depth is
//! the slot's position in that order. The three slots of a rotation group
//! (joint orient / rotate / rotate axis) share one depth band so a node may
//! use any per-group axis ordering while the consumed depth sequence stays
//! non-decreasing.

use serde::{Deserialize, Serialize};

use crate::math::Axis;
use crate::ops::TransformOp;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Translate,
    RotatePivotTranslate,
    RotatePivot,
    JointOrientX,
    JointOrientY,
    JointOrientZ,
    RotateX,
    RotateY,
    RotateZ,
    RotateAngleAxis,
    RotateAxisX,
    RotateAxisY,
    RotateAxisZ,
    RotatePivotInverse,
    ScalePivotTranslate,
    ScalePivot,
    SkewXY,
    SkewXZ,
    SkewYZ,
    Scale,
    ScalePivotInverse,
}

pub const SLOT_COUNT: usize = 21;

impl Slot {
    /// Every slot, in pipeline (depth) order.
    pub const ALL: [Slot; SLOT_COUNT] = [
        Slot::Translate,
        Slot::RotatePivotTranslate,
        Slot::RotatePivot,
        Slot::JointOrientX,
        Slot::JointOrientY,
        Slot::JointOrientZ,
        Slot::RotateX,
        Slot::RotateY,
        Slot::RotateZ,
        Slot::RotateAngleAxis,
        Slot::RotateAxisX,
        Slot::RotateAxisY,
        Slot::RotateAxisZ,
        Slot::RotatePivotInverse,
        Slot::ScalePivotTranslate,
        Slot::ScalePivot,
        Slot::SkewXY,
        Slot::SkewXZ,
        Slot::SkewYZ,
        Slot::Scale,
        Slot::ScalePivotInverse,
    ];

    pub fn index(self) -> usize {
        Slot::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// Pipeline depth. Rotation-group members share a band.
    pub fn depth(self) -> i8 {
        match self {
            Slot::Translate => 0,
            Slot::RotatePivotTranslate => 1,
            Slot::RotatePivot => 2,
            Slot::JointOrientX | Slot::JointOrientY | Slot::JointOrientZ => 3,
            Slot::RotateX | Slot::RotateY | Slot::RotateZ => 4,
            Slot::RotateAngleAxis => 5,
            Slot::RotateAxisX | Slot::RotateAxisY | Slot::RotateAxisZ => 6,
            Slot::RotatePivotInverse => 7,
            Slot::ScalePivotTranslate => 8,
            Slot::ScalePivot => 9,
            Slot::SkewXY => 10,
            Slot::SkewXZ => 11,
            Slot::SkewYZ => 12,
            Slot::Scale => 13,
            Slot::ScalePivotInverse => 14,
        }
    }

    pub fn joint_orient(axis: Axis) -> Slot {
        match axis {
            Axis::X => Slot::JointOrientX,
            Axis::Y => Slot::JointOrientY,
            Axis::Z => Slot::JointOrientZ,
        }
    }

    pub fn rotate(axis: Axis) -> Slot {
        match axis {
            Axis::X => Slot::RotateX,
            Axis::Y => Slot::RotateY,
            Axis::Z => Slot::RotateZ,
        }
    }

    pub fn rotate_axis(axis: Axis) -> Slot {
        match axis {
            Axis::X => Slot::RotateAxisX,
            Axis::Y => Slot::RotateAxisY,
            Axis::Z => Slot::RotateAxisZ,
        }
    }
}

/// Per-node slot assignment plus the current scan depth.
///
/// Created inside one node's reconciliation call and discarded with it;
/// never shared across nodes.
#[derive(Clone, Debug)]
pub struct SlotTable {
    filled: [Option<TransformOp>; SLOT_COUNT],
    depth: i8,
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotTable {
    pub fn new() -> Self {
        Self {
            filled: Default::default(),
            depth: -1,
        }
    }

    /// Deepest slot consumed so far; -1 before any assignment.
    pub fn depth(&self) -> i8 {
        self.depth
    }

    pub fn get(&self, slot: Slot) -> Option<&TransformOp> {
        self.filled[slot.index()].as_ref()
    }

    pub fn is_filled(&self, slot: Slot) -> bool {
        self.filled[slot.index()].is_some()
    }

    /// Place an op, advancing the scan depth to the slot's depth.
    pub(crate) fn place(&mut self, slot: Slot, op: TransformOp) {
        self.filled[slot.index()] = Some(op);
        self.depth = self.depth.max(slot.depth());
    }

    /// Move an already-placed op to another slot without touching the scan
    /// depth (pivot relocation).
    pub(crate) fn relocate(&mut self, from: Slot, to: Slot) {
        self.filled[to.index()] = self.filled[from.index()].take();
    }

    /// True when any slot with depth strictly inside `(lo, hi)` is filled.
    pub fn any_filled_in_depth_range(&self, lo: i8, hi: i8) -> bool {
        Slot::ALL
            .iter()
            .filter(|s| s.depth() > lo && s.depth() < hi)
            .any(|s| self.is_filled(*s))
    }

    /// Filled slots in pipeline order.
    pub fn iter_filled(&self) -> impl Iterator<Item = (Slot, &TransformOp)> {
        Slot::ALL
            .iter()
            .filter_map(move |s| self.get(*s).map(|op| (*s, op)))
    }
}
