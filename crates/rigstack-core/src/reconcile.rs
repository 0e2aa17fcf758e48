//! Per-node import driver: scan, pivot pass, order inference and emission,
//! with the sampling fallback on any failure.
//!
//! Every error here is recovered locally by switching the single affected
//! node to baking; nothing propagates as a failure of the surrounding
//! import pass. The only observable degradation is the loss of an
//! edit-friendly decomposition for that node.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::baking::{bake_node, BakedNode};
use crate::bucket::{assign_all, BucketState};
use crate::config::Config;
use crate::curves::CurveAdapter;
use crate::math::{axis_angle_to_euler_deg, deg_to_rad, vec3_approx_eq, Vec3};
use crate::ops::{CurveId, OpData, OpKind, TransformOp};
use crate::order::{infer_rotation_order, RotationOrder};
use crate::pivot::reconcile_pivots;
use crate::presence::PresenceTable;
use crate::slots::Slot;

/// Reasons a node's stack cannot be expressed by the fixed pipeline.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ReconcileError {
    /// The op wants a slot that is occupied or lies above the scan depth.
    #[error("no open slot for a {0:?} op at the current pipeline depth")]
    SlotConflict(OpKind),
    /// Matrix/LookAt ops have no fixed slot at all.
    #[error("{0:?} ops have no slot in the fixed pipeline")]
    UnsupportedOp(OpKind),
    /// A pivot translation without a representable inverse.
    #[error("pivot translation has no matching inverse")]
    UnpairedPivot,
}

/// Value emitted for one host channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ChannelValue {
    /// Translation or scale triple.
    Vector(Vec3),
    /// Single-axis rotation angle, degrees.
    Angle(f32),
    /// XYZ Euler degrees (angle-axis decomposition).
    Euler(Vec3),
    /// Shear coefficient (`tan` of the skew angle).
    Shear(f32),
}

impl ChannelValue {
    fn is_identity(&self, slot: Slot, tolerance: f32) -> bool {
        match self {
            ChannelValue::Vector(v) => {
                let identity = if slot == Slot::Scale {
                    [1.0, 1.0, 1.0]
                } else {
                    [0.0, 0.0, 0.0]
                };
                vec3_approx_eq(*v, identity, tolerance)
            }
            ChannelValue::Angle(a) | ChannelValue::Shear(a) => a.abs() <= tolerance,
            ChannelValue::Euler(e) => vec3_approx_eq(*e, [0.0, 0.0, 0.0], tolerance),
        }
    }
}

/// One channel write for the host's setters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotWrite {
    pub slot: Slot,
    pub value: ChannelValue,
    pub animated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<CurveId>,
}

/// Successful reconciliation output for one node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeOutputs {
    /// Channel writes in pipeline (depth) order.
    pub writes: Vec<SlotWrite>,
    /// `None` when an angle-axis rotation fixed the node's orientation.
    pub rotate_order: Option<RotationOrder>,
    pub presence: PresenceTable,
}

impl NodeOutputs {
    pub fn get(&self, slot: Slot) -> Option<&SlotWrite> {
        self.writes.iter().find(|w| w.slot == slot)
    }

    /// Slot-keyed view of the writes.
    pub fn slot_map(&self) -> HashMap<Slot, (ChannelValue, Option<CurveId>)> {
        self.writes
            .iter()
            .map(|w| (w.slot, (w.value.clone(), w.curve)))
            .collect()
    }

    /// Cleanup pass: drop channels that were filled as placeholders and
    /// turned out static with identity-equivalent values.
    pub fn prune_placeholders(&mut self) {
        let presence = &self.presence;
        self.writes
            .retain(|w| !presence.is_prunable(w.slot, w.animated));
    }
}

/// Result of importing one node's transform stack.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum NodeImport {
    Reconciled(NodeOutputs),
    Baked(BakedNode),
}

/// Attempt the exact slot decomposition for one node.
///
/// All scan state is call-scoped; the function is re-entrant and nodes are
/// mutually independent. On `Err` no partial output survives.
pub fn reconcile_node(
    ops: &[TransformOp],
    is_joint: bool,
    cfg: &Config,
) -> Result<NodeOutputs, ReconcileError> {
    let mut state = assign_all(ops, is_joint, cfg.tolerance)?;
    reconcile_pivots(&mut state, cfg.tolerance)?;

    let rotate_order = if state.angle_axis_used() {
        None
    } else {
        Some(infer_rotation_order(state.axis_orders()))
    };
    Ok(emit(&state, rotate_order, cfg.tolerance))
}

/// Full per-node state machine: reconcile, or discard everything and bake.
pub fn import_node(
    ops: &[TransformOp],
    is_joint: bool,
    adapter: &impl CurveAdapter,
    cfg: &Config,
) -> NodeImport {
    match reconcile_node(ops, is_joint, cfg) {
        Ok(outputs) => NodeImport::Reconciled(outputs),
        Err(err) => {
            log::debug!("transform stack does not fit the fixed pipeline, sampling instead: {err}");
            NodeImport::Baked(bake_node(ops, adapter, &cfg.bake))
        }
    }
}

/// Turn the filled slot table into host channel writes.
///
/// The pivot-inverse slots are never emitted: the fixed pipeline applies a
/// pivot's inverse implicitly, so the inverse is not independently
/// exposed or animatable.
fn emit(state: &BucketState, rotate_order: Option<RotationOrder>, tolerance: f32) -> NodeOutputs {
    let mut writes = Vec::new();
    let mut presence = PresenceTable::new();

    for (slot, op) in state.table().iter_filled() {
        let value = match (slot, &op.data) {
            (Slot::RotatePivotInverse | Slot::ScalePivotInverse, _) => continue,
            (Slot::Scale, OpData::Scale(s)) => ChannelValue::Vector(*s),
            (Slot::RotateAngleAxis, OpData::Rotation { axis, angle_deg }) => {
                ChannelValue::Euler(axis_angle_to_euler_deg(*axis, *angle_deg))
            }
            (
                Slot::SkewXY | Slot::SkewXZ | Slot::SkewYZ,
                OpData::Skew { angle_deg, .. },
            ) => ChannelValue::Shear(deg_to_rad(*angle_deg).tan()),
            (_, OpData::Rotation { angle_deg, .. }) => ChannelValue::Angle(*angle_deg),
            (_, OpData::Translation(t)) => ChannelValue::Vector(*t),
            // The assigner only places the op kinds matched above.
            _ => continue,
        };

        presence.mark_present(slot);
        if op.animated || !value.is_identity(slot, tolerance) {
            presence.mark_necessary(slot);
        }
        writes.push(SlotWrite {
            slot,
            value,
            animated: op.animated,
            curve: op.curve,
        });
    }

    NodeOutputs {
        writes,
        rotate_order,
        presence,
    }
}
