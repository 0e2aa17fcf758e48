//! Curve adapter seam.
//!
//! Keyframe storage and evaluation live outside this crate; reconciliation
//! only ever holds `CurveId`s. Hosts implement [`CurveAdapter`] and pass it
//! into the import driver so the fallback baker can resample animated ops.

use crate::ops::{CurveId, OpData, TransformOp};

/// Host capability over the externally-owned curve store.
pub trait CurveAdapter {
    fn is_animated(&self, curve: CurveId) -> bool;

    /// Evaluate the op payload driven by `curve` at `seconds`. Returning
    /// `None` means the curve cannot be evaluated; callers fall back to the
    /// op's static payload.
    fn sample(&self, curve: CurveId, seconds: f32) -> Option<OpData>;
}

/// Adapter for documents without animation: nothing is animated, nothing
/// samples.
#[derive(Copy, Clone, Debug, Default)]
pub struct StaticCurves;

impl CurveAdapter for StaticCurves {
    fn is_animated(&self, _curve: CurveId) -> bool {
        false
    }

    fn sample(&self, _curve: CurveId, _seconds: f32) -> Option<OpData> {
        None
    }
}

/// Evaluate one op at a point in time: animated ops resample through the
/// adapter, everything else reuses the authored payload.
pub fn sample_op(adapter: &impl CurveAdapter, op: &TransformOp, seconds: f32) -> OpData {
    if op.animated {
        if let Some(curve) = op.curve {
            if let Some(data) = adapter.sample(curve, seconds) {
                // A curve must not change the op's type mid-flight.
                if data.kind() == op.data.kind() {
                    return data;
                }
            }
        }
    }
    op.data.clone()
}
