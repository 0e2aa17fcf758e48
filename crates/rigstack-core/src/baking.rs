//! Sampling fallback: bake a node's composed transform into per-channel
//! curves.
//!
//! When the slot scan or the pivot pass rejects a node, the full untouched
//! op list lands here. Every frame on the document's time grid composes the
//! op matrices (animated ops resampled through the adapter), decomposes the
//! result into the host's identity channels and appends one sample per
//! channel. This path always succeeds; it trades edit-time sparsity and
//! tangent fidelity for guaranteed visual correctness.

use serde::{Deserialize, Serialize};

use crate::curves::{sample_op, CurveAdapter};
use crate::math::{decompose, mat_identity, mat_mul, op_matrix, Decomposed};
use crate::ops::TransformOp;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BakeConfig {
    /// Target frame rate (Hz) for baked samples.
    pub frame_rate: f32,
    /// Start time (seconds) in document space.
    pub start_time: f32,
    /// End time (seconds); `None` bakes a single frame at the start time,
    /// which is all a static node needs.
    pub end_time: Option<f32>,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            start_time: 0.0,
            end_time: None,
        }
    }
}

/// The host's identity-decomposed channels.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum BakeTarget {
    TranslateX,
    TranslateY,
    TranslateZ,
    RotateX,
    RotateY,
    RotateZ,
    ScaleX,
    ScaleY,
    ScaleZ,
    ShearXY,
    ShearXZ,
    ShearYZ,
}

impl BakeTarget {
    pub const ALL: [BakeTarget; 12] = [
        BakeTarget::TranslateX,
        BakeTarget::TranslateY,
        BakeTarget::TranslateZ,
        BakeTarget::RotateX,
        BakeTarget::RotateY,
        BakeTarget::RotateZ,
        BakeTarget::ScaleX,
        BakeTarget::ScaleY,
        BakeTarget::ScaleZ,
        BakeTarget::ShearXY,
        BakeTarget::ShearXZ,
        BakeTarget::ShearYZ,
    ];

    fn pick(self, d: &Decomposed) -> f32 {
        match self {
            BakeTarget::TranslateX => d.translation[0],
            BakeTarget::TranslateY => d.translation[1],
            BakeTarget::TranslateZ => d.translation[2],
            BakeTarget::RotateX => d.rotation_deg[0],
            BakeTarget::RotateY => d.rotation_deg[1],
            BakeTarget::RotateZ => d.rotation_deg[2],
            BakeTarget::ScaleX => d.scale[0],
            BakeTarget::ScaleY => d.scale[1],
            BakeTarget::ScaleZ => d.scale[2],
            BakeTarget::ShearXY => d.shear[0],
            BakeTarget::ShearXZ => d.shear[1],
            BakeTarget::ShearYZ => d.shear[2],
        }
    }
}

/// Sampled values for one host channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BakedChannel {
    pub target: BakeTarget,
    pub times: Vec<f32>,
    pub values: Vec<f32>,
}

/// Fully sampled transform for one node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BakedNode {
    pub frame_rate: f32,
    pub start_time: f32,
    pub end_time: f32,
    pub channels: Vec<BakedChannel>,
}

/// Sample a node's composed transform across the configured time grid.
pub fn bake_node(
    ops: &[TransformOp],
    adapter: &impl CurveAdapter,
    cfg: &BakeConfig,
) -> BakedNode {
    let rate = if cfg.frame_rate.is_finite() && cfg.frame_rate > 0.0 {
        cfg.frame_rate
    } else {
        60.0
    };
    let rate = rate.max(1.0);
    let start = cfg.start_time.max(0.0);
    let mut end = cfg.end_time.unwrap_or(start);
    if !end.is_finite() || end < start {
        end = start;
    }
    let frame_count = ((end - start) * rate).ceil() as usize + 1; // inclusive of end

    let mut channels: Vec<BakedChannel> = BakeTarget::ALL
        .iter()
        .map(|target| BakedChannel {
            target: *target,
            times: Vec::with_capacity(frame_count),
            values: Vec::with_capacity(frame_count),
        })
        .collect();

    for f in 0..frame_count {
        let t = start + (f as f32) / rate;
        let mut m = mat_identity();
        for op in ops {
            m = mat_mul(&m, &op_matrix(&sample_op(adapter, op, t)));
        }
        let d = decompose(&m);
        for channel in channels.iter_mut() {
            channel.times.push(t);
            channel.values.push(channel.target.pick(&d));
        }
    }

    BakedNode {
        frame_rate: rate,
        start_time: start,
        end_time: end,
        channels,
    }
}

/// Export a baked node as `serde_json::Value` (stable schema for hosts).
pub fn export_baked_json(baked: &BakedNode) -> serde_json::Value {
    serde_json::to_value(baked).unwrap_or(serde_json::Value::Null)
}
