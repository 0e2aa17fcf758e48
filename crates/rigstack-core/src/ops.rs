//! Transform-op data model.
//!
//! A node's interchange transform stack arrives as an ordered `&[TransformOp]`
//! owned by the document model; this crate never mutates it. Curve handles
//! are opaque references into the external curve store (see `curves`).

use serde::{Deserialize, Serialize};

use crate::math::{Mat4, Vec3};

/// Opaque handle to an externally-owned animation curve.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CurveId(pub u32);

/// Payload of one primitive transform operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OpData {
    Translation(Vec3),
    Rotation {
        axis: Vec3,
        angle_deg: f32,
    },
    Scale(Vec3),
    Skew {
        rotate_axis: Vec3,
        around_axis: Vec3,
        angle_deg: f32,
    },
    Matrix(Mat4),
    LookAt {
        eye: Vec3,
        target: Vec3,
        up: Vec3,
    },
}

impl OpData {
    #[inline]
    pub fn kind(&self) -> OpKind {
        match self {
            OpData::Translation(_) => OpKind::Translation,
            OpData::Rotation { .. } => OpKind::Rotation,
            OpData::Scale(_) => OpKind::Scale,
            OpData::Skew { .. } => OpKind::Skew,
            OpData::Matrix(_) => OpKind::Matrix,
            OpData::LookAt { .. } => OpKind::LookAt,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    Translation,
    Rotation,
    Scale,
    Skew,
    Matrix,
    LookAt,
}

/// One primitive transform operation in a node's stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformOp {
    pub data: OpData,
    pub animated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<CurveId>,
}

impl TransformOp {
    /// A static (unanimated) op.
    pub fn fixed(data: OpData) -> Self {
        Self {
            data,
            animated: false,
            curve: None,
        }
    }

    /// An animated op driven by a curve.
    pub fn animated(data: OpData, curve: CurveId) -> Self {
        Self {
            data,
            animated: true,
            curve: Some(curve),
        }
    }

    /// Translation payload, if this op is a translation.
    pub fn translation(&self) -> Option<Vec3> {
        match self.data {
            OpData::Translation(t) => Some(t),
            _ => None,
        }
    }
}
