//! Rotation-order inference.
//!
//! Per-axis rotations are bucketed independently, but the host's rotation
//! order is a single node-global setting, so it has to be reconstructed
//! from the partial axis orders each rotation group recorded. Padding with
//! the default Z/Y/X priority makes every candidate total; a genuinely
//! observed non-default order is trusted over a padded default.

use serde::{Deserialize, Serialize};

use crate::math::Axis;

/// The six rotation orders, named by application order (X first in `Xyz`).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RotationOrder {
    #[default]
    Xyz,
    Xzy,
    Yxz,
    Yzx,
    Zxy,
    Zyx,
}

impl RotationOrder {
    pub fn axes(self) -> [Axis; 3] {
        use Axis::{X, Y, Z};
        match self {
            RotationOrder::Xyz => [X, Y, Z],
            RotationOrder::Xzy => [X, Z, Y],
            RotationOrder::Yxz => [Y, X, Z],
            RotationOrder::Yzx => [Y, Z, X],
            RotationOrder::Zxy => [Z, X, Y],
            RotationOrder::Zyx => [Z, Y, X],
        }
    }

    fn from_axes(axes: [Axis; 3]) -> Option<RotationOrder> {
        use Axis::{X, Y, Z};
        match axes {
            [X, Y, Z] => Some(RotationOrder::Xyz),
            [X, Z, Y] => Some(RotationOrder::Xzy),
            [Y, X, Z] => Some(RotationOrder::Yxz),
            [Y, Z, X] => Some(RotationOrder::Yzx),
            [Z, X, Y] => Some(RotationOrder::Zxy),
            [Z, Y, X] => Some(RotationOrder::Zyx),
            _ => None,
        }
    }
}

/// Pad a recorded partial axis order into a total one. Missing axes append
/// in the fixed default priority Z, then Y, then X. Evidence that repeats
/// an axis is malformed and yields no candidate.
fn complete_order(recorded: &[Axis]) -> Option<RotationOrder> {
    let mut axes: Vec<Axis> = Vec::with_capacity(3);
    for axis in recorded {
        if axes.contains(axis) {
            return None;
        }
        axes.push(*axis);
    }
    for axis in [Axis::Z, Axis::Y, Axis::X] {
        if !axes.contains(&axis) {
            axes.push(axis);
        }
    }
    RotationOrder::from_axes([axes[0], axes[1], axes[2]])
}

/// Derive the node's rotation order from the up-to-three per-group axis
/// orders the scan recorded.
pub fn infer_rotation_order(groups: &[Vec<Axis>; 3]) -> RotationOrder {
    let candidates: Vec<RotationOrder> = groups
        .iter()
        .filter(|g| !g.is_empty())
        .filter_map(|g| complete_order(g))
        .collect();

    match candidates.as_slice() {
        [] => RotationOrder::default(),
        [only] => *only,
        several => {
            if several.windows(2).any(|w| w[0] != w[1]) {
                // Ambiguity is expected (padding biases toward Xyz) and is
                // resolved, not failed.
                log::debug!("conflicting rotation-order candidates: {several:?}");
            }
            several
                .iter()
                .copied()
                .find(|o| *o != RotationOrder::Xyz)
                .unwrap_or(RotationOrder::Xyz)
        }
    }
}
