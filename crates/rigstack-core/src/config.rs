//! Crate configuration.

use serde::{Deserialize, Serialize};

use crate::baking::BakeConfig;

/// Absolute tolerance used by every equivalence check in the crate (axis
/// classification, pivot negation, identity detection). Absolute rather
/// than relative: pivot negation compares translations near the origin,
/// where a relative test degenerates.
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Equivalence tolerance; threaded explicitly through the assigner.
    pub tolerance: f32,
    /// Time grid for the sampling fallback, from the document's declared
    /// rate and playback range.
    pub bake: BakeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            bake: BakeConfig::default(),
        }
    }
}
