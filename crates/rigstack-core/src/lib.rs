//! rigstack-core (engine-agnostic)
//!
//! Boundary layer between an order-flexible interchange transform stack and
//! a host's fixed, depth-ordered transform pipeline. Per node, the crate
//! either assigns every transform op to a pipeline slot exactly (under
//! strict ordering and pivot-pairing constraints, inferring the rotation
//! order from partial evidence) or hands the untouched op list to the
//! sampling fallback, which bakes the composed transform into per-channel
//! curves. Document parsing, scene traversal and keyframe storage are the
//! host's business; this crate only decides where (or whether) each op
//! belongs.

pub mod baking;
pub mod bucket;
pub mod config;
pub mod curves;
pub mod math;
pub mod ops;
pub mod order;
pub mod pivot;
pub mod presence;
pub mod reconcile;
pub mod slots;

// Re-exports for consumers (host adapters)
pub use baking::{bake_node, export_baked_json, BakeConfig, BakeTarget, BakedChannel, BakedNode};
pub use bucket::{assign_all, BucketState, RotationGroup};
pub use config::{Config, DEFAULT_TOLERANCE};
pub use curves::{CurveAdapter, StaticCurves};
pub use math::Axis;
pub use ops::{CurveId, OpData, OpKind, TransformOp};
pub use order::{infer_rotation_order, RotationOrder};
pub use pivot::reconcile_pivots;
pub use presence::{Presence, PresenceTable};
pub use reconcile::{
    import_node, reconcile_node, ChannelValue, NodeImport, NodeOutputs, ReconcileError, SlotWrite,
};
pub use slots::{Slot, SlotTable, SLOT_COUNT};
