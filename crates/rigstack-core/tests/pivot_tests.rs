use rigstack_core::{
    reconcile_node, ChannelValue, Config, CurveId, NodeOutputs, OpData, ReconcileError, Slot,
    TransformOp,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn translate(v: [f32; 3]) -> TransformOp {
    TransformOp::fixed(OpData::Translation(v))
}

fn translate_animated(v: [f32; 3], curve: u32) -> TransformOp {
    TransformOp::animated(OpData::Translation(v), CurveId(curve))
}

fn rot_z(angle_deg: f32) -> TransformOp {
    TransformOp::fixed(OpData::Rotation {
        axis: [0.0, 0.0, 1.0],
        angle_deg,
    })
}

fn scale(v: [f32; 3]) -> TransformOp {
    TransformOp::fixed(OpData::Scale(v))
}

fn vector_of(out: &NodeOutputs, slot: Slot) -> [f32; 3] {
    match out.get(slot).expect("slot write present").value {
        ChannelValue::Vector(v) => v,
        ref other => panic!("expected vector in {slot:?}, got {other:?}"),
    }
}

/// it should pair a rotate pivot with its inverse around a rotation
#[test]
fn rotate_pivot_pairs_with_inverse() {
    let ops = vec![
        translate([1.0, 0.0, 0.0]),
        translate([5.0, 0.0, 0.0]),
        rot_z(30.0),
        translate([-5.0, 0.0, 0.0]),
    ];
    let out = reconcile_node(&ops, false, &Config::default()).unwrap();

    let pivot = vector_of(&out, Slot::RotatePivot);
    for (got, want) in pivot.iter().zip([5.0, 0.0, 0.0]) {
        approx(*got, want, 1e-6);
    }
    // The inverse is implicit in the pipeline, never exposed or animatable.
    assert!(out.get(Slot::RotatePivotInverse).is_none());
}

/// it should recover a pivot pair even when no rotation sits between them
#[test]
fn rotate_pivot_pair_without_rotation() {
    let ops = vec![
        translate([1.0, 0.0, 0.0]),
        translate([5.0, 0.0, 0.0]),
        translate([-5.0, 0.0, 0.0]),
    ];
    let out = reconcile_node(&ops, false, &Config::default()).unwrap();
    let pivot = vector_of(&out, Slot::RotatePivot);
    approx(pivot[0], 5.0, 1e-6);
    assert!(out.get(Slot::RotatePivotInverse).is_none());
}

/// it should relocate a static lone pivot into the scale pivot-translate
#[test]
fn lone_static_pivot_relocates() {
    let ops = vec![
        translate([1.0, 1.0, 1.0]),
        translate([1.0, 0.0, 0.0]),
        translate([2.0, 0.0, 0.0]),
    ];
    let out = reconcile_node(&ops, false, &Config::default()).unwrap();
    let spt = vector_of(&out, Slot::ScalePivotTranslate);
    approx(spt[0], 2.0, 1e-6);
    assert!(out.get(Slot::RotatePivot).is_none());
}

/// it should fail an animated pivot that never finds its inverse
#[test]
fn animated_unpaired_pivot_fails() {
    let ops = vec![
        translate([1.0, 0.0, 0.0]),
        translate_animated([5.0, 0.0, 0.0], 1),
        rot_z(30.0),
    ];
    let err = reconcile_node(&ops, false, &Config::default()).unwrap_err();
    assert_eq!(err, ReconcileError::UnpairedPivot);
}

/// it should fail a pivot whose inverse misses beyond tolerance
#[test]
fn pivot_negation_respects_tolerance() {
    let base = |inverse_x: f32| {
        vec![
            translate([1.0, 0.0, 0.0]),
            translate_animated([5.0, 0.0, 0.0], 1),
            rot_z(30.0),
            translate([inverse_x, 0.0, 0.0]),
        ]
    };
    // Exact within tolerance: pairs up.
    let out = reconcile_node(&base(-5.000_001), false, &Config::default()).unwrap();
    assert!(out.get(Slot::RotatePivot).is_some());

    // Off by far more than the tolerance: unpaired.
    let err = reconcile_node(&base(-5.001), false, &Config::default()).unwrap_err();
    assert_eq!(err, ReconcileError::UnpairedPivot);
}

/// it should pair a scale pivot scanned around the scale op
#[test]
fn scale_pivot_pairs_around_scale() {
    let ops = vec![
        rot_z(30.0),
        translate_animated([2.0, 0.0, 0.0], 4),
        scale([2.0, 2.0, 2.0]),
        translate([-2.0, 0.0, 0.0]),
    ];
    let out = reconcile_node(&ops, false, &Config::default()).unwrap();
    let pivot = vector_of(&out, Slot::ScalePivot);
    approx(pivot[0], 2.0, 1e-6);
    assert!(out.get(Slot::ScalePivotInverse).is_none());
    assert!(out.get(Slot::Scale).is_some());
}

/// it should recover a scale pivot pair with no scale between them
#[test]
fn scale_pivot_pair_without_scale() {
    let ops = vec![
        rot_z(30.0),
        translate([2.0, 0.0, 0.0]),
        translate([-2.0, 0.0, 0.0]),
    ];
    let out = reconcile_node(&ops, false, &Config::default()).unwrap();
    let pivot = vector_of(&out, Slot::ScalePivot);
    approx(pivot[0], 2.0, 1e-6);
    assert!(out.get(Slot::ScalePivotTranslate).is_none());
    assert!(out.get(Slot::ScalePivotInverse).is_none());
}

/// it should fail a scale pivot left unpaired next to a scale
#[test]
fn unpaired_scale_pivot_fails() {
    let ops = vec![
        rot_z(30.0),
        translate([2.0, 0.0, 0.0]),
        translate([7.0, 0.0, 0.0]),
        scale([2.0, 2.0, 2.0]),
    ];
    let err = reconcile_node(&ops, false, &Config::default()).unwrap_err();
    assert_eq!(err, ReconcileError::UnpairedPivot);
}
