//! Small vector/matrix helpers for the reconciliation core.
//!
//! Everything works on plain `[f32; N]` arrays; matrices are column-major
//! `[[f32; 4]; 4]` (`m[col][row]`). This is enough for axis classification,
//! pivot negation checks and the fallback composition/decomposition path;
//! a full linear-algebra crate would be dead weight here.

use serde::{Deserialize, Serialize};

use crate::ops::OpData;

pub type Vec3 = [f32; 3];
pub type Mat4 = [[f32; 4]; 4];

/// One of the three principal axes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => [1.0, 0.0, 0.0],
            Axis::Y => [0.0, 1.0, 0.0],
            Axis::Z => [0.0, 0.0, 1.0],
        }
    }

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

#[inline]
pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

#[inline]
pub fn vec3_approx_eq(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    approx_eq(a[0], b[0], tolerance)
        && approx_eq(a[1], b[1], tolerance)
        && approx_eq(a[2], b[2], tolerance)
}

/// True when `a == -b` within tolerance. Pivot/inverse pairing relies on this.
#[inline]
pub fn vec3_is_negation(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    vec3_approx_eq(a, [-b[0], -b[1], -b[2]], tolerance)
}

/// Classify a rotation axis as one of the principal axes, if it matches
/// within tolerance. Anything else (including negated principal axes) is
/// treated as a free angle-axis rotation.
pub fn classify_axis(v: Vec3, tolerance: f32) -> Option<Axis> {
    for axis in [Axis::X, Axis::Y, Axis::Z] {
        if vec3_approx_eq(v, axis.unit(), tolerance) {
            return Some(axis);
        }
    }
    None
}

#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * (std::f32::consts::PI / 180.0)
}

#[inline]
pub fn rad_to_deg(rad: f32) -> f32 {
    rad * (180.0 / std::f32::consts::PI)
}

#[inline]
fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn length(v: Vec3) -> f32 {
    dot(v, v).sqrt()
}

fn normalize(v: Vec3) -> Vec3 {
    let len = length(v);
    if len <= f32::EPSILON {
        return [0.0, 0.0, 0.0];
    }
    [v[0] / len, v[1] / len, v[2] / len]
}

pub fn mat_identity() -> Mat4 {
    let mut m = [[0.0; 4]; 4];
    for (i, col) in m.iter_mut().enumerate() {
        col[i] = 1.0;
    }
    m
}

pub fn mat_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [[0.0; 4]; 4];
    for (c, col) in out.iter_mut().enumerate() {
        for (r, cell) in col.iter_mut().enumerate() {
            *cell = (0..4).map(|k| a[k][r] * b[c][k]).sum();
        }
    }
    out
}

pub fn translation_matrix(t: Vec3) -> Mat4 {
    let mut m = mat_identity();
    m[3][0] = t[0];
    m[3][1] = t[1];
    m[3][2] = t[2];
    m
}

pub fn scale_matrix(s: Vec3) -> Mat4 {
    let mut m = mat_identity();
    m[0][0] = s[0];
    m[1][1] = s[1];
    m[2][2] = s[2];
    m
}

/// Rodrigues rotation about an arbitrary (normalized) axis.
pub fn axis_angle_matrix(axis: Vec3, angle_rad: f32) -> Mat4 {
    let [ax, ay, az] = normalize(axis);
    let c = angle_rad.cos();
    let s = angle_rad.sin();
    let t = 1.0 - c;

    let mut m = mat_identity();
    // m[col][row]
    m[0][0] = c + t * ax * ax;
    m[1][0] = t * ax * ay - s * az;
    m[2][0] = t * ax * az + s * ay;
    m[0][1] = t * ax * ay + s * az;
    m[1][1] = c + t * ay * ay;
    m[2][1] = t * ay * az - s * ax;
    m[0][2] = t * ax * az - s * ay;
    m[1][2] = t * ay * az + s * ax;
    m[2][2] = c + t * az * az;
    m
}

/// Interchange skew: displaces points along `rotate_axis` proportionally to
/// their coordinate along `around_axis`, by `tan(angle)`.
pub fn skew_matrix(rotate_axis: Vec3, around_axis: Vec3, angle_rad: f32) -> Mat4 {
    let shear = angle_rad.tan();
    let rot = normalize(rotate_axis);
    let around = normalize(around_axis);
    let mut m = mat_identity();
    for (c, col) in m.iter_mut().enumerate().take(3) {
        for (r, cell) in col.iter_mut().enumerate().take(3) {
            *cell += shear * rot[r] * around[c];
        }
    }
    m
}

/// World transform of a viewer at `eye` looking at `target`.
pub fn lookat_matrix(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let fwd = normalize([target[0] - eye[0], target[1] - eye[1], target[2] - eye[2]]);
    let side = normalize(cross(fwd, up));
    let up = cross(side, fwd);

    let mut m = mat_identity();
    for r in 0..3 {
        m[0][r] = side[r];
        m[1][r] = up[r];
        m[2][r] = -fwd[r];
        m[3][r] = eye[r];
    }
    m
}

/// Local matrix for one transform op, evaluated at its (possibly sampled)
/// payload. Ops compose left-to-right in list order: `M = op0 * op1 * ...`.
pub fn op_matrix(data: &OpData) -> Mat4 {
    match data {
        OpData::Translation(t) => translation_matrix(*t),
        OpData::Rotation { axis, angle_deg } => axis_angle_matrix(*axis, deg_to_rad(*angle_deg)),
        OpData::Scale(s) => scale_matrix(*s),
        OpData::Skew {
            rotate_axis,
            around_axis,
            angle_deg,
        } => skew_matrix(*rotate_axis, *around_axis, deg_to_rad(*angle_deg)),
        OpData::Matrix(m) => *m,
        OpData::LookAt { eye, target, up } => lookat_matrix(*eye, *target, *up),
    }
}

/// Affine matrix decomposed to the host's identity channels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decomposed {
    pub translation: Vec3,
    /// XYZ Euler angles, degrees, X applied first.
    pub rotation_deg: Vec3,
    pub scale: Vec3,
    /// Shear coefficients (xy, xz, yz).
    pub shear: Vec3,
}

/// Classic "unmatrix" decomposition: translation, then Gram-Schmidt the
/// upper 3x3 into scale + shear + an orthonormal basis, then extract XYZ
/// Euler angles from the basis.
pub fn decompose(m: &Mat4) -> Decomposed {
    let translation = [m[3][0], m[3][1], m[3][2]];

    let mut c0 = [m[0][0], m[0][1], m[0][2]];
    let mut c1 = [m[1][0], m[1][1], m[1][2]];
    let mut c2 = [m[2][0], m[2][1], m[2][2]];

    let mut sx = length(c0);
    c0 = normalize(c0);
    let mut shear_xy = dot(c0, c1);
    c1 = [
        c1[0] - shear_xy * c0[0],
        c1[1] - shear_xy * c0[1],
        c1[2] - shear_xy * c0[2],
    ];
    let mut sy = length(c1);
    c1 = normalize(c1);
    if sy > f32::EPSILON {
        shear_xy /= sy;
    }
    let mut shear_xz = dot(c0, c2);
    c2 = [
        c2[0] - shear_xz * c0[0],
        c2[1] - shear_xz * c0[1],
        c2[2] - shear_xz * c0[2],
    ];
    let mut shear_yz = dot(c1, c2);
    c2 = [
        c2[0] - shear_yz * c1[0],
        c2[1] - shear_yz * c1[1],
        c2[2] - shear_yz * c1[2],
    ];
    let mut sz = length(c2);
    c2 = normalize(c2);
    if sz > f32::EPSILON {
        shear_xz /= sz;
        shear_yz /= sz;
    }

    // A negative determinant means an odd number of negative scales; fold
    // the flip into the scales so the basis stays a proper rotation.
    if dot(c0, cross(c1, c2)) < 0.0 {
        sx = -sx;
        sy = -sy;
        sz = -sz;
        for v in [&mut c0, &mut c1, &mut c2] {
            v[0] = -v[0];
            v[1] = -v[1];
            v[2] = -v[2];
        }
    }

    Decomposed {
        translation,
        rotation_deg: euler_xyz_deg(c0, c1, c2),
        scale: [sx, sy, sz],
        shear: [shear_xy, shear_xz, shear_yz],
    }
}

/// Euler angles (degrees) for an orthonormal basis, XYZ application order
/// (`R = Rz * Ry * Rx` on column vectors).
fn euler_xyz_deg(c0: Vec3, c1: Vec3, c2: Vec3) -> Vec3 {
    let sin_y = -c0[2];
    let y = sin_y.clamp(-1.0, 1.0).asin();
    let (x, z) = if sin_y.abs() < 1.0 - 1e-6 {
        (c1[2].atan2(c2[2]), c0[1].atan2(c0[0]))
    } else {
        // Gimbal lock: fold everything into X.
        ((-c2[1]).atan2(c1[1]), 0.0)
    };
    [rad_to_deg(x), rad_to_deg(y), rad_to_deg(z)]
}

/// Euler decomposition of a single axis-angle rotation (degrees in,
/// degrees out). Used when emitting the angle-axis slot.
pub fn axis_angle_to_euler_deg(axis: Vec3, angle_deg: f32) -> Vec3 {
    let m = axis_angle_matrix(axis, deg_to_rad(angle_deg));
    decompose(&m).rotation_deg
}
