//! Deterministic per-cell jitter: a pseudo-random translation and a rotation
//! that decorrelate neighboring hex tiles.
//!
//! Both functions are pure; a cell id always yields the same jitter for a given
//! rotation strength. The numeric constants are contract values of the
//! technique, chosen for speed and visual decorrelation rather than statistical
//! rigor, and are reproduced as-is.

use std::f32::consts::PI;

use glam::{vec2, IVec2, Mat2, Vec2};

/// Rows `[[127.1, 311.7], [269.5, 183.3]]` as columns.
const HASH_MAT: Mat2 = Mat2::from_cols(vec2(127.1, 269.5), vec2(311.7, 183.3));

/// Pseudo-random translation in `[0, 1)^2` for a grid cell: a fixed linear
/// transform of the id followed by a high-frequency sine fold per axis.
#[inline(always)]
pub fn cell_hash(id: IVec2) -> Vec2 {
    let r = HASH_MAT * id.as_vec2();
    (vec2(r.x.sin(), r.y.sin()) * 43758.5453).fract_gl()
}

/// Pseudo-random rotation for a grid cell, scaled by `rot_strength`.
///
/// The raw angle `|x*y| + |x+y| + pi` is unbounded, so it is reduced into
/// `(-pi, pi]` before scaling; `rot_strength = 0` therefore yields the identity
/// for every cell.
pub fn cell_rotation(id: IVec2, rot_strength: f32) -> Mat2 {
    let p = id.as_vec2();
    let mut angle = (p.x * p.y).abs() + (p.x + p.y).abs() + PI;

    // remap to +/-pi
    angle %= 2.0 * PI;
    if angle < 0.0 {
        angle += 2.0 * PI;
    }
    if angle > PI {
        angle -= 2.0 * PI;
    }

    Mat2::from_angle(angle * rot_strength)
}
