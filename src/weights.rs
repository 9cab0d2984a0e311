//! Blend-weight shaping: contrast falloff against per-cell sample statistics,
//! exponent sharpening, the optional gain remap, and the stable relabeling of
//! weights onto fixed debug channels.

use glam::{IVec2, Vec3};

/// Converts raw barycentric weights plus per-cell sample statistics into the
/// final blend weights.
///
/// `d` is one scalar per cell: luminance for color data, normalized derivative
/// magnitude for bump data. The shaper never inspects cell identities, so it is
/// shared by both paths. Output weights are non-negative and sum to 1.
pub fn shape_weights(
    w: Vec3,
    d: Vec3,
    fall_off_contrast: f32,
    exponent: f32,
    contrast: f32,
) -> Vec3 {
    let dw = Vec3::ONE.lerp(d, fall_off_contrast);
    let mut shaped = dw * w.powf(exponent);
    shaped /= shaped.element_sum();
    if contrast != 0.5 {
        shaped = gain3(shaped, contrast);
    }
    shaped
}

/// Componentwise gain remap of a weight triple, renormalized to sum 1.
///
/// `r = 0.5` is the identity; `r > 0.5` increases contrast (pushes weights
/// toward 0/1), `r < 0.5` flattens them. The `max(0, ..)` under the power keeps
/// zero components from producing NaN.
pub fn gain3(x: Vec3, r: f32) -> Vec3 {
    let k = (1.0 - r).ln() / 0.5f32.ln();

    let s = Vec3::select(x.cmpge(Vec3::splat(0.5)), Vec3::splat(2.0), Vec3::ZERO);
    let m = 2.0 * (Vec3::ONE - s);

    let res = 0.5 * s + 0.25 * m * (s + x * m).max(Vec3::ZERO).powf(k);
    res / res.element_sum()
}

/// Deterministically assigns the three active weights to three fixed output
/// slots, so a given physical tile family always lands in the same slot across
/// the whole image. Purely a relabeling for debug visualization; it has no
/// effect on the blended output.
pub fn produce_hex_weights(w: Vec3, id1: IVec2, id3: IVec2) -> Vec3 {
    let v1 = (id1.x - id1.y).rem_euclid(3) as usize;
    let vh = if v1 < 2 { v1 + 1 } else { 0 };
    let vl = if v1 > 0 { v1 - 1 } else { 2 };
    let (v2, v3) = if id1.x < id3.x { (vl, vh) } else { (vh, vl) };

    let mut slots = [0.0f32; 3];
    slots[v1] = w.x;
    slots[v2] = w.y;
    slots[v3] = w.z;
    Vec3::from_array(slots)
}
