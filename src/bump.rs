//! Bump-path sample compositor: tangent-space normal fetches are decoded into
//! height derivatives, blended per hex tile, and left in a form that composes
//! with surface-gradient bump mapping.

use glam::{vec2, vec3, Vec2, Vec3};

use crate::{
    grid::{cell_center, triangle_grid},
    hash::{cell_hash, cell_rotation},
    weights::{produce_hex_weights, shape_weights},
    HexTileParams, TextureSource,
};

/// Clamp on the decoded slope. Bounds the derivative to `[-128, 128]` even for
/// near-grazing normals.
const DERIV_SCALE: f32 = 1.0 / 128.0;

/// Converts a tangent-space normal (components in `[-1, 1]`, z expected
/// positive) into a height derivative with respect to the texture axes.
///
/// The denominator is bounded away from zero by construction, so the output is
/// always finite. The vertical component is negated to match a positive-down
/// texture v axis.
pub fn tspace_normal_to_derivative(n: Vec3) -> Vec2 {
    let na = n.abs();
    let z_ma = na.z.max(DERIV_SCALE * na.x.max(na.y));

    -vec2(n.x, -n.y) / z_ma
}

/// Fetches a normal-map texel (stored in `[0, 1]`) with explicit derivatives
/// and decodes it to a height derivative.
#[inline(always)]
pub fn sample_derivative<S: TextureSource + ?Sized>(
    source: &S,
    st: Vec2,
    dstdx: Vec2,
    dstdy: Vec2,
) -> Vec2 {
    let texel = source.sample_grad(st, dstdx, dstdy);
    tspace_normal_to_derivative(2.0 * texel.truncate() - 1.0)
}

/// Result of a bump hex-tiling evaluation.
#[derive(Clone, Copy, Debug)]
pub struct HexDeriv {
    /// The blended height derivative, in texture units.
    pub deriv: Vec2,
    /// Shaped blend weights remapped onto stable debug channels.
    pub weights: Vec3,
}

/// Samples `source` as a hex-tiled normal map at `st`, returning a blended
/// height derivative.
///
/// Each per-cell derivative is rotated back into the unrotated local frame
/// before blending; the per-cell statistic is the sine of the angle between
/// the implied tangent-space normal and the Z axis, `sqrt(D / (1 + D))` with
/// `D` the squared derivative length.
pub fn hex_tile_bump<S: TextureSource + ?Sized>(
    source: &S,
    st: Vec2,
    dstdx: Vec2,
    dstdy: Vec2,
    params: &HexTileParams,
) -> HexDeriv {
    crate::scope!("hex_tile_bump");

    let grid = triangle_grid(st);

    let mut derivs = [Vec2::ZERO; 3];
    for (i, id) in grid.ids().into_iter().enumerate() {
        let rot = cell_rotation(id, params.rot_strength);
        let inv = rot.transpose();
        let cen = cell_center(id);
        let st_i = inv * (st - cen) + cen + cell_hash(id);
        derivs[i] = rot * sample_derivative(source, st_i, inv * dstdx, inv * dstdy);
    }

    let stat = |d: Vec2| {
        let q = d.length_squared();
        (q / (1.0 + q)).sqrt()
    };
    let d = vec3(stat(derivs[0]), stat(derivs[1]), stat(derivs[2]));
    let w = shape_weights(
        grid.weights(),
        d,
        params.fall_off_contrast,
        params.exponent,
        params.contrast,
    );

    HexDeriv {
        deriv: w.x * derivs[0] + w.y * derivs[1] + w.z * derivs[2],
        weights: produce_hex_weights(w, grid.id1, grid.id3),
    }
}

/// Surface gradient of a height derivative expressed through a tangent frame.
#[inline(always)]
pub fn surfgrad_from_tbn(deriv: Vec2, tangent: Vec3, bitangent: Vec3) -> Vec3 {
    deriv.x * tangent + deriv.y * bitangent
}

/// Surface gradient from the gradient of a volume bump function (such as 3D
/// noise): the component along the base normal is removed.
#[inline(always)]
pub fn surfgrad_from_volume_gradient(grad: Vec3, base_normal: Vec3) -> Vec3 {
    grad - base_normal.dot(grad) * base_normal
}

/// Perturbs `base_normal` by an accumulated surface gradient.
#[inline(always)]
pub fn resolve_normal(base_normal: Vec3, surfgrad: Vec3) -> Vec3 {
    (base_normal - surfgrad).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::textures::flat_normal_texture;
    use glam::vec2;

    #[test]
    fn decode_is_bounded_for_grazing_normals() {
        let d = tspace_normal_to_derivative(vec3(1.0, 0.0, 0.0));
        assert!(d.is_finite());
        assert!((d.x.abs() - 128.0).abs() < 1e-3);

        let d = tspace_normal_to_derivative(vec3(0.0, -1.0, 0.0));
        assert!(d.is_finite());
        assert!((d.y.abs() - 128.0).abs() < 1e-3);
    }

    #[test]
    fn decode_of_unperturbed_normal_is_zero() {
        assert_eq!(tspace_normal_to_derivative(Vec3::Z), Vec2::ZERO);
    }

    #[test]
    fn decode_flips_vertical_axis() {
        let d = tspace_normal_to_derivative(vec3(0.2, 0.3, 1.0));
        assert!(d.x < 0.0);
        assert!(d.y > 0.0);
    }

    #[test]
    fn flat_normal_map_blends_to_zero() {
        let tex = flat_normal_texture(8);
        let params = HexTileParams {
            rot_strength: 2.5,
            ..HexTileParams::standard()
        };
        for i in 0..20 {
            let st = vec2(0.37 * i as f32, -0.21 * i as f32);
            let out = hex_tile_bump(&tex, st, vec2(1e-3, 0.0), vec2(0.0, 1e-3), &params);
            assert!(out.deriv.length() < 1e-5, "{} at {}", out.deriv, st);
            assert!((out.weights.element_sum() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn surfgrad_composition_recovers_base_normal() {
        let n = resolve_normal(Vec3::Z, surfgrad_from_tbn(Vec2::ZERO, Vec3::X, Vec3::Y));
        assert_eq!(n, Vec3::Z);

        let g = surfgrad_from_volume_gradient(vec3(0.0, 0.0, 0.4), Vec3::Z);
        assert!(g.length() < 1e-6);
    }
}
