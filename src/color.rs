//! Color-path sample compositor: three decorrelated fetches of a color texture
//! blended into one texel.

use glam::{vec3, Vec2, Vec3, Vec4};

use crate::{
    grid::{cell_center, triangle_grid},
    hash::{cell_hash, cell_rotation},
    weights::{produce_hex_weights, shape_weights},
    HexTileParams, TextureSource,
};

/// Rec. 601 luma, used as the per-cell color statistic.
pub(crate) const LUMA: Vec3 = vec3(0.299, 0.587, 0.114);

/// Result of a color hex-tiling evaluation.
#[derive(Clone, Copy, Debug)]
pub struct HexColor {
    /// The blended texel.
    pub color: Vec4,
    /// Shaped blend weights remapped onto stable debug channels.
    pub weights: Vec3,
}

/// Samples `source` as a hex-tiled color texture at `st`.
///
/// The coordinate and both of its screen-space derivatives are rotated into
/// each cell's frame before fetching; rotating the derivatives (rather than
/// recomputing them) keeps anisotropic filtering correct under the per-cell
/// rotation.
pub fn hex_tile_color<S: TextureSource + ?Sized>(
    source: &S,
    st: Vec2,
    dstdx: Vec2,
    dstdy: Vec2,
    params: &HexTileParams,
) -> HexColor {
    crate::scope!("hex_tile_color");

    let grid = triangle_grid(st);

    let mut texels = [Vec4::ZERO; 3];
    for (i, id) in grid.ids().into_iter().enumerate() {
        let rot = cell_rotation(id, params.rot_strength);
        let inv = rot.transpose();
        let cen = cell_center(id);
        let st_i = inv * (st - cen) + cen + cell_hash(id);
        texels[i] = source.sample_grad(st_i, inv * dstdx, inv * dstdy);
    }

    let d = vec3(
        texels[0].truncate().dot(LUMA),
        texels[1].truncate().dot(LUMA),
        texels[2].truncate().dot(LUMA),
    );
    let w = shape_weights(
        grid.weights(),
        d,
        params.fall_off_contrast,
        params.exponent,
        params.contrast,
    );

    HexColor {
        color: w.x * texels[0] + w.y * texels[1] + w.z * texels[2],
        weights: produce_hex_weights(w, grid.id1, grid.id3),
    }
}
