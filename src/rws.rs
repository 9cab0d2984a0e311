//! Relative-world-space (RWS) variants for large open worlds.
//!
//! The sampling coordinate arrives split in two: a small, high-precision
//! `relative` part (camera-local, per shaded point) and a large `offset` part
//! that changes at most once per frame. The offset is carried in f64 and is the
//! only operand ever subjected to a large-magnitude `floor`/`fract`; it is
//! wrapped before it reaches f32, so no large value is ever subtracted from
//! another large value. With `offset == 0` the grid partition reduces exactly
//! to the non-RWS one.
//!
//! Usage contract: the host computes `offset` once per frame (world-space
//! camera position scaled by the tile rate); failing to keep it per-frame
//! constant reintroduces the precision loss this module exists to avoid.

use glam::{dvec2, vec3, DMat2, DVec2, IVec2, Mat2, Vec2, Vec4};

use crate::{
    bump::{sample_derivative, HexDeriv},
    color::{HexColor, LUMA},
    grid::{cell_center, partition_skewed, skew, TriangleGrid},
    hash::{cell_hash, cell_rotation},
    weights::{produce_hex_weights, shape_weights},
    HexTileParams, TextureSource,
};

/// Full-precision counterparts of the f32 grid constants, used only on the
/// once-per-frame offset leg.
const TILE_SCALE_F64: f64 = 3.464_101_615_137_754_6;
const GRID_TO_SKEWED_F64: DMat2 = DMat2::from_cols(
    dvec2(1.0, 0.0),
    dvec2(-0.577_350_269_189_625_8, 1.154_700_538_379_251_5),
);

/// RWS partition: same outputs as [`triangle_grid`](crate::grid::triangle_grid)
/// for the logical coordinate `relative + offset`.
///
/// The integer lattice offset is extracted from the offset leg in f64, so cell
/// ids stay exact for offsets far beyond f32 range (up to the i32 id range,
/// roughly `|skewed offset| < 2^31` cells).
pub fn triangle_grid_rws(relative: Vec2, offset: DVec2) -> TriangleGrid {
    let skewed_rel = skew(relative);
    let skewed_offs = GRID_TO_SKEWED_F64 * (offset * TILE_SCALE_F64);

    // Separate out the large 2D integer part.
    let base_offs = skewed_offs.floor();
    let combined = skewed_rel + (skewed_offs - base_offs).as_vec2();

    let base = combined.floor();
    let grid = partition_skewed(combined - base, base.as_ivec2());

    let offs = base_offs.as_ivec2();
    TriangleGrid {
        id1: grid.id1 + offs,
        id2: grid.id2 + offs,
        id3: grid.id3 + offs,
        ..grid
    }
}

/// Per-cell sampling coordinate with the relative and offset legs kept apart
/// through the rotation. The offset-derived term is wrapped by `fract` before
/// it can appear un-wrapped in the final f32 coordinate.
fn rws_cell_coord(relative: Vec2, offset: DVec2, id: IVec2, inv: Mat2) -> Vec2 {
    let cen = cell_center(id).as_dvec2();
    let inv64 = DMat2::from_cols(inv.x_axis.as_dvec2(), inv.y_axis.as_dvec2());
    let wrapped = (inv64 * (offset - cen) + cen).fract_gl().as_vec2();

    inv * relative + wrapped + cell_hash(id)
}

/// RWS variant of [`hex_tile_color`](crate::color::hex_tile_color).
pub fn hex_tile_color_rws<S: TextureSource + ?Sized>(
    source: &S,
    relative: Vec2,
    offset: DVec2,
    dstdx: Vec2,
    dstdy: Vec2,
    params: &HexTileParams,
) -> HexColor {
    crate::scope!("hex_tile_color_rws");

    let grid = triangle_grid_rws(relative, offset);

    let mut texels = [Vec4::ZERO; 3];
    for (i, id) in grid.ids().into_iter().enumerate() {
        let rot = cell_rotation(id, params.rot_strength);
        let inv = rot.transpose();
        let st_i = rws_cell_coord(relative, offset, id, inv);
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

/// RWS variant of [`hex_tile_bump`](crate::bump::hex_tile_bump).
pub fn hex_tile_bump_rws<S: TextureSource + ?Sized>(
    source: &S,
    relative: Vec2,
    offset: DVec2,
    dstdx: Vec2,
    dstdy: Vec2,
    params: &HexTileParams,
) -> HexDeriv {
    crate::scope!("hex_tile_bump_rws");

    let grid = triangle_grid_rws(relative, offset);

    let mut derivs = [Vec2::ZERO; 3];
    for (i, id) in grid.ids().into_iter().enumerate() {
        let rot = cell_rotation(id, params.rot_strength);
        let inv = rot.transpose();
        let st_i = rws_cell_coord(relative, offset, id, inv);
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
