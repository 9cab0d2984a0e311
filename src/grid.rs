//! Triangular-grid partition of a 2D texture coordinate into three overlapping
//! hex-tile cells with barycentric weights.

use glam::{ivec2, vec2, IVec2, Mat2, Vec2, Vec3};

/// Input scale applied before skewing, `2 * sqrt(3)`. One texture repeat spans
/// several lattice cells so every tile sees a full period.
const TILE_SCALE: f32 = 3.464_101_6;

/// Maps the Euclidean grid onto the skewed (triangular) lattice.
/// Columns of `[[1, -1/sqrt(3)], [0, 2/sqrt(3)]]`.
const GRID_TO_SKEWED: Mat2 = Mat2::from_cols(vec2(1.0, 0.0), vec2(-0.577_350_27, 1.154_700_54));

/// Inverse of [`GRID_TO_SKEWED`] (without the input scale).
const SKEWED_TO_GRID: Mat2 = Mat2::from_cols(vec2(1.0, 0.0), vec2(0.5, 1.0 / 1.154_700_54));

/// Three hex-tile cells covering one sampling point, with their blend weights.
///
/// The weights are non-negative and sum to 1 by construction; no clamping or
/// renormalization is applied anywhere in the partition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleGrid {
    pub w1: f32,
    pub w2: f32,
    pub w3: f32,
    pub id1: IVec2,
    pub id2: IVec2,
    pub id3: IVec2,
}

impl TriangleGrid {
    /// The three weights as a vector, in cell order.
    #[inline(always)]
    pub fn weights(&self) -> Vec3 {
        Vec3::new(self.w1, self.w2, self.w3)
    }

    /// The three cell identifiers, in weight order.
    #[inline(always)]
    pub fn ids(&self) -> [IVec2; 3] {
        [self.id1, self.id2, self.id3]
    }
}

/// Partitions a texture coordinate into its three overlapping hex-tile cells.
///
/// Defined for all real `st`, including negative coordinates (`floor` rounds
/// toward negative infinity). Points exactly on a cell boundary fall out of the
/// `z < 0` comparison with a valid weight triple; no special-casing.
pub fn triangle_grid(st: Vec2) -> TriangleGrid {
    let skewed = skew(st);
    let base = skewed.floor();
    partition_skewed(skewed - base, base.as_ivec2())
}

/// Scale and skew of the input coordinate. The RWS partition reuses this for
/// its relative leg so the two paths agree bit-for-bit at zero offset.
#[inline(always)]
pub(crate) fn skew(st: Vec2) -> Vec2 {
    GRID_TO_SKEWED * (st * TILE_SCALE)
}

/// Weights and cell ids from an already skewed coordinate split into its
/// fractional part and integer base. Shared by the plain and RWS partitions.
#[inline(always)]
pub(crate) fn partition_skewed(frac: Vec2, base: IVec2) -> TriangleGrid {
    let z = 1.0 - frac.x - frac.y;

    // Selects which of the two triangles sharing the unit cell the point is in.
    let s = if z < 0.0 { 1 } else { 0 };
    let sf = s as f32;
    let s2 = 2.0 * sf - 1.0;

    TriangleGrid {
        w1: -z * s2,
        w2: sf - frac.y * s2,
        w3: sf - frac.x * s2,
        id1: base + ivec2(s, s),
        id2: base + ivec2(s, 1 - s),
        id3: base + ivec2(1 - s, s),
    }
}

/// Texture-space position of a cell's own center, the exact inverse of the
/// scale and skew in [`triangle_grid`]. Samples are rotated about this point
/// rather than the origin so rotation never drags a tile far from its cell.
pub fn cell_center(id: IVec2) -> Vec2 {
    (SKEWED_TO_GRID * id.as_vec2()) / TILE_SCALE
}
