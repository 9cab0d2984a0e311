//! Whole-image hex-tile evaluation. One call covers a regular pixel grid with
//! analytically known screen-space derivatives; rows are parallelized with
//! rayon when the `parallel` feature is enabled.

#[cfg(feature = "parallel")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
#[cfg(feature = "parallel")]
use rayon::slice::ParallelSliceMut;

use glam::{vec2, Vec4};

use crate::{color::hex_tile_color, HexTileParams, TextureSource};

/// Evaluates [`hex_tile_color`] for every pixel of a `width` x `height` image.
///
/// `tile_rate` is how many texture repeats span the image horizontally; the
/// per-pixel derivatives follow from it directly, so filtering behaves as it
/// would for a screen-aligned quad. Returns row-major texels.
pub fn rasterize_color<S: TextureSource>(
    source: &S,
    params: &HexTileParams,
    width: u32,
    height: u32,
    tile_rate: f32,
) -> Vec<Vec4> {
    crate::scope!("rasterize_color");

    let dstdx = vec2(tile_rate / width as f32, 0.0);
    let dstdy = vec2(0.0, tile_rate / height as f32);

    let fill_row = |(y, row): (usize, &mut [Vec4])| {
        for (x, out) in row.iter_mut().enumerate() {
            let st = vec2(
                (x as f32 + 0.5) / width as f32,
                (y as f32 + 0.5) / height as f32,
            ) * tile_rate;
            *out = hex_tile_color(source, st, dstdx, dstdy, params).color;
        }
    };

    let mut texels = vec![Vec4::ZERO; (width as usize) * (height as usize)];

    #[cfg(feature = "parallel")]
    texels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(fill_row);

    #[cfg(not(feature = "parallel"))]
    texels.chunks_mut(width as usize).enumerate().for_each(fill_row);

    texels
}
