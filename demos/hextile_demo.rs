// Renders a hex-tiled color image next to the same texture tiled naively, so
// the suppressed grid repetition is easy to compare by eye.
// Run with `--release`; add `--features parallel,timeit` for timing.
use glam::*;
use hextile::{
    raster::rasterize_color, test_util::textures::noise_texture, timeit, HexTileParams,
    TextureSource,
};
use image::{ImageBuffer, Rgba};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 640;
const TILE_RATE: f32 = 6.0;

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

fn main() {
    timeit!["generate texture",
        let tex = noise_texture(128, 7);
    ];

    let params = HexTileParams {
        rot_strength: 1.2,
        ..HexTileParams::standard()
    };

    timeit!["hex tile image",
        let hexed = rasterize_color(&tex, &params, WIDTH, HEIGHT, TILE_RATE);
    ];

    let dstdx = vec2(TILE_RATE / WIDTH as f32, 0.0);
    let dstdy = vec2(0.0, TILE_RATE / HEIGHT as f32);

    let img = ImageBuffer::from_fn(2 * WIDTH, HEIGHT, |x, y| {
        let c = if x < WIDTH {
            hexed[(y * WIDTH + x) as usize]
        } else {
            // Plain repeat tiling for comparison.
            let st = vec2(
                ((x - WIDTH) as f32 + 0.5) / WIDTH as f32,
                (y as f32 + 0.5) / HEIGHT as f32,
            ) * TILE_RATE;
            tex.sample_grad(st, dstdx, dstdy)
        };
        Rgba([to_u8(c.x), to_u8(c.y), to_u8(c.z), 255])
    });

    let path = "hextile_demo.png";
    img.save(path).expect("failed to write output image");
    println!("wrote {path}");
}
