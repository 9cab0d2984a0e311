//! Texture generators and hashing utilities for basic testing & examples.

pub mod sampling {
    #[inline(always)]
    pub fn uhash(x: u32) -> u32 {
        // from https://nullprogram.com/blog/2018/07/31/
        let mut x = x ^ (x >> 16);
        x = x.overflowing_mul(0x7feb352d).0;
        x = x ^ (x >> 15);
        x = x.overflowing_mul(0x846ca68b).0;
        x = x ^ (x >> 16);
        x
    }

    #[inline(always)]
    pub fn uhash2(a: u32, b: u32) -> u32 {
        uhash((a.overflowing_mul(1597334673).0) ^ (b.overflowing_mul(3812015801).0))
    }

    #[inline(always)]
    pub fn unormf(n: u32) -> f32 {
        n as f32 * (1.0 / 0xffffffffu32 as f32)
    }

    #[inline(always)]
    pub fn hash_noise(coord: glam::UVec2, frame: u32) -> f32 {
        let urnd = uhash2(coord.x, (coord.y << 11) + frame);
        unormf(urnd)
    }

    #[inline(always)]
    fn cubic(v0: f32, v1: f32, v2: f32, v3: f32, x: f32) -> f32 {
        let p = (v3 - v2) - (v0 - v1);
        let q = (v0 - v1) - p;
        let r = v2 - v0;
        let s = v1;
        p * x.powi(3) + q * x.powi(2) + r * x + s
    }

    #[inline(always)]
    pub fn bicubic_noise(coord: glam::Vec2, seed: u32) -> f32 {
        use glam::uvec2;
        let ix = coord.x.floor() as u32;
        let iy = coord.y.floor() as u32;
        let fx = coord.x - ix as f32;
        let fy = coord.y - iy as f32;
        fn cubic_col(ix: u32, iy: u32, j: u32, seed: u32, fx: f32) -> f32 {
            cubic(
                hash_noise(uvec2(ix, iy + j), seed),
                hash_noise(uvec2(ix + 1, iy + j), seed),
                hash_noise(uvec2(ix + 2, iy + j), seed),
                hash_noise(uvec2(ix + 3, iy + j), seed),
                fx,
            )
        }
        cubic(
            cubic_col(ix, iy, 0, seed, fx),
            cubic_col(ix, iy, 1, seed, fx),
            cubic_col(ix, iy, 2, seed, fx),
            cubic_col(ix, iy, 3, seed, fx),
            fy,
        )
    }
}

pub mod textures {
    use glam::{vec2, vec4, Vec4};

    use crate::test_util::sampling::bicubic_noise;
    use crate::texture::MipTexture;

    /// A `2n x 2n` black and white checkerboard.
    pub fn checker_texture(n: u32) -> MipTexture {
        MipTexture::from_fn(2 * n, 2 * n, |x, y| {
            if (x + y) % 2 == 0 {
                Vec4::ONE
            } else {
                vec4(0.0, 0.0, 0.0, 1.0)
            }
        })
    }

    /// A smooth multi-octave color noise texture; white noise would make the
    /// blended tiles indistinguishable, so the demo uses this instead.
    pub fn noise_texture(size: u32, seed: u32) -> MipTexture {
        MipTexture::from_fn(size, size, |x, y| {
            let coord = vec2(x as f32, y as f32) / size as f32;
            let octave = |scale: f32, s: u32| bicubic_noise(coord * scale, seed + s);
            let r = 0.7 * octave(4.0, 0) + 0.3 * octave(13.0, 1);
            let g = 0.7 * octave(4.0, 2) + 0.3 * octave(13.0, 3);
            let b = 0.7 * octave(4.0, 4) + 0.3 * octave(13.0, 5);
            vec4(r, g, b, 1.0)
        })
    }

    /// A normal map whose every texel decodes to the unperturbed normal
    /// (and therefore to a zero height derivative).
    pub fn flat_normal_texture(size: u32) -> MipTexture {
        MipTexture::from_fn(size, size, |_, _| vec4(0.5, 0.5, 1.0, 1.0))
    }
}
