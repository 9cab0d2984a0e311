//! A CPU texture with a box-filtered mip chain and gradient-driven trilinear
//! sampling, implementing [`TextureSource`] for tests, demos, and software
//! rasterizers. Hosts with hardware samplers implement the trait directly.

use glam::{vec2, Vec2, Vec4};

use crate::TextureSource;

struct MipLevel {
    texels: Vec<Vec4>,
    width: u32,
    height: u32,
}

impl MipLevel {
    /// Repeat-wrapped texel fetch.
    #[inline(always)]
    fn fetch(&self, x: i32, y: i32) -> Vec4 {
        let x = x.rem_euclid(self.width as i32) as usize;
        let y = y.rem_euclid(self.height as i32) as usize;
        self.texels[y * self.width as usize + x]
    }

    fn sample_bilinear(&self, st: Vec2) -> Vec4 {
        let x = st.x * self.width as f32 - 0.5;
        let y = st.y * self.height as f32 - 0.5;
        let xf = x.floor();
        let yf = y.floor();
        let fx = x - xf;
        let fy = y - yf;
        let x0 = xf as i32;
        let y0 = yf as i32;

        let c00 = self.fetch(x0, y0);
        let c10 = self.fetch(x0 + 1, y0);
        let c01 = self.fetch(x0, y0 + 1);
        let c11 = self.fetch(x0 + 1, y0 + 1);

        c00.lerp(c10, fx).lerp(c01.lerp(c11, fx), fy)
    }

    fn downsample(&self) -> MipLevel {
        let width = (self.width / 2).max(1);
        let height = (self.height / 2).max(1);
        let mut texels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let (x2, y2) = (2 * x as i32, 2 * y as i32);
                texels.push(
                    (self.fetch(x2, y2)
                        + self.fetch(x2 + 1, y2)
                        + self.fetch(x2, y2 + 1)
                        + self.fetch(x2 + 1, y2 + 1))
                        * 0.25,
                );
            }
        }
        MipLevel {
            texels,
            width,
            height,
        }
    }
}

/// A repeat-wrapped RGBA texture with a full mip chain. Level 0 holds the
/// given texels; each further level is a 2x2 box downsample of the previous
/// one, down to 1x1.
pub struct MipTexture {
    levels: Vec<MipLevel>,
}

impl MipTexture {
    /// Builds the texture and its mip chain from row-major texels.
    pub fn new(texels: Vec<Vec4>, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0);
        assert_eq!(texels.len(), (width * height) as usize);

        let mut levels = vec![MipLevel {
            texels,
            width,
            height,
        }];
        while levels.last().unwrap().width > 1 || levels.last().unwrap().height > 1 {
            levels.push(levels.last().unwrap().downsample());
        }
        MipTexture { levels }
    }

    /// Builds a texture by evaluating `texel` at every integer coordinate.
    pub fn from_fn<F>(width: u32, height: u32, texel: F) -> Self
    where
        F: Fn(u32, u32) -> Vec4,
    {
        let mut texels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                texels.push(texel(x, y));
            }
        }
        Self::new(texels, width, height)
    }

    pub fn width(&self) -> u32 {
        self.levels[0].width
    }

    pub fn height(&self) -> u32 {
        self.levels[0].height
    }

    /// Number of mip levels, including the base level.
    pub fn mip_count(&self) -> usize {
        self.levels.len()
    }
}

impl TextureSource for MipTexture {
    /// Trilinear sample. The level of detail comes from the larger of the two
    /// gradients scaled into texel units, matching the usual isotropic
    /// `SampleGrad` LOD selection.
    fn sample_grad(&self, st: Vec2, dstdx: Vec2, dstdy: Vec2) -> Vec4 {
        let size = vec2(self.levels[0].width as f32, self.levels[0].height as f32);
        let rho = (dstdx * size)
            .length_squared()
            .max((dstdy * size).length_squared());

        // log2(0) is -inf; the clamp turns zero gradients into level 0.
        let max_lod = (self.levels.len() - 1) as f32;
        let lod = (0.5 * rho.log2()).clamp(0.0, max_lod);

        let lo = lod.floor();
        let hi = (lo + 1.0).min(max_lod);
        let a = self.levels[lo as usize].sample_bilinear(st);
        let b = self.levels[hi as usize].sample_bilinear(st);
        a.lerp(b, lod - lo)
    }
}
