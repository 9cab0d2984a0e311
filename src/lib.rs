//! # Hex-Tiling Texture Sampling Library
//!
//! Procedural hex-tiling: a repeating 2D texture is sampled as three
//! overlapping, independently jittered and rotated copies laid out on a
//! triangular lattice, so the grid period of ordinary tiling is not visually
//! apparent. Screen-space derivatives are carried through every transform,
//! keeping mip/anisotropic filtering correct, and the bump path blends height
//! derivatives so the result composes with surface-gradient bump mapping.
//!
//! The core is a pure, stateless numerical transform: every function depends
//! only on its explicit arguments, so it can be evaluated from any number of
//! threads without synchronization. Texture fetches go through the
//! [`TextureSource`] trait; [`texture::MipTexture`] is a CPU implementation
//! with a mip chain and gradient-driven trilinear filtering for tests, demos,
//! and software rasterizers.
//!
//! For large open worlds the [`rws`] module provides the relative-world-space
//! variants, which split the sampling coordinate into a small per-point part
//! and a large once-per-frame offset to avoid floating-point precision loss
//! far from the origin.
//!
//! ## Example
//!
//! ```
//! use glam::*;
//! use hextile::{color::hex_tile_color, test_util::textures::checker_texture, HexTileParams};
//!
//! let tex = checker_texture(4);
//! let params = HexTileParams::standard();
//!
//! // One shaded point: texture coordinate plus its two screen-space derivatives.
//! let st = vec2(0.25, 0.6);
//! let dstdx = vec2(1.0 / 256.0, 0.0);
//! let dstdy = vec2(0.0, 1.0 / 256.0);
//!
//! let out = hex_tile_color(&tex, st, dstdx, dstdy, &params);
//! assert!((out.weights.element_sum() - 1.0).abs() < 1e-4);
//! ```

use std::time::Duration;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

pub mod bump;
pub mod color;
pub mod grid;
pub mod hash;
pub mod raster;
pub mod rws;
pub mod test_util;
pub mod texture;
pub mod weights;

/// A source of filtered texture samples addressed with explicit screen-space
/// derivatives (the CPU analogue of `SampleGrad`). Texels are returned in
/// their storage range `[0, 1]`; the bump path applies the `2x - 1`
/// tangent-space decode itself. Coordinates wrap with period 1.
#[cfg(feature = "parallel")]
pub trait TextureSource: Send + Sync {
    fn sample_grad(&self, st: Vec2, dstdx: Vec2, dstdy: Vec2) -> Vec4;
}

/// A source of filtered texture samples addressed with explicit screen-space
/// derivatives (the CPU analogue of `SampleGrad`). Texels are returned in
/// their storage range `[0, 1]`; the bump path applies the `2x - 1`
/// tangent-space decode itself. Coordinates wrap with period 1.
#[cfg(not(feature = "parallel"))]
pub trait TextureSource {
    fn sample_grad(&self, st: Vec2, dstdx: Vec2, dstdy: Vec2) -> Vec4;
}

/// Tuning parameters threaded through every hex-tiling call.
///
/// `#[repr(C)]` and `Pod` so a host renderer can upload the same struct as a
/// uniform block. There is no process-wide state; two calls with equal inputs
/// and equal params return identical results.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct HexTileParams {
    /// How strongly per-cell sample statistics (luminance, derivative magnitude)
    /// perturb the purely geometric blend weights. 0 ignores the statistics.
    pub fall_off_contrast: f32,
    /// Exponent applied to the raw barycentric weights. Higher values make one
    /// cell dominate near cell boundaries, hiding blend seams.
    pub exponent: f32,
    /// Scale on the per-cell decorrelating rotation angle. 0 disables rotation
    /// entirely. Typical UI range maps to 0..25.
    pub rot_strength: f32,
    /// Gain contrast applied to the shaped weights. 0.5 is the identity; above
    /// 0.5 pushes weights toward 0/1, below flattens them. Typical UI range
    /// 0..0.999.
    pub contrast: f32,
}

impl HexTileParams {
    /// The tuning used by the original technique: statistics-driven falloff
    /// with a sharp weight exponent, no rotation, identity gain.
    pub const fn standard() -> Self {
        HexTileParams {
            fall_off_contrast: 0.6,
            exponent: 7.0,
            rot_strength: 0.0,
            contrast: 0.5,
        }
    }

    /// Pure barycentric blending: sample statistics ignored, raw weights used
    /// as-is. Mostly useful for validation, since the untouched weights make
    /// the blend analytically predictable.
    pub const fn geometric() -> Self {
        HexTileParams {
            fall_off_contrast: 0.0,
            exponent: 1.0,
            rot_strength: 0.0,
            contrast: 0.5,
        }
    }
}

impl Default for HexTileParams {
    fn default() -> Self {
        Self::standard()
    }
}

/// A macro to measure and print the execution time of a block of code.
///
/// # Arguments
/// * `$label` - A string label to identify the code block being timed.
/// * `$($code:tt)*` - The code block whose execution time is to be measured.
///
/// # Usage
/// ```rust
/// use hextile::timeit;
/// timeit!["example",
///     // code to measure
/// ];
/// ```
///
/// # Note
/// The macro purposefully doesn't include a scope so variables don't need to
/// be passed out of it. This allows it to be trivially added to existing code.
///
/// This macro only measures time when the `timeit` feature is enabled.
#[macro_export]
#[doc(hidden)]
macro_rules! timeit {
    [$label:expr, $($code:tt)*] => {
        #[cfg(feature = "timeit")]
        let timeit_start = std::time::Instant::now();
        $($code)*
        #[cfg(feature = "timeit")]
        println!("{:>8} {}", format!("{}", $crate::PrettyDuration(timeit_start.elapsed())), $label);
    };
}

/// A wrapper struct for `std::time::Duration` to provide pretty-printing of durations.
#[doc(hidden)]
pub struct PrettyDuration(pub Duration);

impl std::fmt::Display for PrettyDuration {
    /// Durations are formatted as follows:
    /// - If the duration is greater than or equal to 1 second, it is formatted in seconds (s).
    /// - If the duration is greater than or equal to 1 millisecond but less than 1 second, it is formatted in milliseconds (ms).
    /// - If the duration is less than 1 millisecond, it is formatted in microseconds (µs).
    ///   In the case of seconds & milliseconds, the duration is always printed with a precision of two decimal places.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let duration = self.0;
        if duration.as_secs() > 0 {
            let seconds =
                duration.as_secs() as f64 + f64::from(duration.subsec_nanos()) / 1_000_000_000.0;
            write!(f, "{seconds:.2}s ")
        } else if duration.subsec_millis() > 0 {
            let milliseconds =
                duration.as_millis() as f64 + f64::from(duration.subsec_micros() % 1_000) / 1_000.0;
            write!(f, "{milliseconds:.2}ms")
        } else {
            let microseconds = duration.as_micros();
            write!(f, "{microseconds}µs")
        }
    }
}

/// Add profile scope. Nesting the macro allows us to make the profiling crate optional.
#[doc(hidden)]
#[macro_export]
macro_rules! scope {
    [$label:expr] => {
        #[cfg(feature = "profile")]
        profiling::scope!($label);
    };
}
