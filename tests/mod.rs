#[cfg(test)]
mod tests {

    use glam::*;
    use hextile::{
        bump::hex_tile_bump,
        color::hex_tile_color,
        grid::{cell_center, triangle_grid},
        hash::cell_hash,
        rws::{hex_tile_color_rws, triangle_grid_rws},
        test_util::{
            sampling::hash_noise,
            textures::{checker_texture, flat_normal_texture, noise_texture},
        },
        HexTileParams,
    };

    /// All-f64 rendition of the triangle grid partition, used as the precision
    /// reference for the RWS tests.
    fn reference_grid(st: DVec2) -> ([f64; 3], [I64Vec2; 3]) {
        let st = st * 3.464_101_615_137_754_6;
        let skewed = dvec2(
            st.x - 0.577_350_269_189_625_8 * st.y,
            1.154_700_538_379_251_5 * st.y,
        );
        let base = skewed.floor();
        let f = skewed - base;
        let z = 1.0 - f.x - f.y;
        let (s, s2) = if z < 0.0 { (1i64, 1.0) } else { (0i64, -1.0) };
        let sf = s as f64;
        let b = base.as_i64vec2();
        (
            [-z * s2, sf - f.y * s2, sf - f.x * s2],
            [
                b + i64vec2(s, s),
                b + i64vec2(s, 1 - s),
                b + i64vec2(1 - s, s),
            ],
        )
    }

    fn sorted(mut w: [f64; 3]) -> [f64; 3] {
        w.sort_by(f64::total_cmp);
        w
    }

    /// Weighted centroid of the three cell ids relative to `anchor`. Continuous
    /// in the sampling point even where the partition switches triangles, so it
    /// compares two partitions without depending on slot order. The anchor
    /// keeps the operands O(1); a raw centroid would scale tiny weight errors
    /// by the huge absolute ids far from the origin.
    fn centroid(w: [f64; 3], ids: [DVec2; 3], anchor: DVec2) -> DVec2 {
        w[0] * (ids[0] - anchor) + w[1] * (ids[1] - anchor) + w[2] * (ids[2] - anchor)
    }

    fn random_rel(i: u32, seed: u32) -> Vec2 {
        vec2(
            hash_noise(uvec2(i, 0), seed) * 2.0 - 1.0,
            hash_noise(uvec2(i, 1), seed) * 2.0 - 1.0,
        )
    }

    #[test]
    pub fn rws_reduces_to_plain_partition_at_zero_offset() {
        for i in 0..100 {
            let rel = random_rel(i, 21) * 10.0;
            let a = triangle_grid_rws(rel, DVec2::ZERO);
            let b = triangle_grid(rel);
            assert_eq!(a, b, "diverged at {}", rel);
        }
    }

    #[test]
    pub fn rws_preserves_precision_far_from_origin() {
        let offset = dvec2(1.0e7, -3.0e6);
        let mut naive_max_err: f64 = 0.0;

        for i in 0..100 {
            let rel = random_rel(i, 33);
            let reference = reference_grid(rel.as_dvec2() + offset);

            let rws = triangle_grid_rws(rel, offset);
            let rws_w = [rws.w1 as f64, rws.w2 as f64, rws.w3 as f64];
            let rws_ids = rws.ids().map(|id| id.as_dvec2());

            let ref_sorted = sorted(reference.0);
            let rws_sorted = sorted(rws_w);
            for k in 0..3 {
                assert!(
                    (ref_sorted[k] - rws_sorted[k]).abs() < 1e-4,
                    "weights {:?} vs {:?} at {}",
                    rws_sorted,
                    ref_sorted,
                    rel
                );
            }

            let anchor = reference.1[0].as_dvec2();
            let ref_centroid = centroid(reference.0, reference.1.map(|id| id.as_dvec2()), anchor);
            let rws_centroid = centroid(rws_w, rws_ids, anchor);
            assert!(
                (ref_centroid - rws_centroid).length() < 1e-3,
                "cells {} vs {} at {}",
                rws_centroid,
                ref_centroid,
                rel
            );

            // The naive single-precision partition of the combined coordinate
            // loses the fractional part entirely at this distance.
            let naive = triangle_grid((rel.as_dvec2() + offset).as_vec2());
            let naive_sorted = sorted([naive.w1 as f64, naive.w2 as f64, naive.w3 as f64]);
            for k in 0..3 {
                naive_max_err = naive_max_err.max((ref_sorted[k] - naive_sorted[k]).abs());
            }
        }

        assert!(
            naive_max_err > 1e-4,
            "naive partition unexpectedly kept precision (max err {})",
            naive_max_err
        );
    }

    #[test]
    pub fn checkerboard_blend_matches_barycentric_reference() {
        use hextile::TextureSource;

        let tex = checker_texture(1);
        let params = HexTileParams::geometric();
        let st = vec2(0.5, 0.5);

        let out = hex_tile_color(&tex, st, Vec2::ZERO, Vec2::ZERO, &params);

        // With rotation off, statistics off, and a unit exponent, the blend is
        // the plain barycentric combination of the three jittered fetches.
        let grid = triangle_grid(st);
        let mut expected = Vec4::ZERO;
        for (w, id) in [
            (grid.w1, grid.id1),
            (grid.w2, grid.id2),
            (grid.w3, grid.id3),
        ] {
            let cen = cell_center(id);
            let st_i = (st - cen) + cen + cell_hash(id);
            expected += w * tex.sample_grad(st_i, Vec2::ZERO, Vec2::ZERO);
        }

        assert!(
            (out.color - expected).abs().max_element() < 1e-5,
            "{} vs {}",
            out.color,
            expected
        );
        assert!((out.weights.element_sum() - 1.0).abs() < 1e-5);
    }

    #[test]
    pub fn rws_compositor_matches_plain_compositor_at_zero_offset() {
        let tex = noise_texture(64, 5);
        let dstdx = vec2(1.0 / 256.0, 0.0);
        let dstdy = vec2(0.0, 1.0 / 256.0);

        for rot_strength in [0.0, 1.5] {
            let params = HexTileParams {
                rot_strength,
                ..HexTileParams::standard()
            };
            for i in 0..50 {
                let st = random_rel(i, 47) * 4.0;
                let plain = hex_tile_color(&tex, st, dstdx, dstdy, &params);
                let rws = hex_tile_color_rws(&tex, st, DVec2::ZERO, dstdx, dstdy, &params);
                assert!(
                    (plain.color - rws.color).abs().max_element() < 1e-3,
                    "{} vs {} at {} (rot {})",
                    plain.color,
                    rws.color,
                    st,
                    rot_strength
                );
            }
        }
    }

    #[test]
    pub fn bump_blend_is_finite_and_bounded_under_rotation() {
        let tex = flat_normal_texture(16);
        let params = HexTileParams {
            rot_strength: 5.0,
            contrast: 0.8,
            ..HexTileParams::standard()
        };
        for i in 0..50 {
            let st = random_rel(i, 59) * 8.0;
            let out = hex_tile_bump(&tex, st, vec2(1e-3, 0.0), vec2(0.0, 1e-3), &params);
            assert!(out.deriv.is_finite());
            assert!(out.deriv.length() < 1e-4);
            assert!((out.weights.element_sum() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    pub fn blend_is_continuous_across_cell_boundaries() {
        // Walk a straight line through several cells; neighboring evaluations
        // must never jump, including exactly where the dominant cell changes.
        let tex = noise_texture(64, 13);
        let params = HexTileParams::standard();
        let dstdx = vec2(1.0 / 512.0, 0.0);
        let dstdy = vec2(0.0, 1.0 / 512.0);

        let step = 1.0 / 1024.0;
        let mut prev: Option<Vec4> = None;
        for i in 0..2048 {
            let st = vec2(0.137, 0.211) + vec2(1.0, 0.618) * (i as f32 * step);
            let out = hex_tile_color(&tex, st, dstdx, dstdy, &params).color;
            if let Some(prev) = prev {
                assert!(
                    (out - prev).abs().max_element() < 0.2,
                    "jump at {}: {} -> {}",
                    st,
                    prev,
                    out
                );
            }
            prev = Some(out);
        }
    }
}
