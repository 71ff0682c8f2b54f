//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Scale `source` uniformly so it fits entirely inside `target`.
///
/// The limiting axis matches the target exactly; the other axis is floored
/// and never exceeds its target. Each side is at least 1 pixel. Integer
/// arithmetic keeps the result free of floating-point drift
/// (`800x600` into `2160x1620` is exactly `2160x1620`).
///
/// # Examples
/// ```
/// # use wallpaper_gallery::imaging::fit_dimensions;
/// // 4:3 landscape onto a 3:4 portrait canvas → width-limited
/// assert_eq!(fit_dimensions((800, 600), (1404, 1872)), (1404, 1053));
/// ```
pub fn fit_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = (source.0.max(1) as u64, source.1.max(1) as u64);
    let (tgt_w, tgt_h) = (target.0 as u64, target.1 as u64);

    // Compare tgt_w/src_w against tgt_h/src_h without dividing.
    if tgt_w * src_h <= tgt_h * src_w {
        // Width is the limiting axis
        let h = (src_h * tgt_w / src_w).clamp(1, tgt_h.max(1));
        (target.0, h as u32)
    } else {
        // Height is the limiting axis
        let w = (src_w * tgt_h / src_h).clamp(1, tgt_w.max(1));
        (w as u32, target.1)
    }
}

/// Top-left offset that centers `fitted` inside `target`.
///
/// The remainder on each axis is floor-divided, so an odd remainder leaves
/// the extra pixel of padding on the right/bottom.
pub fn center_offset(target: (u32, u32), fitted: (u32, u32)) -> (u32, u32) {
    (
        target.0.saturating_sub(fitted.0) / 2,
        target.1.saturating_sub(fitted.1) / 2,
    )
}

/// Thumbnail dimensions for a canvas: fixed width, proportional height.
///
/// Height is `round(width × canvas_h / canvas_w)`, at least 1.
///
/// # Examples
/// ```
/// # use wallpaper_gallery::imaging::thumbnail_dimensions;
/// assert_eq!(thumbnail_dimensions((2160, 1620), 600), (600, 450));
/// assert_eq!(thumbnail_dimensions((1404, 1872), 600), (600, 800));
/// ```
pub fn thumbnail_dimensions(canvas: (u32, u32), width: u32) -> (u32, u32) {
    let (canvas_w, canvas_h) = canvas;
    let h = (width as f64 * canvas_h as f64 / canvas_w.max(1) as f64).round() as u32;
    (width, h.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAPERPRO: (u32, u32) = (2160, 1620);
    const RM2: (u32, u32) = (1404, 1872);

    // =========================================================================
    // fit_dimensions tests
    // =========================================================================

    #[test]
    fn fit_same_aspect_fills_canvas() {
        assert_eq!(fit_dimensions((800, 600), PAPERPRO), PAPERPRO);
    }

    #[test]
    fn fit_landscape_onto_portrait() {
        // 800x600 → 1404 wide, 600 * 1404 / 800 = 1053
        assert_eq!(fit_dimensions((800, 600), RM2), (1404, 1053));
    }

    #[test]
    fn fit_portrait_onto_landscape() {
        // 600x800 → 1620 tall, 600 * 1620 / 800 = 1215
        assert_eq!(fit_dimensions((600, 800), PAPERPRO), (1215, 1620));
    }

    #[test]
    fn fit_upscales_tiny_source() {
        assert_eq!(fit_dimensions((1, 1), PAPERPRO), (1620, 1620));
        assert_eq!(fit_dimensions((1, 1), RM2), (1404, 1404));
    }

    #[test]
    fn fit_extreme_wide_source_keeps_one_pixel() {
        assert_eq!(fit_dimensions((100_000, 1), PAPERPRO), (2160, 1));
    }

    #[test]
    fn fit_extreme_tall_source_keeps_one_pixel() {
        assert_eq!(fit_dimensions((1, 100_000), RM2), (1, 1872));
    }

    #[test]
    fn fit_floors_the_non_limiting_axis() {
        // 3x2 into 10x10: 2 * 10 / 3 = 6.67 → 6
        assert_eq!(fit_dimensions((3, 2), (10, 10)), (10, 6));
    }

    #[test]
    fn fit_never_crops_and_touches_one_edge() {
        let sources = [
            (1, 1),
            (800, 600),
            (600, 800),
            (4000, 3000),
            (3, 7919),
            (7919, 3),
            (1620, 2160),
            (2161, 1621),
        ];
        for target in [PAPERPRO, RM2, (1, 1), (7, 3)] {
            for source in sources {
                let (w, h) = fit_dimensions(source, target);
                assert!(w >= 1 && h >= 1, "{source:?} → {target:?}");
                assert!(w <= target.0 && h <= target.1, "{source:?} → {target:?}");
                assert!(w == target.0 || h == target.1, "{source:?} → {target:?}");
            }
        }
    }

    // =========================================================================
    // center_offset tests
    // =========================================================================

    #[test]
    fn offset_for_full_canvas_is_zero() {
        assert_eq!(center_offset(PAPERPRO, PAPERPRO), (0, 0));
    }

    #[test]
    fn offset_centers_letterbox() {
        // (1872 - 1053) / 2 = 409
        assert_eq!(center_offset(RM2, (1404, 1053)), (0, 409));
    }

    #[test]
    fn offset_odd_remainder_floors() {
        assert_eq!(center_offset((10, 10), (7, 10)), (1, 0));
    }

    // =========================================================================
    // thumbnail_dimensions tests
    // =========================================================================

    #[test]
    fn thumbnail_landscape_canvas() {
        assert_eq!(thumbnail_dimensions(PAPERPRO, 600), (600, 450));
    }

    #[test]
    fn thumbnail_portrait_canvas() {
        assert_eq!(thumbnail_dimensions(RM2, 600), (600, 800));
    }

    #[test]
    fn thumbnail_rounds_height() {
        // 600 * 2 / 3 = 400; 600 * 1 / 7 = 85.71 → 86
        assert_eq!(thumbnail_dimensions((3, 2), 600), (600, 400));
        assert_eq!(thumbnail_dimensions((7, 1), 600), (600, 86));
    }

    #[test]
    fn thumbnail_height_at_least_one() {
        assert_eq!(thumbnail_dimensions((100_000, 1), 600), (600, 1));
    }
}
