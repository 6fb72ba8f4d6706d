//! Pure calculation functions for fit-to-box layout.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{CanvasMode, FitResult};

/// Resolve a requested target size against the source size.
///
/// A zero on either axis means "keep the source dimension".
pub fn resolve_target(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;
    (
        if tgt_w == 0 { src_w } else { tgt_w },
        if tgt_h == 0 { src_h } else { tgt_h },
    )
}

/// Offset that centers `inner` within `outer`.
///
/// Integer division truncates toward zero, so an odd negative difference
/// rounds toward the origin: `(100 - 133) / 2 == -16`.
pub fn center_offset(outer: u32, inner: u32) -> i64 {
    (outer as i64 - inner as i64) / 2
}

/// Compute how a source image is placed on the output canvas.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height); both non-zero
/// * `target` - Requested box (width, height); 0 keeps the source dimension
/// * `canvas` - Whether the canvas keeps the requested width when shrinking
///
/// # Rules
/// - If the box would enlarge both axes, the image is placed at its original
///   size in the middle of a canvas of the requested size.
/// - Otherwise the placed height is the requested height and the placed width
///   is aspect-locked to it: `round(sw * th / sh)`, at least 1.
///
/// # Examples
/// ```
/// # use modgen::imaging::{CanvasMode, calculate_fit};
/// // 800x600 into 100x100: height-keyed shrink, overflow on x
/// let fit = calculate_fit((800, 600), (100, 100), CanvasMode::Fixed);
/// assert_eq!((fit.placed_width, fit.placed_height), (133, 100));
/// assert_eq!((fit.offset_x, fit.offset_y), (-16, 0));
///
/// // 50x50 into 200x200: never upscaled
/// let fit = calculate_fit((50, 50), (200, 200), CanvasMode::Fixed);
/// assert_eq!((fit.placed_width, fit.placed_height), (50, 50));
/// assert_eq!((fit.offset_x, fit.offset_y), (75, 75));
/// ```
pub fn calculate_fit(source: (u32, u32), target: (u32, u32), canvas: CanvasMode) -> FitResult {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = resolve_target(source, target);

    let width_ratio = tgt_w as f64 / src_w as f64;
    let height_ratio = tgt_h as f64 / src_h as f64;

    let (placed_w, placed_h, canvas_w, upscale_guarded) = if width_ratio > 1.0 && height_ratio > 1.0
    {
        (src_w, src_h, tgt_w, true)
    } else {
        let placed_h = tgt_h;
        let placed_w = ((src_w as f64 * placed_h as f64) / src_h as f64).round() as u32;
        let placed_w = placed_w.max(1);
        let canvas_w = match canvas {
            CanvasMode::Fixed => tgt_w,
            CanvasMode::Scaled => placed_w,
        };
        (placed_w, placed_h, canvas_w, false)
    };
    let canvas_h = tgt_h;

    FitResult {
        canvas_width: canvas_w,
        canvas_height: canvas_h,
        placed_width: placed_w,
        placed_height: placed_h,
        offset_x: center_offset(canvas_w, placed_w),
        offset_y: center_offset(canvas_h, placed_h),
        upscale_guarded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // resolve_target / center_offset
    // =========================================================================

    #[test]
    fn zero_target_keeps_source_axis() {
        assert_eq!(resolve_target((640, 480), (0, 0)), (640, 480));
        assert_eq!(resolve_target((640, 480), (100, 0)), (100, 480));
        assert_eq!(resolve_target((640, 480), (0, 90)), (640, 90));
    }

    #[test]
    fn center_offset_even_and_odd_differences() {
        assert_eq!(center_offset(200, 50), 75);
        assert_eq!(center_offset(101, 50), 25); // 51 / 2 truncates down
        assert_eq!(center_offset(100, 133), -16); // -33 / 2 truncates toward zero
        assert_eq!(center_offset(100, 131), -15);
        assert_eq!(center_offset(100, 100), 0);
    }

    // =========================================================================
    // calculate_fit: upscale guard
    // =========================================================================

    #[test]
    fn small_source_is_never_upscaled() {
        let fit = calculate_fit((50, 50), (200, 200), CanvasMode::Fixed);
        assert!(fit.upscale_guarded);
        assert_eq!((fit.canvas_width, fit.canvas_height), (200, 200));
        assert_eq!((fit.placed_width, fit.placed_height), (50, 50));
        assert_eq!((fit.offset_x, fit.offset_y), (75, 75));
    }

    #[test]
    fn upscale_guard_ignores_canvas_mode() {
        let fit = calculate_fit((40, 30), (100, 100), CanvasMode::Scaled);
        assert!(fit.upscale_guarded);
        assert_eq!((fit.canvas_width, fit.canvas_height), (100, 100));
        assert_eq!((fit.placed_width, fit.placed_height), (40, 30));
        assert_eq!((fit.offset_x, fit.offset_y), (30, 35));
    }

    #[test]
    fn enlarging_one_axis_only_is_not_guarded() {
        // width ratio 2.0, height ratio 0.5 → shrink branch keyed on height
        let fit = calculate_fit((50, 200), (100, 100), CanvasMode::Fixed);
        assert!(!fit.upscale_guarded);
        assert_eq!((fit.placed_width, fit.placed_height), (25, 100));
        assert_eq!((fit.offset_x, fit.offset_y), (37, 0));
    }

    #[test]
    fn exact_fit_ratio_one_takes_shrink_branch() {
        let fit = calculate_fit((64, 64), (64, 64), CanvasMode::Fixed);
        assert!(!fit.upscale_guarded);
        assert_eq!((fit.placed_width, fit.placed_height), (64, 64));
        assert_eq!((fit.offset_x, fit.offset_y), (0, 0));
    }

    #[test]
    fn one_ratio_exactly_one_is_not_guarded() {
        // width ratio 1.0, height ratio 2.0 → not both > 1, height-keyed "shrink"
        let fit = calculate_fit((100, 50), (100, 100), CanvasMode::Fixed);
        assert!(!fit.upscale_guarded);
        assert_eq!((fit.placed_width, fit.placed_height), (200, 100));
        assert_eq!(fit.offset_x, -50);
    }

    // =========================================================================
    // calculate_fit: shrink branch
    // =========================================================================

    #[test]
    fn landscape_into_square_overflows_horizontally() {
        let fit = calculate_fit((800, 600), (100, 100), CanvasMode::Fixed);
        assert_eq!((fit.canvas_width, fit.canvas_height), (100, 100));
        assert_eq!(fit.placed_height, 100);
        assert_eq!(fit.placed_width, 133); // round(800 * 100 / 600) = round(133.33)
        assert_eq!((fit.offset_x, fit.offset_y), (-16, 0));
    }

    #[test]
    fn scaled_canvas_matches_placed_width() {
        let fit = calculate_fit((800, 600), (100, 100), CanvasMode::Scaled);
        assert_eq!((fit.canvas_width, fit.canvas_height), (133, 100));
        assert_eq!((fit.placed_width, fit.placed_height), (133, 100));
        assert_eq!((fit.offset_x, fit.offset_y), (0, 0));
    }

    #[test]
    fn portrait_into_square_is_centered() {
        let fit = calculate_fit((600, 800), (100, 100), CanvasMode::Fixed);
        assert_eq!((fit.placed_width, fit.placed_height), (75, 100));
        assert_eq!((fit.offset_x, fit.offset_y), (12, 0));
    }

    #[test]
    fn placed_width_rounds_half_away_from_zero() {
        // 3 * 50 / 4 = 37.5 → 38
        let fit = calculate_fit((300, 400), (100, 50), CanvasMode::Fixed);
        assert_eq!((fit.placed_width, fit.placed_height), (38, 50));
        assert_eq!(fit.offset_x, 31);
    }

    #[test]
    fn placed_width_never_collapses_to_zero() {
        let fit = calculate_fit((1, 1000), (32, 10), CanvasMode::Scaled);
        assert_eq!(fit.placed_width, 1);
        assert_eq!(fit.canvas_width, 1);
    }

    #[test]
    fn zero_width_request_uses_source_width() {
        // target (0, 300) → (800, 300); ratios 1.0 / 0.5 → shrink
        let fit = calculate_fit((800, 600), (0, 300), CanvasMode::Fixed);
        assert_eq!((fit.canvas_width, fit.canvas_height), (800, 300));
        assert_eq!((fit.placed_width, fit.placed_height), (400, 300));
        assert_eq!(fit.offset_x, 200);
    }

    #[test]
    fn zero_zero_request_is_identity() {
        let fit = calculate_fit((123, 45), (0, 0), CanvasMode::Fixed);
        assert_eq!((fit.canvas_width, fit.canvas_height), (123, 45));
        assert_eq!((fit.placed_width, fit.placed_height), (123, 45));
        assert_eq!((fit.offset_x, fit.offset_y), (0, 0));
    }

    #[test]
    fn centering_invariant_holds_across_sizes() {
        for &src in &[(800, 600), (601, 799), (17, 3), (1920, 1080), (5, 5)] {
            for &tgt in &[(32, 32), (33, 17), (100, 1), (250, 250)] {
                for mode in [CanvasMode::Fixed, CanvasMode::Scaled] {
                    let fit = calculate_fit(src, tgt, mode);
                    assert_eq!(
                        fit.offset_x,
                        (fit.canvas_width as i64 - fit.placed_width as i64) / 2,
                        "src {src:?} tgt {tgt:?}"
                    );
                    assert_eq!(
                        fit.offset_y,
                        (fit.canvas_height as i64 - fit.placed_height as i64) / 2,
                        "src {src:?} tgt {tgt:?}"
                    );
                    if !fit.upscale_guarded {
                        assert_eq!(fit.placed_height, tgt.1);
                    }
                }
            }
        }
    }
}
