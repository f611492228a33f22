// Property tests for the ratio fitting geometry.
use brand_image_prep::image_prep::{AspectRatio, fit, fit_scaled};
use proptest::prelude::*;

fn ratio_strategy() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=120, 1u32..=120)
}

proptest! {
    #[test]
    fn canvas_matches_ratio_exactly(
        sw in 1u32..5_000,
        sh in 1u32..5_000,
        (num, den) in ratio_strategy(),
        min_w in 0u32..2_000,
        min_h in 0u32..2_000,
    ) {
        let ratio = AspectRatio::new(num, den).unwrap();
        let result = fit(sw, sh, ratio, min_w, min_h).unwrap();

        prop_assert_eq!(
            u64::from(result.canvas_width) * u64::from(den),
            u64::from(result.canvas_height) * u64::from(num)
        );
    }

    #[test]
    fn canvas_respects_minimums_and_never_clips(
        sw in 1u32..5_000,
        sh in 1u32..5_000,
        (num, den) in ratio_strategy(),
        min_w in 0u32..2_000,
        min_h in 0u32..2_000,
    ) {
        let ratio = AspectRatio::new(num, den).unwrap();
        let result = fit(sw, sh, ratio, min_w, min_h).unwrap();

        prop_assert!(result.canvas_width >= min_w);
        prop_assert!(result.canvas_height >= min_h);
        prop_assert!(result.canvas_width >= sw);
        prop_assert!(result.canvas_height >= sh);
        prop_assert!(result.offset_x >= 0 && result.offset_y >= 0);
        prop_assert_eq!(result.offset_x, i64::from((result.canvas_width - sw) / 2));
        prop_assert_eq!(result.offset_y, i64::from((result.canvas_height - sh) / 2));
        prop_assert_eq!((result.content_width, result.content_height), (sw, sh));
    }

    #[test]
    fn refitting_a_fitted_canvas_is_idempotent(
        sw in 1u32..5_000,
        sh in 1u32..5_000,
        (num, den) in ratio_strategy(),
        min_w in 0u32..2_000,
        min_h in 0u32..2_000,
    ) {
        let ratio = AspectRatio::new(num, den).unwrap();
        let first = fit(sw, sh, ratio, min_w, min_h).unwrap();
        let second = fit(first.canvas_width, first.canvas_height, ratio, min_w, min_h).unwrap();

        prop_assert_eq!(
            (second.canvas_width, second.canvas_height),
            (first.canvas_width, first.canvas_height)
        );
        prop_assert_eq!((second.offset_x, second.offset_y), (0, 0));
    }

    #[test]
    fn scaled_content_stays_inside_square_canvas(
        sw in 1u32..10_000,
        sh in 1u32..10_000,
        size in 1u32..512,
    ) {
        let result = fit_scaled(sw, sh, size).unwrap();

        prop_assert_eq!((result.canvas_width, result.canvas_height), (size, size));
        prop_assert!(result.content_width >= 1 && result.content_width <= size);
        prop_assert!(result.content_height >= 1 && result.content_height <= size);
        prop_assert!(result.content_width == size || result.content_height == size);
        prop_assert!(result.offset_x >= 0 && result.offset_y >= 0);
    }
}

#[test]
fn documented_examples() {
    let cases = [
        ((800, 200), (5, 2), (400, 160), (800, 320)),
        ((100, 100), (1, 1), (40, 40), (100, 100)),
        ((50, 80), (73, 100), (292, 400), (292, 400)),
    ];

    for ((sw, sh), (num, den), (min_w, min_h), expected) in cases {
        let result = fit(sw, sh, AspectRatio::new(num, den).unwrap(), min_w, min_h).unwrap();
        assert_eq!((result.canvas_width, result.canvas_height), expected);
    }
}
