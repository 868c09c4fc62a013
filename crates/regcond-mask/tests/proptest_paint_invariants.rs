//! Property-based invariant tests for clipped rectangle painting.
//!
//! 1. Painting never changes the mask shape.
//! 2. The painted pixel count equals the clipped rectangle's area.
//! 3. Every pixel is either zero or the painted value.
//! 4. No panics for any logical rectangle, however far out of bounds.

use proptest::prelude::*;
use regcond_core::geometry::{Canvas, Rect};
use regcond_mask::Mask;

fn canvas() -> impl Strategy<Value = Canvas> {
    (1u32..=96, 1u32..=96).prop_map(|(w, h)| Canvas::new(w, h))
}

fn logical_rect() -> impl Strategy<Value = Rect> {
    (-200i64..200, -200i64..200, -20i64..300, -20i64..300)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn painting_preserves_shape(canvas in canvas(), rect in logical_rect()) {
        let mut mask = Mask::zeros(canvas);
        mask.paint_rect(rect, 1.0);
        prop_assert_eq!(mask.canvas(), canvas);
        prop_assert_eq!(mask.view().dim(), canvas.shape());
    }

    #[test]
    fn painted_count_matches_clip_area(
        canvas in canvas(),
        rect in logical_rect(),
        value in 0.01f32..10.0,
    ) {
        let mut mask = Mask::zeros(canvas);
        let painted = mask.paint_rect(rect, value);
        let expected = rect.intersection(&canvas.bounds()).area();
        prop_assert_eq!(mask.stats().nonzero, expected);
        prop_assert_eq!(painted.map_or(0, |r| r.area()), expected);
    }

    #[test]
    fn pixels_are_zero_or_value(
        canvas in canvas(),
        rect in logical_rect(),
        value in 0.01f32..10.0,
    ) {
        let mask = Mask::with_rect(canvas, rect, value);
        for v in mask.values() {
            prop_assert!(v == 0.0 || v == value);
        }
    }
}
