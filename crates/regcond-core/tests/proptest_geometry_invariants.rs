//! Property-based invariant tests for rectangle clipping.
//!
//! 1. An intersection lies inside both operands.
//! 2. Intersection is commutative.
//! 3. Clipping against a canvas never leaves the canvas bounds.
//! 4. Every point inside the intersection is inside both operands.

use proptest::prelude::*;
use regcond_core::geometry::{Canvas, Rect};

// ── Strategies ──────────────────────────────────────────────────────────

fn any_rect() -> impl Strategy<Value = Rect> {
    (-500i64..500, -500i64..500, -50i64..600, -50i64..600)
        .prop_map(|(x, y, width, height)| Rect::new(x, y, width, height))
}

fn canvas() -> impl Strategy<Value = Canvas> {
    (1u32..=256, 1u32..=256).prop_map(|(w, h)| Canvas::new(w, h))
}

fn inside(inner: &Rect, outer: &Rect) -> bool {
    inner.x >= outer.x
        && inner.y >= outer.y
        && inner.right() <= outer.right()
        && inner.bottom() <= outer.bottom()
}

proptest! {
    #[test]
    fn intersection_is_contained_in_both(a in any_rect(), b in any_rect()) {
        if let Some(clip) = a.intersection_opt(&b) {
            prop_assert!(!clip.is_empty());
            prop_assert!(inside(&clip, &a));
            prop_assert!(inside(&clip, &b));
        }
    }

    #[test]
    fn intersection_is_commutative(a in any_rect(), b in any_rect()) {
        prop_assert_eq!(a.intersection(&b), b.intersection(&a));
    }

    #[test]
    fn canvas_clip_stays_in_bounds(rect in any_rect(), canvas in canvas()) {
        let clip = rect.intersection(&canvas.bounds());
        if !clip.is_empty() {
            prop_assert!(clip.x >= 0 && clip.y >= 0);
            prop_assert!(clip.right() <= i64::from(canvas.width));
            prop_assert!(clip.bottom() <= i64::from(canvas.height));
        }
        prop_assert!(clip.area() <= canvas.area());
    }

    #[test]
    fn clipped_points_belong_to_both(
        a in any_rect(),
        b in any_rect(),
        px in -500i64..1100,
        py in -500i64..1100,
    ) {
        let clip = a.intersection(&b);
        if clip.contains(px, py) {
            prop_assert!(a.contains(px, py));
            prop_assert!(b.contains(px, py));
        }
    }
}
