#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// The raster frame every region is resolved against.
///
/// Both dimensions are expected to be non-zero for a meaningful merge. A zero
/// dimension is still representable and simply produces empty masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a new canvas.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The canvas as a rectangle anchored at the origin.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width as i64, self.height as i64)
    }

    /// Array shape in row-major `(rows, cols)` order.
    #[inline]
    pub const fn shape(&self) -> (usize, usize) {
        (self.height as usize, self.width as usize)
    }

    /// Area in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Canvas {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// A logical pixel rectangle.
///
/// Uses raster coordinates (0-indexed, origin at top-left). Coordinates are
/// signed and unbounded: a rectangle resolved from out-of-range fractions can
/// start left of the canvas or extend past it. Clipping against a concrete
/// frame happens only through [`Rect::intersection_opt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i64,
    /// Top edge (inclusive).
    pub y: i64,
    /// Width in pixels. Non-positive means empty.
    pub width: i64,
    /// Height in pixels. Non-positive means empty.
    pub height: i64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: i64, height: i64) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i64 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero (or negative) extent.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Area in pixels; zero for empty rectangles.
    #[inline]
    pub const fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.width as u64 * self.height as u64
        }
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Canvas, Rect};

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2, 3, 4, 5);
        assert!(rect.contains(2, 3));
        assert!(rect.contains(5, 7));
        assert!(!rect.contains(6, 3));
        assert!(!rect.contains(2, 8));
    }

    #[test]
    fn rect_intersection_overlaps() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 2, 4, 4);
        assert_eq!(a.intersection(&b), Rect::new(2, 2, 2, 2));
    }

    #[test]
    fn rect_intersection_no_overlap_is_empty() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(3, 3, 2, 2);
        assert_eq!(a.intersection(&b), Rect::default());
        assert!(a.intersection_opt(&b).is_none());
    }

    #[test]
    fn rect_intersection_clips_negative_origin() {
        let logical = Rect::new(-5, -2, 10, 4);
        let frame = Rect::from_size(8, 8);
        assert_eq!(logical.intersection(&frame), Rect::new(0, 0, 5, 2));
    }

    #[test]
    fn negative_extent_is_empty() {
        let rect = Rect::new(3, 3, -2, 4);
        assert!(rect.is_empty());
        assert_eq!(rect.area(), 0);
        assert!(rect.intersection_opt(&Rect::from_size(10, 10)).is_none());
    }

    #[test]
    fn canvas_bounds_and_shape() {
        let canvas = Canvas::new(640, 480);
        assert_eq!(canvas.bounds(), Rect::new(0, 0, 640, 480));
        assert_eq!(canvas.shape(), (480, 640));
        assert_eq!(canvas.area(), 307_200);
        assert!(!canvas.is_empty());
        assert!(Canvas::from((0, 10)).is_empty());
    }
}
