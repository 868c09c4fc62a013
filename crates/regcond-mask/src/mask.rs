#![deny(unsafe_code)]

//! Dense region masks.
//!
//! A [`Mask`] is a row-major `(height, width)` grid of `f32` weights. Masks
//! start zeroed and receive values only through [`Mask::paint_rect`], which
//! intersects the requested rectangle with the mask bounds before writing.
//! That intersection is the only place where an oversized or misplaced
//! rectangle gets truncated.
//!
//! # Usage
//!
//! ```
//! use regcond_core::geometry::{Canvas, Rect};
//! use regcond_mask::Mask;
//!
//! let mut mask = Mask::zeros(Canvas::new(8, 4));
//! let painted = mask.paint_rect(Rect::new(6, 2, 5, 5), 0.5);
//!
//! assert_eq!(painted, Some(Rect::new(6, 2, 2, 2)));
//! assert_eq!(mask.get(7, 3), Some(0.5));
//! assert_eq!(mask.get(5, 3), Some(0.0));
//! ```

use ndarray::{Array2, ArrayView2, s};
use regcond_core::geometry::{Canvas, Rect};

/// A per-pixel weighting grid restricting where guidance applies.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    data: Array2<f32>,
}

impl Mask {
    /// Allocate a zero-filled mask covering the canvas.
    pub fn zeros(canvas: Canvas) -> Self {
        Self {
            data: Array2::zeros(canvas.shape()),
        }
    }

    /// Allocate a mask with `rect` painted at `value`.
    pub fn with_rect(canvas: Canvas, rect: Rect, value: f32) -> Self {
        let mut mask = Self::zeros(canvas);
        mask.paint_rect(rect, value);
        mask
    }

    /// Mask width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.data.ncols() as u32
    }

    /// Mask height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.data.nrows() as u32
    }

    /// The canvas this mask covers.
    #[inline]
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width(), self.height())
    }

    /// Get the weight at (x, y), or `None` outside the mask.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        self.data.get((y as usize, x as usize)).copied()
    }

    /// Borrow the underlying `(height, width)` array.
    #[inline]
    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }

    /// Iterate weights in row-major order.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().copied()
    }

    /// Set every pixel of `rect` that lies inside the mask to `value`.
    ///
    /// The logical rectangle is intersected with `[0, width) x [0, height)`
    /// first; pixels outside are silently dropped. Returns the rectangle that
    /// was actually written, or `None` when nothing was.
    pub fn paint_rect(&mut self, rect: Rect, value: f32) -> Option<Rect> {
        let clip = rect.intersection_opt(&self.canvas().bounds())?;

        #[cfg(feature = "tracing")]
        trace_truncation(rect, clip);

        // Bounds are within the canvas, so the casts are lossless.
        let (x0, y0) = (clip.x as usize, clip.y as usize);
        let (x1, y1) = (clip.right() as usize, clip.bottom() as usize);
        self.data.slice_mut(s![y0..y1, x0..x1]).fill(value);
        Some(clip)
    }

    /// Summarize where and how strongly the mask is painted.
    pub fn stats(&self) -> MaskStats {
        let mut nonzero = 0u64;
        let mut max_value = 0.0f32;
        let (mut min_x, mut min_y) = (usize::MAX, usize::MAX);
        let (mut max_x, mut max_y) = (0usize, 0usize);

        for ((y, x), &v) in self.data.indexed_iter() {
            if v != 0.0 {
                nonzero += 1;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
            max_value = max_value.max(v);
        }

        let bounds = (nonzero > 0).then(|| {
            Rect::new(
                min_x as i64,
                min_y as i64,
                (max_x - min_x + 1) as i64,
                (max_y - min_y + 1) as i64,
            )
        });

        MaskStats {
            bounds,
            nonzero,
            max_value,
        }
    }
}

#[cfg(feature = "tracing")]
fn trace_truncation(rect: Rect, clip: Rect) {
    if clip != rect {
        tracing::trace!(?rect, ?clip, "mask rectangle truncated at bounds");
    }
}

/// Summary of a painted mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskStats {
    /// Bounding box of the nonzero pixels.
    pub bounds: Option<Rect>,
    /// Number of nonzero pixels.
    pub nonzero: u64,
    /// Largest weight (zero for an empty mask).
    pub max_value: f32,
}

#[cfg(test)]
mod tests {
    use super::{Mask, MaskStats};
    use regcond_core::geometry::{Canvas, Rect};

    #[test]
    fn zeros_has_canvas_shape() {
        let mask = Mask::zeros(Canvas::new(7, 3));
        assert_eq!(mask.width(), 7);
        assert_eq!(mask.height(), 3);
        assert_eq!(mask.view().shape(), &[3, 7]);
        assert!(mask.values().all(|v| v == 0.0));
    }

    #[test]
    fn paint_inside_writes_exact_rect() {
        let mut mask = Mask::zeros(Canvas::new(10, 10));
        let painted = mask.paint_rect(Rect::new(2, 3, 4, 5), 1.5);
        assert_eq!(painted, Some(Rect::new(2, 3, 4, 5)));
        for y in 0..10 {
            for x in 0..10 {
                let expected = if (2..6).contains(&x) && (3..8).contains(&y) {
                    1.5
                } else {
                    0.0
                };
                assert_eq!(mask.get(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn paint_overflow_is_truncated() {
        let mut mask = Mask::zeros(Canvas::new(4, 4));
        let painted = mask.paint_rect(Rect::new(-2, 1, 100, 100), 3.0);
        assert_eq!(painted, Some(Rect::new(0, 1, 4, 3)));
        assert_eq!(mask.stats().nonzero, 12);
    }

    #[test]
    fn paint_outside_writes_nothing() {
        let mut mask = Mask::zeros(Canvas::new(4, 4));
        assert_eq!(mask.paint_rect(Rect::new(4, 0, 2, 2), 1.0), None);
        assert_eq!(mask.paint_rect(Rect::new(0, 0, 0, 2), 1.0), None);
        assert_eq!(mask, Mask::zeros(Canvas::new(4, 4)));
    }

    #[test]
    fn get_outside_is_none() {
        let mask = Mask::zeros(Canvas::new(2, 2));
        assert_eq!(mask.get(2, 0), None);
        assert_eq!(mask.get(0, 2), None);
    }

    #[test]
    fn stats_reports_bounds() {
        let mask = Mask::with_rect(Canvas::new(16, 16), Rect::new(3, 4, 5, 2), 0.25);
        assert_eq!(
            mask.stats(),
            MaskStats {
                bounds: Some(Rect::new(3, 4, 5, 2)),
                nonzero: 10,
                max_value: 0.25,
            }
        );
        assert_eq!(Mask::zeros(Canvas::new(3, 3)).stats().bounds, None);
    }
}
