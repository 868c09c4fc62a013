//! Region descriptors and their builders.
//!
//! Two builders feed the merge resolver:
//!
//! - [`PercentageRegion`] takes geometry on a 0-100 scale and produces a
//!   [`RegionGeometry::Normalized`] descriptor (fractions of the canvas).
//! - [`PixelRegion`] takes absolute pixel geometry and produces a
//!   [`RegionGeometry::Absolute`] descriptor.
//!
//! Neither builder validates or clamps anything: the canvas is not known yet.
//! Out-of-range input is either rejected by the node validation layer
//! ([`crate::node`]) or resolved by the clamping/truncation rules in
//! [`RegionGeometry::resolve`].

use regcond_core::geometry::{Canvas, Rect};

use crate::conditioning::ConditioningSet;

/// Region geometry in one of the two supported coordinate systems.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionGeometry {
    /// Fractions of the canvas. Not re-validated; values outside `[0, 1]`
    /// are legal and resolve to rectangles that overflow the canvas.
    Normalized { x: f64, y: f64, w: f64, h: f64 },
    /// Pixel units, with no upper bound at construction time.
    Absolute { x: u32, y: u32, w: u32, h: u32 },
}

impl RegionGeometry {
    /// Resolve to a logical pixel rectangle on `canvas`.
    ///
    /// Normalized geometry is floored per axis and left unclamped. Absolute
    /// geometry keeps its origin and clamps its extent into `[0, W - x]` and
    /// `[0, H - y]`, so an origin at or beyond the far edge yields zero extent.
    pub fn resolve(&self, canvas: Canvas) -> Rect {
        let (cw, ch) = (i64::from(canvas.width), i64::from(canvas.height));
        match *self {
            Self::Normalized { x, y, w, h } => Rect::new(
                scale_floor(x, cw),
                scale_floor(y, ch),
                scale_floor(w, cw),
                scale_floor(h, ch),
            ),
            Self::Absolute { x, y, w, h } => {
                let (x0, y0) = (i64::from(x), i64::from(y));
                Rect::new(
                    x0,
                    y0,
                    i64::from(w).min(cw - x0).max(0),
                    i64::from(h).min(ch - y0).max(0),
                )
            }
        }
    }

    /// Short tag for the coordinate system.
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Normalized { .. } => "pct",
            Self::Absolute { .. } => "px",
        }
    }
}

// Float-to-int `as` saturates and maps NaN to 0.
#[inline]
fn scale_floor(fraction: f64, extent: i64) -> i64 {
    (fraction * extent as f64).floor() as i64
}

/// A geometric and guidance spec awaiting resolution against a canvas.
#[derive(Debug)]
pub struct RegionDescriptor<E> {
    pub geometry: RegionGeometry,
    /// Uniform weight painted into the region's mask.
    pub strength: f32,
    pub conditioning: ConditioningSet<E>,
}

impl<E> Clone for RegionDescriptor<E> {
    fn clone(&self) -> Self {
        Self {
            geometry: self.geometry,
            strength: self.strength,
            conditioning: self.conditioning.clone(),
        }
    }
}

impl<E: PartialEq> PartialEq for RegionDescriptor<E> {
    fn eq(&self, other: &Self) -> bool {
        self.geometry == other.geometry
            && self.strength == other.strength
            && self.conditioning == other.conditioning
    }
}

impl<E> RegionDescriptor<E> {
    /// Shorthand for [`PercentageRegion::build`].
    pub fn percentage(
        conditioning: ConditioningSet<E>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        strength: f32,
    ) -> Self {
        PercentageRegion {
            x,
            y,
            width,
            height,
            strength,
        }
        .build(conditioning)
    }

    /// Shorthand for [`PixelRegion::build`].
    pub fn pixels(
        conditioning: ConditioningSet<E>,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        strength: f32,
    ) -> Self {
        PixelRegion {
            x,
            y,
            width,
            height,
            strength,
        }
        .build(conditioning)
    }
}

/// Region geometry on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentageRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub strength: f32,
}

impl Default for PercentageRegion {
    /// The full canvas at strength 1.
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            strength: 1.0,
        }
    }
}

impl PercentageRegion {
    /// Divide every coordinate by 100. The conditioning set is shared, not copied.
    pub fn build<E>(&self, conditioning: ConditioningSet<E>) -> RegionDescriptor<E> {
        RegionDescriptor {
            geometry: RegionGeometry::Normalized {
                x: self.x / 100.0,
                y: self.y / 100.0,
                w: self.width / 100.0,
                h: self.height / 100.0,
            },
            strength: self.strength,
            conditioning,
        }
    }
}

/// Region geometry in absolute pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub strength: f32,
}

impl Default for PixelRegion {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 512,
            height: 512,
            strength: 1.0,
        }
    }
}

impl PixelRegion {
    /// Keep the raw integers; clamping waits until the canvas is known.
    pub fn build<E>(&self, conditioning: ConditioningSet<E>) -> RegionDescriptor<E> {
        RegionDescriptor {
            geometry: RegionGeometry::Absolute {
                x: self.x,
                y: self.y,
                w: self.width,
                h: self.height,
            },
            strength: self.strength,
            conditioning,
        }
    }
}
