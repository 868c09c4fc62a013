//! The region merge resolver.
//!
//! [`merge_regions`] turns a canvas and an ordered list of optional region
//! descriptors into one conditioning set:
//!
//! 1. Absent slots are dropped; relative order is kept.
//! 2. Each descriptor is resolved to a rectangle ([`RegionGeometry::resolve`]),
//!    painted into a fresh zeroed mask at the region's strength, and attached
//!    to copies of every entry in the region's conditioning set.
//! 3. Per-region entry lists are concatenated in region order.
//!
//! Regions with an empty rectangle still contribute their entries, carrying
//! an all-zero mask. Overlapping regions are not combined here; each stays a
//! distinct entry and the downstream consumer decides how they blend.
//!
//! # Usage
//!
//! ```
//! use regcond::{ConditioningEntry, ConditioningSet, RegionDescriptor, merge_regions};
//! use regcond_core::geometry::Canvas;
//!
//! let cond: ConditioningSet<&str> = vec![ConditioningEntry::new("e1")].into();
//! let region = RegionDescriptor::percentage(cond, 0.0, 0.0, 50.0, 50.0, 1.0);
//!
//! let merged = merge_regions(Canvas::new(512, 512), &[Some(region), None]);
//!
//! assert_eq!(merged.len(), 1);
//! let mask = merged.entries()[0].mask().unwrap();
//! assert_eq!(mask.get(255, 255), Some(1.0));
//! assert_eq!(mask.get(256, 0), Some(0.0));
//! ```

use std::sync::Arc;

use regcond_core::geometry::{Canvas, Rect};
use regcond_mask::Mask;

use crate::conditioning::{ConditioningEntry, ConditioningSet};
use crate::region::{RegionDescriptor, RegionGeometry};

/// A descriptor resolved against a concrete canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRegion {
    /// The logical rectangle, before clipping to the canvas.
    pub rect: Rect,
    /// The painted mask, shared by every entry of the region.
    pub mask: Arc<Mask>,
}

/// Resolve one descriptor's rectangle and paint its mask.
pub fn resolve_region<E>(canvas: Canvas, region: &RegionDescriptor<E>) -> ResolvedRegion {
    let rect = region.geometry.resolve(canvas);
    let mask = Mask::with_rect(canvas, rect, region.strength);

    #[cfg(feature = "tracing")]
    tracing::trace!(
        mode = region.geometry.mode(),
        x = rect.x,
        y = rect.y,
        w = rect.width,
        h = rect.height,
        strength = region.strength,
        entries = region.conditioning.len(),
        "resolved region"
    );

    ResolvedRegion {
        rect,
        mask: Arc::new(mask),
    }
}

/// Copy every entry of `conditioning`, attaching `mask` and clearing
/// `set_area_to_bounds` on the copies.
pub fn apply_mask<E>(
    conditioning: &ConditioningSet<E>,
    mask: &Arc<Mask>,
) -> Vec<ConditioningEntry<E>> {
    conditioning
        .iter()
        .map(|entry| entry.masked(Arc::clone(mask)))
        .collect()
}

/// Flatten per-region entry lists into one set, in order.
pub fn combine<E>(per_region: Vec<Vec<ConditioningEntry<E>>>) -> ConditioningSet<E> {
    per_region.into_iter().flatten().collect()
}

/// Resolve, mask, and concatenate every present region.
///
/// Pure: the descriptors and their source entries are never mutated, and
/// equal inputs produce equal outputs.
pub fn merge_regions<E>(
    canvas: Canvas,
    slots: &[Option<RegionDescriptor<E>>],
) -> ConditioningSet<E> {
    let regions: Vec<&RegionDescriptor<E>> = slots.iter().flatten().collect();
    if regions.is_empty() {
        return ConditioningSet::empty();
    }

    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "merge_regions",
        width = canvas.width,
        height = canvas.height,
        slots = slots.len(),
        regions = regions.len()
    )
    .entered();

    let per_region = regions
        .into_iter()
        .map(|region| {
            let resolved = resolve_region(canvas, region);
            apply_mask(&region.conditioning, &resolved.mask)
        })
        .collect();

    let merged = combine(per_region);

    #[cfg(feature = "tracing")]
    tracing::debug!(entries = merged.len(), "merged region conditioning");

    merged
}

/// Whether the geometry can paint anything on `canvas`.
pub fn paints_anything(canvas: Canvas, geometry: &RegionGeometry) -> bool {
    geometry
        .resolve(canvas)
        .intersection_opt(&canvas.bounds())
        .is_some()
}
