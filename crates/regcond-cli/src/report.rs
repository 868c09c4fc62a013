//! Merge reports: a serializable summary of a merged conditioning set.

use std::fmt::Write as _;

use regcond::{Canvas, ConditioningSet, Fingerprint, MASK_KEY, Rect, SET_AREA_TO_BOUNDS_KEY};
use serde::Serialize;

use crate::document::{Embedding, Slots};

/// `[x, y, width, height]`.
pub type RectArray = [i64; 4];

fn rect_array(rect: Rect) -> RectArray {
    [rect.x, rect.y, rect.width, rect.height]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeReport {
    pub canvas: Canvas,
    pub fingerprint: String,
    pub regions: Vec<RegionReport>,
    pub entries: Vec<EntryReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionReport {
    /// 1-based slot number.
    pub slot: usize,
    pub mode: &'static str,
    /// Logical rectangle before clipping.
    pub rect: RectArray,
    /// Portion of `rect` inside the canvas.
    pub painted: Option<RectArray>,
    /// Pixels covered by `painted`.
    pub painted_area: u64,
    pub strength: f32,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryReport {
    pub slot: usize,
    pub embedding: Embedding,
    /// Attribute keys other than `mask` and `set_area_to_bounds`.
    pub attributes: Vec<String>,
    pub set_area_to_bounds: Option<bool>,
    pub mask: Option<MaskReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaskReport {
    pub bounds: Option<RectArray>,
    pub nonzero: u64,
    pub max_value: f32,
}

impl MergeReport {
    /// Summarize `merged`, which must come from merging `slots` on `canvas`.
    pub fn new(
        canvas: Canvas,
        slots: &Slots,
        merged: &ConditioningSet<Embedding>,
        fingerprint: Fingerprint,
    ) -> Self {
        let connected: Vec<(usize, _)> = slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|r| (i + 1, r)))
            .collect();

        let regions = connected
            .iter()
            .map(|&(slot, region)| {
                let rect = region.geometry.resolve(canvas);
                let painted = rect.intersection_opt(&canvas.bounds());
                RegionReport {
                    slot,
                    mode: region.geometry.mode(),
                    rect: rect_array(rect),
                    painted: painted.map(rect_array),
                    painted_area: painted.map_or(0, |r| r.area()),
                    strength: region.strength,
                    entries: region.conditioning.len(),
                }
            })
            .collect();

        // Merged entries are laid out region by region, in slot order.
        let owners = connected
            .iter()
            .flat_map(|&(slot, region)| std::iter::repeat_n(slot, region.conditioning.len()));

        let entries = merged
            .iter()
            .zip(owners)
            .map(|(entry, slot)| {
                let stats = entry.mask().map(|m| m.stats());
                EntryReport {
                    slot,
                    embedding: entry.embedding().clone(),
                    attributes: entry
                        .attributes()
                        .keys()
                        .filter(|k| *k != MASK_KEY && *k != SET_AREA_TO_BOUNDS_KEY)
                        .map(str::to_owned)
                        .collect(),
                    set_area_to_bounds: entry.set_area_to_bounds(),
                    mask: stats.map(|s| MaskReport {
                        bounds: s.bounds.map(rect_array),
                        nonzero: s.nonzero,
                        max_value: s.max_value,
                    }),
                }
            })
            .collect();

        Self {
            canvas,
            fingerprint: fingerprint.to_hex(),
            regions,
            entries,
        }
    }

    /// Human-readable rendering.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "canvas {}x{}  fingerprint {}",
            self.canvas.width, self.canvas.height, self.fingerprint
        );
        for region in &self.regions {
            let [x, y, w, h] = region.rect;
            let _ = write!(
                out,
                "region_spec{} {:>3} rect=({x},{y},{w},{h}) strength={} entries={}",
                region.slot, region.mode, region.strength, region.entries
            );
            match region.painted {
                Some([px, py, pw, ph]) => {
                    let _ = writeln!(out, " painted=({px},{py},{pw},{ph})");
                }
                None => {
                    let _ = writeln!(out, " painted=none");
                }
            }
        }
        let _ = writeln!(out, "{} merged entries", self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            let nonzero = entry.mask.as_ref().map_or(0, |m| m.nonzero);
            let _ = writeln!(
                out,
                "  #{i} slot={} embedding={} nonzero={nonzero} extra_keys={:?}",
                entry.slot, entry.embedding, entry.attributes
            );
        }
        out
    }
}
